use gridfall_engine::{BlockKind, Board, GridPos};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{Tile, TileDisplay};

/// Renders the play field: locked blocks, the falling piece and its landing
/// shadow. Dimensions follow the board, so non-default sizes lay out
/// correctly.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    show_shadow: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            show_shadow: false,
            block: None,
        }
    }

    pub fn shadow(self, show_shadow: bool) -> Self {
        Self {
            show_shadow,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        let cols = u16::try_from(self.board.width()).unwrap_or(0);
        cols * TileDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let rows = u16::try_from(self.board.height()).unwrap_or(0);
        rows * TileDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    fn tile_at(
        &self,
        pos: GridPos,
        current: Option<&(BlockKind, [GridPos; 4])>,
        shadow: Option<&[GridPos; 4]>,
    ) -> Tile {
        if let Some((kind, cells)) = current
            && cells.contains(&pos)
        {
            return Tile::Block(*kind);
        }
        if let Some(cells) = shadow
            && cells.contains(&pos)
        {
            return Tile::Shadow;
        }
        match self.board.block_at(pos) {
            Some(kind) => Tile::Block(kind),
            None => Tile::Empty,
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let current = self
            .board
            .current_piece()
            .map(|piece| (piece.kind(), piece.cells()));
        let shadow = if self.show_shadow {
            self.board.shadow_piece().map(|piece| piece.cells())
        } else {
            None
        };

        let col_constraints =
            (0..self.board.width()).map(|_| Constraint::Length(TileDisplay::width()));
        let row_constraints =
            (0..self.board.height()).map(|_| Constraint::Length(TileDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        for (y, row_area) in area.layout_vec(&vertical).into_iter().enumerate() {
            for (x, cell_area) in row_area.layout_vec(&horizontal).into_iter().enumerate() {
                #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let pos = GridPos::new(x as i32, y as i32);
                let tile = self.tile_at(pos, current.as_ref(), shadow.as_ref());
                TileDisplay::from_tile(tile, true).render(cell_area, buf);
            }
        }
    }
}

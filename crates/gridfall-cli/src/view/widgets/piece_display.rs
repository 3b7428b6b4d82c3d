use gridfall_engine::{BlockKind, Offset};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{Tile, TileDisplay};

/// Renders a single piece kind in its canonical orientation, centered in a
/// 4x4 tile slot. Used for the hold panel and the next-piece stack.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    kind: Option<BlockKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            kind: None,
            block: None,
        }
    }

    pub fn piece(self, kind: BlockKind) -> Self {
        Self {
            kind: Some(kind),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    /// Tile columns of the slot; wide enough for any canonical piece.
    pub fn slot_width() -> u16 {
        4
    }

    /// Tile rows of the slot; tall enough for the vertical line piece.
    pub fn slot_height() -> u16 {
        4
    }

    pub fn width(&self) -> u16 {
        Self::slot_width() * TileDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        Self::slot_height() * TileDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Default for PieceDisplay<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        TileDisplay::from_tile(Tile::Empty, false).render(area, buf);
        let Some(kind) = self.kind else {
            return;
        };

        // Bounding box of the canonical offsets, to center the piece.
        let offsets = kind.spawn_offsets();
        let min_x = offsets.iter().map(|o| o.x).min().unwrap_or(0);
        let min_y = offsets.iter().map(|o| o.y).min().unwrap_or(0);
        let max_x = offsets.iter().map(|o| o.x).max().unwrap_or(0);
        let max_y = offsets.iter().map(|o| o.y).max().unwrap_or(0);
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (cols, rows) = ((max_x - min_x + 1) as u16, (max_y - min_y + 1) as u16);

        let piece_area = area.centered(
            Constraint::Length(cols * TileDisplay::width()),
            Constraint::Length(rows * TileDisplay::height()),
        );

        let tile = TileDisplay::from_tile(Tile::Block(kind), false);
        for Offset { x, y } in offsets {
            #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let cell_area = Rect::new(
                piece_area.x + (x - min_x) as u16 * TileDisplay::width(),
                piece_area.y + (y - min_y) as u16 * TileDisplay::height(),
                TileDisplay::width(),
                TileDisplay::height(),
            );
            Widget::render(&tile, cell_area.intersection(area), buf);
        }
    }
}

use std::iter;

use gridfall_engine::BlockKind;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::{PieceDisplay, TileDisplay};

/// Renders the upcoming pieces as a vertical stack of slots.
#[derive(Debug)]
pub struct PieceStackDisplay<'a> {
    pieces: Vec<BlockKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceStackDisplay<'a> {
    pub fn new<I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = BlockKind>,
    {
        Self {
            pieces: pieces.into_iter().collect(),
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        PieceDisplay::slot_width() * TileDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        let num_pieces = u16::try_from(self.pieces.len()).unwrap_or(0);
        let padding = num_pieces.saturating_sub(1);
        PieceDisplay::slot_height() * TileDisplay::height() * num_pieces
            + padding
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceStackDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceStackDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let layout = Layout::vertical((0..self.pieces.len()).map(|_| {
            Constraint::Length(PieceDisplay::slot_height() * TileDisplay::height())
        }))
        .flex(Flex::SpaceBetween);
        let cells = area.layout_vec(&layout);

        for (cell, kind) in iter::zip(cells, &self.pieces) {
            PieceDisplay::new().piece(*kind).render(cell, buf);
        }
    }
}

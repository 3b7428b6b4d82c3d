use gridfall_engine::BlockKind;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::view::widgets::style;

/// What a single board cell shows on screen.
#[derive(Debug, Clone, Copy)]
pub enum Tile {
    Empty,
    /// Where the falling piece would land.
    Shadow,
    Block(BlockKind),
}

/// Renders one tile as a 2x1 character cell.
#[derive(Debug)]
pub struct TileDisplay {
    style: Style,
    symbol: &'static str,
}

impl TileDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_tile(tile: Tile, show_dots: bool) -> Self {
        // Dots make the empty play field readable; panels stay plain.
        match tile {
            Tile::Empty => {
                if show_dots {
                    Self::new(style::EMPTY_DOT, ".")
                } else {
                    Self::new(style::EMPTY, "")
                }
            }
            Tile::Shadow => Self::new(style::SHADOW, "[]"),
            Tile::Block(kind) => Self::new(style::block(kind), ""),
        }
    }
}

impl Widget for TileDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &TileDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with
        // the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

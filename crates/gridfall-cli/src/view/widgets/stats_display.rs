use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::style;

/// Renders the current score and the best score on record.
pub struct StatsDisplay<'a> {
    score: usize,
    best: usize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(score: usize, best: usize) -> Self {
        Self {
            score,
            best,
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
        14 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        5 + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let rows = [
            Some(Line::styled("SCORE:", style).left_aligned()),
            Some(Line::styled(self.score.to_string(), style).right_aligned()),
            None,
            Some(Line::styled("BEST:", style).left_aligned()),
            Some(Line::styled(self.best.to_string(), style).right_aligned()),
        ];

        let row_areas =
            Layout::vertical((0..rows.len()).map(|_| Constraint::Length(1))).split(area);
        for (line, row_area) in iter::zip(rows, row_areas.iter().copied()) {
            if let Some(line) = line {
                line.render(row_area, buf);
            }
        }
    }
}

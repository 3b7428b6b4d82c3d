use gridfall_engine::{Board, GameState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::view::widgets::{
    BoardDisplay, PieceDisplay, PieceStackDisplay, StatsDisplay, color, style,
};

/// Composite view of a whole game: the play field flanked by the hold
/// panel, the score panel and the next-piece stack, with state popups on
/// top.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    board: &'a Board,
    best_score: usize,
    show_shadow: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
    next_pieces: usize,
}

impl<'a> GameDisplay<'a> {
    pub fn new(board: &'a Board, best_score: usize) -> Self {
        Self {
            board,
            best_score,
            show_shadow: true,
            horizontal_padding: 1,
            vertical_padding: 0,
            next_pieces: 3,
        }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.board.state() {
            GameState::Playing => color::WHITE,
            GameState::Paused => color::YELLOW,
            GameState::Stopped => color::RED,
        };

        let game_board = BoardDisplay::new(self.board)
            .shadow(self.show_shadow)
            .block(Block::bordered().border_style(border_style).style(style));
        let hold_panel = {
            let panel = PieceDisplay::new().block(
                Block::bordered()
                    .title(Line::from("HOLD").centered())
                    .padding(block_padding)
                    .border_style(border_style)
                    .style(style),
            );
            if let Some(kind) = self.board.held_piece() {
                panel.piece(kind)
            } else {
                panel
            }
        };
        let piece_stack = PieceStackDisplay::new(self.board.next_pieces().take(self.next_pieces))
            .block(
                Block::bordered()
                    .title(Line::from("NEXT").centered())
                    .padding(block_padding)
                    .border_style(border_style)
                    .style(style),
            );
        let stats = StatsDisplay::new(self.board.score(), self.best_score).block(
            Block::bordered()
                .title(Line::from("SCORE").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style),
        );

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(piece_stack.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let [piece_stack_area] =
            Layout::vertical([Constraint::Length(piece_stack.height())]).areas(right_column);

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        piece_stack.render(piece_stack_area, buf);

        let popup = match self.board.state() {
            GameState::Playing => None,
            GameState::Paused => Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW))),
            GameState::Stopped => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

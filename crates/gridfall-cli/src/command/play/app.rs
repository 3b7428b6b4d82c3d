use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use gridfall_engine::{BagSeed, Board, GameState};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{
    score::ScoreStore,
    tui::{App, Tui},
    view::widgets::GameDisplay,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct PlayConfig {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) gravity: Duration,
    pub(crate) seed: Option<BagSeed>,
}

#[derive(Debug)]
pub(crate) struct PlayApp {
    board: Board,
    config: PlayConfig,
    store: ScoreStore,
    /// Best score ever seen, shown live in the stats panel.
    highest: usize,
    /// What the score file currently holds; saves are skipped when the best
    /// score has not moved past it.
    persisted: usize,
    save_error: Option<anyhow::Error>,
    should_exit: bool,
}

impl PlayApp {
    pub(crate) fn new(config: PlayConfig, store: ScoreStore, highest: usize) -> Self {
        Self {
            board: Self::new_board(&config),
            config,
            store,
            highest,
            persisted: highest,
            save_error: None,
            should_exit: false,
        }
    }

    /// Consumes the app after the event loop, surfacing any deferred save
    /// failure and flushing the final high score.
    pub(crate) fn finish(mut self) -> anyhow::Result<()> {
        self.sync_high_score();
        self.persist_high_score();
        match self.save_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn new_board(config: &PlayConfig) -> Board {
        match config.seed {
            Some(seed) => Board::with_seed(config.width, config.height, seed),
            None => Board::new(config.width, config.height),
        }
    }

    /// Starts a fresh game. An explicit seed is reused, replaying the same
    /// piece sequence.
    fn restart(&mut self) {
        self.board = Self::new_board(&self.config);
    }

    fn sync_high_score(&mut self) {
        if self.board.score() > self.highest {
            self.highest = self.board.score();
        }
    }

    fn persist_high_score(&mut self) {
        if self.highest <= self.persisted {
            return;
        }
        match self.store.save(self.highest) {
            Ok(()) => self.persisted = self.highest,
            Err(err) => {
                // Keep only the first failure; later ones are usually noise
                // from the same cause.
                self.save_error.get_or_insert(err);
            }
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(Some(self.config.gravity));
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        let state = self.board.state();

        match key.code {
            KeyCode::Char('q') => self.should_exit = true,
            KeyCode::Char('r') => self.restart(),
            KeyCode::Enter if state.is_stopped() => self.restart(),
            KeyCode::Char('p') | KeyCode::Esc if !state.is_stopped() => self.board.pause(),
            KeyCode::Left if state.is_playing() => self.board.move_left(),
            KeyCode::Right if state.is_playing() => self.board.move_right(),
            KeyCode::Down if state.is_playing() => _ = self.board.move_down(true),
            KeyCode::Char(' ') if state.is_playing() => self.board.hard_drop(),
            KeyCode::Up | KeyCode::Char('z') if state.is_playing() => _ = self.board.rotate(true),
            KeyCode::Char('x') if state.is_playing() => _ = self.board.rotate(false),
            KeyCode::Char('c') if state.is_playing() => _ = self.board.switch_with_held(),
            _ => {}
        }

        self.sync_high_score();
        if self.board.state().is_stopped() {
            self.persist_high_score();
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let game_display = GameDisplay::new(&self.board, self.highest);
        let help_text = match self.board.state() {
            GameState::Playing => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | Space (Hard Drop) | ↑ Z X (Rotate) | C (Hold) | P (Pause) | R (Restart) | Q (Quit)"
            }
            GameState::Paused => "Controls: P (Resume) | R (Restart) | Q (Quit)",
            GameState::Stopped => "Controls: Enter (New Game) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(game_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _tui: &mut Tui) {
        if self.board.state().is_playing() {
            self.board.move_down(false);
        }
        self.sync_high_score();
        if self.board.state().is_stopped() {
            self.persist_high_score();
        }
    }
}

use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use ratatui::Frame;

/// Trait for TUI applications executed by [`Tui::run`].
pub trait App {
    /// Initializes the application. Called once at the start of
    /// [`Tui::run`]; use it to configure the tick interval.
    fn init(&mut self, tui: &mut Tui);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Draws the screen (called on each [`TuiEvent::Render`]).
    fn draw(&self, frame: &mut Frame);

    /// Updates game logic (called on each [`TuiEvent::Tick`]).
    fn update(&mut self, tui: &mut Tui);
}

/// Events dispatched by the event loop.
#[derive(Debug, Clone, derive_more::From)]
enum TuiEvent {
    /// Game logic update timing, based on the tick interval.
    Tick,
    /// Screen render timing. Fired after state changes (dirty rendering).
    Render,
    /// Terminal events such as key input, mouse, and resize.
    Crossterm(Event),
}

/// TUI application runtime.
///
/// Owns the event loop and executes an [`App`] inside the ratatui terminal
/// guard. Renders lazily: a frame is drawn only after a tick or terminal
/// event marked the state dirty, so an idle (paused) game burns no CPU on
/// redraws.
#[derive(Debug)]
pub struct Tui {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl Default for Tui {
    fn default() -> Self {
        Self::new()
    }
}

impl Tui {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_interval: None,
            last_tick: Instant::now(),
            // Initial render is required on startup
            dirty: true,
        }
    }

    /// Sets the tick interval. Pass `None` to disable tick events.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()` for initialization
    /// 2. Runs the event loop until `app.should_exit()` returns true
    ///    - [`TuiEvent::Tick`]: calls `app.update()`
    ///    - [`TuiEvent::Render`]: draws a frame via `app.draw()`
    ///    - [`TuiEvent::Crossterm`]: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.next_event()? {
                    TuiEvent::Tick => {
                        app.update(&mut self);
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(&mut self, event);
                    }
                }
            }
            Ok(())
        })
    }

    /// Returns the next event, blocking until a tick is due or a terminal
    /// event arrives.
    fn next_event(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            // Wait for a terminal event, but no longer than until the next
            // tick is due. With no tick configured, block indefinitely.
            let timeout = self
                .tick_interval
                .map(|interval| (self.last_tick + interval).saturating_duration_since(now));
            if let Some(timeout) = timeout
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }
}

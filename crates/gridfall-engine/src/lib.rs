//! Game-state engine for a falling-block puzzle game.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - the passive data structures: piece geometry ([`Piece`],
//!   [`BlockKind`]) and the static-block grid ([`Grid`])
//! - [`engine`] - the gameplay state machine: the [`Board`] that drives
//!   spawning, movement, rotation, hold, locking and line clearing, fed by
//!   the 7-bag [`PieceBag`]
//!
//! The engine performs no I/O and owns no clock. An external driver delivers
//! two stimuli - a periodic gravity tick and discrete commands - and must
//! serialize them onto one thread before calling into [`Board`]. There are no
//! recoverable errors inside the core: the one modeled failure, a blocked
//! spawn, surfaces as the terminal [`GameState::Stopped`] state rather than
//! as an `Err`.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

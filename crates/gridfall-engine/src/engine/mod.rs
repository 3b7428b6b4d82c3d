//! Gameplay state machine.
//!
//! - [`Board`] - owns the grid, the live piece, the bag, the held piece,
//!   the score and the game state, and drives every gameplay transition
//! - [`PieceBag`] - the 7-bag randomizer feeding the board
//! - [`BagSeed`] - seed for deterministic piece sequences
//!
//! A driver typically constructs a [`Board`] and then calls its mutation
//! methods from a gravity tick and from key commands:
//!
//! ```
//! use gridfall_engine::Board;
//!
//! let mut board = Board::new(10, 20);
//!
//! board.move_left();
//! board.rotate(true);
//! board.hard_drop();
//!
//! if board.state().is_stopped() {
//!     println!("game over, final score {}", board.score());
//! }
//! ```

pub use self::{board::*, piece_bag::*};

mod board;
mod piece_bag;

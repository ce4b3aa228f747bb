//! A perfect agent for playing or analysing 'recycle' tic-tac-toe
//!
//! In this variant each side keeps at most `BOARD_LENGTH` pieces on the
//! board. Once both sides are at their limit, placing a new piece removes
//! the placing side's oldest surviving piece, and the vacated square may
//! not be reused by that same move. The agent searches the full game tree
//! to find the game-theoretic outcome of any reachable position.
//!
//! # Basic Usage
//!
//! ```
//! use recycle_ttt_ai::{solver::Solver, state::GameState};
//!
//! let mut solver = Solver::new(GameState::initial());
//! let (_winner, depth_to_mate) = solver.solve();
//!
//! assert!(depth_to_mate > 0);
//! ```

use static_assertions::*;
pub use anyhow;

pub mod bitboard;

pub mod geometry;

pub mod outcome;

pub mod state;

pub mod transposition_table;

pub mod solver;

mod test;

pub use crate::bitboard::BitBoard;
pub use crate::geometry::{BoardGeometry, Square};
pub use crate::outcome::{Outcome, Player};
pub use crate::solver::{ProgressHook, Solver};
pub use crate::state::{Cell, GameState, MoveQueue};
pub use crate::transposition_table::TranspositionTable;

/// The side length of the square game board in squares
pub const BOARD_LENGTH: usize = 3;

/// How many recent placements are tracked for recycling; each side keeps
/// at most `BOARD_LENGTH` pieces, so the shared queue holds two sides' worth
pub const QUEUE_CAPACITY: usize = 2 * BOARD_LENGTH;

// ensure that the given board fits in a u64 for the bitboard representation
const_assert!(BOARD_LENGTH * BOARD_LENGTH <= 64);

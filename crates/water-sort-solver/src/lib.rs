//! Solver library for water sort puzzles with masked tubes.
//!
//! Tubes hold stacked color units, some of them not yet revealed. The solver
//! runs a bounded breadth-first search over pours and returns either a
//! shortest sequence reaching a sorted board or the pours that uncover the
//! most masked content.

pub mod board;
pub mod error;
pub mod evaluation;
pub mod moves;
pub mod pruning;
pub mod solver;

// Re-export main types
pub use board::{Board, BoardShape, ColorKey, Tube, DEFAULT_CAPACITY, DEFAULT_TUBE_COUNT};
pub use error::{BoardError, MoveError};
pub use evaluation::{excavation_score, is_solved, parity_advisory};
pub use moves::{excavation_flags, possible_moves, replay, Move};
pub use solver::{solve, SearchOutcome, SearchStats, SolverConfig, SolverResult};

//! Error types for board construction and manual pours.
//!
//! Search outcomes (budget exceeded, no solution) are not errors; they are
//! reported through [`crate::solver::SolverResult`].

use crate::board::{BoardShape, ColorKey};

/// A board that does not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board shape must be non-zero (got {tube_count} tubes of {capacity} cells)")]
    EmptyShape { tube_count: usize, capacity: usize },

    #[error("expected {expected} tubes, found {found}")]
    TubeCount { expected: usize, found: usize },

    #[error("tube {tube} has {found} cells, expected {expected}")]
    CellCount {
        tube: usize,
        expected: usize,
        found: usize,
    },

    #[error("board shape {0:?} is too large")]
    TooLarge(BoardShape),
}

/// A pour that cannot be performed on the current board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("tube index {index} out of range (board has {tube_count} tubes)")]
    OutOfRange { index: usize, tube_count: usize },

    #[error("cannot pour tube {0} into itself")]
    SameTube(usize),

    #[error("tube {0} has nothing to pour")]
    NothingToPour(usize),

    #[error("tube {0} is full")]
    DestinationFull(usize),

    #[error("cannot pour {poured:?} onto {top:?} in tube {tube}")]
    ColorMismatch {
        tube: usize,
        poured: ColorKey,
        top: ColorKey,
    },

    #[error("step moves {expected_count} x {expected}, board allows {actual_count} x {actual}")]
    StepMismatch {
        expected: ColorKey,
        expected_count: usize,
        actual: ColorKey,
        actual_count: usize,
    },

    #[error("step {step} cannot be replayed: {source}")]
    InvalidStep {
        step: usize,
        #[source]
        source: Box<MoveError>,
    },
}

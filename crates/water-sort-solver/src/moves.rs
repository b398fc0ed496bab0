//! Pour moves: enumeration, application and replay.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, ColorKey};
use crate::error::MoveError;
use crate::pruning::is_cosmetic_relocation;

/// Transfer of `count` units of `color` from the top of `from` to the top of `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub color: ColorKey,
    pub count: usize,
}

impl Move {
    pub fn new(from: usize, to: usize, color: ColorKey, count: usize) -> Self {
        Self {
            from,
            to,
            color,
            count,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pour {} x {} from tube {} into tube {}",
            self.count, self.color, self.from, self.to
        )
    }
}

/// All legal, non-cosmetic pours on `board`, ordered by source then destination
pub fn possible_moves(board: &Board) -> Vec<Move> {
    let tube_count = board.tube_count();
    let mut moves = Vec::new();

    for from in 0..tube_count {
        let source = board.tube(from);
        let Some(color) = source.top_color() else {
            continue;
        };
        let run = source.run_length();

        for to in 0..tube_count {
            if from == to {
                continue;
            }
            let dest = board.tube(to);
            let available = dest.available_capacity();
            if available == 0 {
                continue;
            }

            let accepts = match dest.top_color() {
                None => true,
                Some(top) => top == color,
            };
            if !accepts || is_cosmetic_relocation(board, from, to) {
                continue;
            }

            moves.push(Move::new(from, to, color, run.min(available)));
        }
    }

    moves
}

impl Board {
    /// Apply a pour to a copy of the board.
    ///
    /// Source cells from the current top downward become unknown; the
    /// destination fills upward from just above its top (or from the sealed
    /// end when it has no top). The move is trusted; use [`Board::try_pour`]
    /// or [`replay`] to validate player input.
    pub fn apply_move(&self, mv: &Move) -> Board {
        let mut next = self.clone();
        let source_top = self.tube(mv.from).top_index().unwrap_or(0);
        let dest_start = self.tube(mv.to).available_capacity();

        let source = next.tube_mut(mv.from);
        for cell in source.iter_mut().skip(source_top).take(mv.count) {
            *cell = ColorKey::Unknown;
        }

        let dest = next.tube_mut(mv.to);
        for k in 0..mv.count.min(dest_start) {
            dest[dest_start - 1 - k] = mv.color;
        }

        next
    }

    /// Validate a pour chosen by a player and return the move it performs
    pub fn try_pour(&self, from: usize, to: usize) -> Result<Move, MoveError> {
        let tube_count = self.tube_count();
        for index in [from, to] {
            if index >= tube_count {
                return Err(MoveError::OutOfRange { index, tube_count });
            }
        }
        if from == to {
            return Err(MoveError::SameTube(from));
        }

        let source = self.tube(from);
        let color = source.top_color().ok_or(MoveError::NothingToPour(from))?;

        let dest = self.tube(to);
        let available = dest.available_capacity();
        if available == 0 {
            return Err(MoveError::DestinationFull(to));
        }
        if let Some(top) = dest.top_color() {
            if top != color {
                return Err(MoveError::ColorMismatch {
                    tube: to,
                    poured: color,
                    top,
                });
            }
        }

        Ok(Move::new(from, to, color, source.run_length().min(available)))
    }
}

/// Replay `steps` in order, checking each one against the board it applies to
pub fn replay(board: &Board, steps: &[Move]) -> Result<Board, MoveError> {
    let mut current = board.clone();

    for (step, mv) in steps.iter().enumerate() {
        let invalid = |source: MoveError| MoveError::InvalidStep {
            step,
            source: Box::new(source),
        };

        let actual = current.try_pour(mv.from, mv.to).map_err(invalid)?;
        if actual.color != mv.color || actual.count != mv.count {
            return Err(invalid(MoveError::StepMismatch {
                expected: mv.color,
                expected_count: mv.count,
                actual: actual.color,
                actual_count: actual.count,
            }));
        }

        current = current.apply_move(mv);
    }

    Ok(current)
}

/// For each step, whether its source tube still hides masked cells under
/// the poured run when the step is applied
///
/// Steps are applied without validation, as from a solver result.
pub fn excavation_flags(board: &Board, steps: &[Move]) -> Vec<bool> {
    let mut current = board.clone();
    steps
        .iter()
        .map(|mv| {
            let digs = current.tube(mv.from).has_undiscovered_below_top();
            current = current.apply_move(mv);
            digs
        })
        .collect()
}

//! Search space pruning rules for the move generator.
//!
//! These rules detect pours that can never help: the board after the pour is
//! no closer to sorted and nothing new gets uncovered.

use crate::board::Board;

/// Check if pouring `from` into `to` only relocates a finished column.
///
/// The source, from its top to the sealed end, is one revealed color with no
/// undiscovered cell underneath, and the destination has no top. The whole
/// run lands in the destination and the board is the same up to tube order.
/// Free space above the source's top does not matter; undiscovered content
/// under the run does, since pouring the run away is how it gets uncovered.
pub fn is_cosmetic_relocation(board: &Board, from: usize, to: usize) -> bool {
    let source = board.tube(from);
    let dest = board.tube(to);

    if dest.top_index().is_some() {
        return false;
    }

    let Some(top) = source.top_index() else {
        return false;
    };

    // Run reaching the sealed end means no other color and no mask below it
    source.run_length() == source.capacity() - top && !source.has_undiscovered_below_top()
}

#[cfg(test)]
mod tests {
    use crate::board::BoardShape;
    use crate::board::ColorKey::{DBlue as B, DRed as R, Unknown as U};
    use super::*;

    fn create_test_board() -> Board {
        Board::new(
            &[
                vec![R, R, R, R],
                vec![U, B, B, B],
                vec![B, U, U, U],
                vec![U, R, B, B],
                vec![U, U, U, U],
            ],
            BoardShape {
                tube_count: 5,
                capacity: 4,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_full_pure_tube_to_masked_is_pruned() {
        let board = create_test_board();
        assert!(is_cosmetic_relocation(&board, 0, 4));
    }

    #[test]
    fn test_pure_column_under_free_space_is_pruned() {
        let board = create_test_board();
        assert!(is_cosmetic_relocation(&board, 1, 4));
    }

    #[test]
    fn test_run_over_masked_content_not_pruned() {
        let board = create_test_board();
        assert!(!is_cosmetic_relocation(&board, 2, 4));
    }

    #[test]
    fn test_mixed_column_not_pruned() {
        let board = create_test_board();
        assert!(!is_cosmetic_relocation(&board, 3, 4));
    }

    #[test]
    fn test_destination_with_top_not_pruned() {
        let board = create_test_board();
        assert!(!is_cosmetic_relocation(&board, 1, 3));
        assert!(!is_cosmetic_relocation(&board, 4, 0));
    }
}

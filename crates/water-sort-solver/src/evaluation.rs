//! Board evaluation: terminal check, excavation score and color tally.

use crate::board::Board;

/// Every tube is either untouched or full of one color
pub fn is_solved(board: &Board) -> bool {
    board.tubes().all(|tube| tube.is_untouched() || tube.is_complete())
}

/// Sum of revealed cells sitting above the first masked cell of each tube.
///
/// Lower is better. Used only to rank fallback paths, never to order the
/// search.
pub fn excavation_score(board: &Board) -> usize {
    board
        .tubes()
        .filter_map(|tube| tube.first_undiscovered())
        .sum()
}

/// Describe colors whose revealed count cannot fill whole tubes
pub fn parity_advisory(board: &Board) -> Option<String> {
    let capacity = board.capacity();
    let uneven: Vec<String> = board
        .color_counts()
        .into_iter()
        .filter(|&(_, count)| count % capacity != 0)
        .map(|(color, count)| format!("{} ({})", color, count))
        .collect();

    if uneven.is_empty() {
        None
    } else {
        Some(format!(
            "color counts not a multiple of {}: {}",
            capacity,
            uneven.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::board::BoardShape;
    use crate::board::ColorKey::{self, DBlue as B, DRed as R, Gray as G, Unknown as U};
    use super::*;

    fn board(tubes: &[Vec<ColorKey>]) -> Board {
        Board::new(
            tubes,
            BoardShape {
                tube_count: tubes.len(),
                capacity: 4,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_all_masked_is_solved() {
        let b = Board::masked(BoardShape::default()).unwrap();
        assert!(is_solved(&b));
        assert_eq!(excavation_score(&b), 0);
    }

    #[test]
    fn test_full_pure_tubes_are_solved() {
        let b = board(&[vec![R, R, R, R], vec![U, U, U, U], vec![B, B, B, B]]);
        assert!(is_solved(&b));
    }

    #[test]
    fn test_partial_tube_is_not_solved() {
        assert!(!is_solved(&board(&[vec![U, U, R, R], vec![U, U, R, R]])));
        assert!(!is_solved(&board(&[vec![R, U, U, U]])));
        assert!(!is_solved(&board(&[vec![R, R, R, B]])));
        assert!(!is_solved(&board(&[vec![R, R, U, R]])));
    }

    #[test]
    fn test_classification_is_repeatable() {
        let b = board(&[vec![U, R, R, R], vec![B, B, B, B]]);
        let first = is_solved(&b);
        assert_eq!(first, is_solved(&b));
        assert!(!first);
    }

    #[test]
    fn test_excavation_score() {
        let b = board(&[
            vec![R, B, U, U],
            vec![G, U, U, U],
            vec![U, U, R, R],
            vec![R, R, B, B],
        ]);
        // 2 + 1 + 0 + 0
        assert_eq!(excavation_score(&b), 3);
    }

    #[test]
    fn test_parity_advisory() {
        let even = board(&[vec![R, R, B, B], vec![B, B, R, R]]);
        assert_eq!(parity_advisory(&even), None);

        let uneven = board(&[vec![U, U, R, R], vec![U, G, G, B], vec![U, U, U, U]]);
        assert_eq!(
            parity_advisory(&uneven).as_deref(),
            Some("color counts not a multiple of 4: GRAY (2), D_BLUE (1), D_RED (2)")
        );
    }
}

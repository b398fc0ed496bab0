//! Board representation types that match the JSON format of saved boards.
//!
//! A board is a row of tubes. Cell 0 of every tube is the open end and the
//! last cell is the sealed bottom. Cells are stored in one flat buffer so a
//! search expansion is a single copy.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::BoardError;

/// Default number of tubes on a board
pub const DEFAULT_TUBE_COUNT: usize = 14;
/// Default number of cells per tube
pub const DEFAULT_CAPACITY: usize = 4;

/// Inline storage big enough for the default 14 x 4 board
type Cells = SmallVec<[ColorKey; 64]>;

/// Cell color. `Unknown` marks a cell whose color is not revealed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ColorKey {
    Yellow,
    LGreen,
    Skin,
    DPurple,
    DGreen,
    Gray,
    DBlue,
    LBlue,
    Orange,
    Cyan,
    Purple,
    DRed,
    Unknown,
}

impl ColorKey {
    /// Revealed colors in palette order
    pub const PALETTE: [ColorKey; 12] = [
        ColorKey::Yellow,
        ColorKey::LGreen,
        ColorKey::Skin,
        ColorKey::DPurple,
        ColorKey::DGreen,
        ColorKey::Gray,
        ColorKey::DBlue,
        ColorKey::LBlue,
        ColorKey::Orange,
        ColorKey::Cyan,
        ColorKey::Purple,
        ColorKey::DRed,
    ];

    /// The cell is free space when it sits above a tube's top.
    ///
    /// Same value as [`ColorKey::is_undiscovered`]; the two names keep the
    /// role of the sentinel visible at each call site.
    pub fn is_empty_capacity(self) -> bool {
        self == ColorKey::Unknown
    }

    /// The cell holds content whose color has not been revealed.
    pub fn is_undiscovered(self) -> bool {
        self == ColorKey::Unknown
    }

    pub fn is_revealed(self) -> bool {
        self != ColorKey::Unknown
    }

    /// Single character used in canonical keys
    pub fn code(self) -> char {
        match self {
            ColorKey::Unknown => '?',
            color => (b'a' + color as u8) as char,
        }
    }

    /// Name as written in JSON
    pub fn name(self) -> &'static str {
        match self {
            ColorKey::Yellow => "YELLOW",
            ColorKey::LGreen => "L_GREEN",
            ColorKey::Skin => "SKIN",
            ColorKey::DPurple => "D_PURPLE",
            ColorKey::DGreen => "D_GREEN",
            ColorKey::Gray => "GRAY",
            ColorKey::DBlue => "D_BLUE",
            ColorKey::LBlue => "L_BLUE",
            ColorKey::Orange => "ORANGE",
            ColorKey::Cyan => "CYAN",
            ColorKey::Purple => "PURPLE",
            ColorKey::DRed => "D_RED",
            ColorKey::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tube count and cells per tube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardShape {
    pub tube_count: usize,
    pub capacity: usize,
}

impl Default for BoardShape {
    fn default() -> Self {
        Self {
            tube_count: DEFAULT_TUBE_COUNT,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Read-only view of one tube
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tube<'a> {
    cells: &'a [ColorKey],
}

impl<'a> Tube<'a> {
    pub fn cells(&self) -> &'a [ColorKey] {
        self.cells
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Lowest index holding a revealed color, `None` for an all-unknown tube
    pub fn top_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| !c.is_empty_capacity())
    }

    pub fn top_color(&self) -> Option<ColorKey> {
        self.top_index().map(|i| self.cells[i])
    }

    /// Number of cells from the top matching the top color.
    ///
    /// Stops at the first different color; an undiscovered cell always
    /// differs, so masked content is never poured.
    pub fn run_length(&self) -> usize {
        match self.top_index() {
            Some(top) => {
                let color = self.cells[top];
                self.cells[top..].iter().take_while(|&&c| c == color).count()
            }
            None => 0,
        }
    }

    /// Free cells above the top; a tube with no top offers its full capacity
    pub fn available_capacity(&self) -> usize {
        self.top_index().unwrap_or(self.cells.len())
    }

    /// Index of the first unknown cell scanning from the open end
    pub fn first_undiscovered(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_undiscovered())
    }

    /// Every cell unknown: an unexplored tube, also usable as an empty one
    pub fn is_untouched(&self) -> bool {
        self.cells.iter().all(|c| c.is_undiscovered())
    }

    /// Full of a single revealed color
    pub fn is_complete(&self) -> bool {
        match self.cells.first() {
            Some(&first) if first.is_revealed() => self.cells.iter().all(|&c| c == first),
            _ => false,
        }
    }

    /// Any undiscovered cell between the top and the sealed end
    pub fn has_undiscovered_below_top(&self) -> bool {
        match self.top_index() {
            Some(top) => self.cells[top..].iter().any(|c| c.is_undiscovered()),
            None => false,
        }
    }
}

/// A full board: `tube_count` tubes of `capacity` cells in one flat buffer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: Cells,
    capacity: usize,
}

impl Board {
    /// Build a board from nested tubes, checking it against `shape`
    pub fn new(tubes: &[Vec<ColorKey>], shape: BoardShape) -> Result<Self, BoardError> {
        if shape.tube_count == 0 || shape.capacity == 0 {
            return Err(BoardError::EmptyShape {
                tube_count: shape.tube_count,
                capacity: shape.capacity,
            });
        }
        if tubes.len() != shape.tube_count {
            return Err(BoardError::TubeCount {
                expected: shape.tube_count,
                found: tubes.len(),
            });
        }

        for (index, tube) in tubes.iter().enumerate() {
            if tube.len() != shape.capacity {
                return Err(BoardError::CellCount {
                    tube: index,
                    expected: shape.capacity,
                    found: tube.len(),
                });
            }
        }

        let mut cells = Cells::with_capacity(tubes.len() * shape.capacity);
        for tube in tubes {
            cells.extend_from_slice(tube);
        }

        Ok(Self {
            cells,
            capacity: shape.capacity,
        })
    }

    /// A board where every cell is unknown
    pub fn masked(shape: BoardShape) -> Result<Self, BoardError> {
        if shape.tube_count == 0 || shape.capacity == 0 {
            return Err(BoardError::EmptyShape {
                tube_count: shape.tube_count,
                capacity: shape.capacity,
            });
        }
        let len = shape
            .tube_count
            .checked_mul(shape.capacity)
            .ok_or(BoardError::TooLarge(shape))?;

        Ok(Self {
            cells: SmallVec::from_elem(ColorKey::Unknown, len),
            capacity: shape.capacity,
        })
    }

    pub fn shape(&self) -> BoardShape {
        BoardShape {
            tube_count: self.tube_count(),
            capacity: self.capacity,
        }
    }

    pub fn tube_count(&self) -> usize {
        self.cells.len() / self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// View of tube `index`. Panics if out of range.
    pub fn tube(&self, index: usize) -> Tube<'_> {
        let start = index * self.capacity;
        Tube {
            cells: &self.cells[start..start + self.capacity],
        }
    }

    pub fn tubes(&self) -> impl Iterator<Item = Tube<'_>> {
        self.cells.chunks(self.capacity).map(|cells| Tube { cells })
    }

    pub(crate) fn tube_mut(&mut self, index: usize) -> &mut [ColorKey] {
        let start = index * self.capacity;
        &mut self.cells[start..start + self.capacity]
    }

    /// Order-sensitive key used to detect visited boards.
    ///
    /// Cells are joined by `,` and tubes by `|`; two boards share a key only
    /// if every cell of every tube matches.
    pub fn canonical_key(&self) -> String {
        let mut key = String::with_capacity(self.cells.len() * 2);
        for (index, tube) in self.tubes().enumerate() {
            if index > 0 {
                key.push('|');
            }
            for (i, cell) in tube.cells().iter().enumerate() {
                if i > 0 {
                    key.push(',');
                }
                key.push(cell.code());
            }
        }
        key
    }

    /// Count of each palette color on the board, zero for absent colors
    pub fn color_counts(&self) -> BTreeMap<ColorKey, usize> {
        let mut counts: BTreeMap<ColorKey, usize> =
            ColorKey::PALETTE.iter().map(|&color| (color, 0)).collect();
        for &cell in self.cells.iter().filter(|c| c.is_revealed()) {
            *counts.entry(cell).or_insert(0) += 1;
        }
        counts
    }

    /// Tubes as nested vectors, the shape used in JSON
    pub fn to_nested(&self) -> Vec<Vec<ColorKey>> {
        self.tubes().map(|t| t.cells().to_vec()).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, tube) in self.tubes().enumerate() {
            write!(f, "{:>2}:", index)?;
            for cell in tube.cells() {
                write!(f, " {:<8}", cell.name())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_nested().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::ColorKey::{DBlue as B, DRed as R, Unknown as U};
    use super::*;

    fn shape(tube_count: usize) -> BoardShape {
        BoardShape {
            tube_count,
            capacity: 4,
        }
    }

    #[test]
    fn test_tube_introspection() {
        let tubes = [vec![U, R, R, B], vec![U, U, U, U], vec![B, B, B, B]];
        let board = Board::new(&tubes, shape(3)).unwrap();

        let partial = board.tube(0);
        assert_eq!(partial.top_index(), Some(1));
        assert_eq!(partial.top_color(), Some(R));
        assert_eq!(partial.run_length(), 2);
        assert_eq!(partial.available_capacity(), 1);

        let masked = board.tube(1);
        assert_eq!(masked.top_index(), None);
        assert_eq!(masked.top_color(), None);
        assert_eq!(masked.run_length(), 0);
        assert_eq!(masked.available_capacity(), 4);
        assert!(masked.is_untouched());

        let full = board.tube(2);
        assert_eq!(full.available_capacity(), 0);
        assert!(full.is_complete());
        assert!(!full.is_untouched());
    }

    #[test]
    fn test_run_length_stops_at_unknown() {
        let board = Board::new(&[vec![R, R, U, R]], shape(1)).unwrap();
        assert_eq!(board.tube(0).run_length(), 2);
        assert_eq!(board.tube(0).first_undiscovered(), Some(2));
        assert!(board.tube(0).has_undiscovered_below_top());
    }

    #[test]
    fn test_canonical_key_is_order_sensitive() {
        let a = Board::new(&[vec![R, R, R, R], vec![U, U, U, U]], shape(2)).unwrap();
        let b = Board::new(&[vec![U, U, U, U], vec![R, R, R, R]], shape(2)).unwrap();

        assert_eq!(a.canonical_key(), "l,l,l,l|?,?,?,?");
        assert_ne!(a.canonical_key(), b.canonical_key());
        assert_eq!(a.canonical_key(), a.clone().canonical_key());
    }

    #[test]
    fn test_shape_validation() {
        assert_eq!(
            Board::new(&[vec![U, U, U, U]], shape(2)),
            Err(BoardError::TubeCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Board::new(&[vec![U, U, U, U], vec![U, U]], shape(2)),
            Err(BoardError::CellCount {
                tube: 1,
                expected: 4,
                found: 2
            })
        );
        let empty = BoardShape {
            tube_count: 0,
            capacity: 4,
        };
        assert!(matches!(
            Board::new(&[], empty),
            Err(BoardError::EmptyShape { .. })
        ));
    }

    #[test]
    fn test_oversized_capacity_is_rejected() {
        let tubes = vec![vec![U]; 14];
        let huge = BoardShape {
            tube_count: 14,
            capacity: usize::MAX / 4 + 1,
        };

        assert_eq!(
            Board::new(&tubes, huge),
            Err(BoardError::CellCount {
                tube: 0,
                expected: huge.capacity,
                found: 1
            })
        );
        assert_eq!(Board::masked(huge), Err(BoardError::TooLarge(huge)));
    }

    #[test]
    fn test_masked_rejects_empty_shape() {
        let shape = BoardShape {
            tube_count: 14,
            capacity: 0,
        };
        assert!(matches!(
            Board::masked(shape),
            Err(BoardError::EmptyShape { .. })
        ));
    }

    #[test]
    fn test_color_counts_skip_unknown() {
        let board = Board::new(&[vec![U, R, R, B], vec![U, U, U, B]], shape(2)).unwrap();
        let counts = board.color_counts();
        assert_eq!(counts.get(&R), Some(&2));
        assert_eq!(counts.get(&B), Some(&2));
        assert_eq!(counts.get(&ColorKey::Yellow), Some(&0));
        assert_eq!(counts.get(&U), None);
        assert_eq!(counts.len(), ColorKey::PALETTE.len());
    }

    #[test]
    fn test_color_key_json_names() {
        let json = serde_json::to_string(&[ColorKey::LGreen, ColorKey::DPurple, U]).unwrap();
        assert_eq!(json, r#"["L_GREEN","D_PURPLE","UNKNOWN"]"#);

        let parsed: Vec<ColorKey> = serde_json::from_str(r#"["YELLOW","D_RED"]"#).unwrap();
        assert_eq!(parsed, vec![ColorKey::Yellow, R]);
        for color in ColorKey::PALETTE {
            let expected = format!("\"{}\"", color.name());
            assert_eq!(serde_json::to_string(&color).unwrap(), expected);
        }
    }

    #[test]
    fn test_masked_board() {
        let board = Board::masked(BoardShape::default()).unwrap();
        assert_eq!(board.shape(), BoardShape::default());
        assert_eq!(board.tube_count(), 14);
        assert_eq!(board.capacity(), 4);
        assert!(board.tubes().all(|t| t.is_untouched()));
    }
}

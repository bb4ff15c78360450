use crate::error::{ChessError, ChessResult};
use std::fmt::{Display, Formatter};

/// A square of the 8x8 board.
/// Row 0 is the eighth rank (black's back rank) and column 0 is the a-file,
/// so the board reads top to bottom the way it is printed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Builds a square, failing on anything outside the board
    /// ```
    /// use negachess::square::Square;
    /// assert!(Square::new(7, 4).is_ok());
    /// assert!(Square::new(8, 0).is_err());
    /// ```
    pub fn new(row: usize, col: usize) -> ChessResult<Square> {
        if row < 8 && col < 8 {
            Ok(Self::at(row, col))
        } else {
            Err(ChessError::InvalidSquare { row, col })
        }
    }

    /// In-bounds constructor for coordinates the caller already checked
    pub(crate) const fn at(row: usize, col: usize) -> Square {
        Square {
            row: row as u8,
            col: col as u8,
        }
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }
    pub fn col(&self) -> usize {
        self.col as usize
    }

    /// Steps by the given row and column deltas, returning None off the board
    /// ```
    /// use negachess::square::Square;
    /// let a1 = Square::parse("a1").unwrap();
    /// assert_eq!(a1.offset(-1, 1), Square::parse("b2"));
    /// assert_eq!(a1.offset(1, 0), None);
    /// ```
    pub fn offset(&self, dr: isize, dc: isize) -> Option<Square> {
        let row = self.row as isize + dr;
        let col = self.col as isize + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Self::at(row as usize, col as usize))
        } else {
            None
        }
    }

    /// The same square seen from the other side of the board
    pub fn mirrored(&self) -> Square {
        Self::at(7 - self.row(), self.col())
    }

    /// Every square, row by row from a8 to h1
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(|i| Self::at(i / 8, i % 8))
    }

    /// Parses a square from a given string slice,
    /// only caring that the first two characters form a valid square representation
    /// ```
    /// use negachess::square::Square;
    /// assert_eq!(Square::parse("e4"), Some(Square::new(4, 4).unwrap()));
    /// assert_eq!(Square::parse("d2someotherstuff"), Some(Square::new(6, 3).unwrap()));
    /// assert_eq!(Square::parse("randoma1stuff"), None);
    /// assert_eq!(Square::parse("k9"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Square> {
        let mut chars_iter = s.chars();
        let col = match chars_iter.next()? {
            c @ 'a'..='h' => c as usize - 'a' as usize,
            _ => return None,
        };
        let rank = match chars_iter.next()?.to_digit(10) {
            Some(i) if (1..=8).contains(&i) => i as usize,
            _ => return None,
        };
        Some(Self::at(8 - rank, col))
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.col) as char
    }
    pub fn rank_char(&self) -> char {
        (b'8' - self.row) as char
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

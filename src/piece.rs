use crate::piece::Color::{Black, White};
use crate::piece::PieceType::{Bishop, King, Knight, Pawn, Queen, Rook};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceType {
    pub fn is_bishop_like(&self) -> bool {
        matches!(self, Bishop | Queen)
    }
    pub fn is_rook_like(&self) -> bool {
        matches!(self, Queen | Rook)
    }
    pub fn letter(&self) -> char {
        match self {
            Pawn => 'p',
            Knight => 'n',
            Bishop => 'b',
            Rook => 'r',
            Queen => 'q',
            King => 'k',
        }
    }
}
impl Display for PieceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            White => Black,
            Black => White,
        }
    }
    /// Row delta of a pawn advance for this color (row 0 is black's back rank)
    pub fn forward(&self) -> isize {
        match self {
            White => -1,
            Black => 1,
        }
    }
    /// Row on which this color's pieces start
    pub fn back_row(&self) -> usize {
        match self {
            White => 7,
            Black => 0,
        }
    }
    pub fn pawn_row(&self) -> usize {
        match self {
            White => 6,
            Black => 1,
        }
    }
    /// Row a pawn of this color promotes on
    pub fn promotion_row(&self) -> usize {
        self.opposite().back_row()
    }
    /// +1 for white, -1 for black, used to sign scores
    pub fn sign(&self) -> f32 {
        match self {
            White => 1.0,
            Black => -1.0,
        }
    }
}
impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self == &Black { "b" } else { "w" })
    }
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece { piece_type, color }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let piece_type = match c.to_ascii_lowercase() {
            'p' => Pawn,
            'n' => Knight,
            'b' => Bishop,
            'r' => Rook,
            'q' => Queen,
            'k' => King,
            _ => return None,
        };
        let color = if c.is_lowercase() { Black } else { White };
        Some(Piece { piece_type, color })
    }

    pub fn to_char(&self) -> char {
        let c = self.piece_type.letter();
        if self.color == White {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_conversion_keeps_color() {
        assert_eq!(Piece::from_char('Q'), Some(Piece::new(White, Queen)));
        assert_eq!(Piece::from_char('n'), Some(Piece::new(Black, Knight)));
        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(Piece::new(Black, Rook).to_string(), "r");
        assert_eq!(Piece::new(White, King).to_string(), "K");
    }

    #[test]
    fn pawn_geometry_is_mirrored() {
        assert_eq!(White.forward(), -1);
        assert_eq!(Black.forward(), 1);
        assert_eq!(White.promotion_row(), 0);
        assert_eq!(Black.promotion_row(), 7);
        assert_eq!(White.pawn_row() as isize + 5 * White.forward(), 1);
    }
}

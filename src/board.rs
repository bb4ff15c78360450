use crate::piece::Color::{Black, White};
use crate::piece::PieceType::{Bishop, King, Knight, Pawn, Queen, Rook};
use crate::piece::{Piece, PieceType};
use crate::square::Square;
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

const BACK_RANK: [PieceType; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

/// The bare 8x8 grid of square contents
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board([[Option<Piece>; 8]; 8]);

impl Board {
    pub const EMPTY: Board = Board([[None; 8]; 8]);

    /// The standard initial setup
    pub fn initial() -> Board {
        let mut b = Self::EMPTY;
        for color in [White, Black] {
            for (col, piece_type) in BACK_RANK.iter().enumerate() {
                b.0[color.back_row()][col] = Some(Piece::new(color, *piece_type));
            }
            for col in 0..8 {
                b.0[color.pawn_row()][col] = Some(Piece::new(color, Pawn));
            }
        }
        b
    }

    /// Every occupied square together with its piece
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self[sq].map(|p| (sq, p)))
    }

    pub fn find(&self, piece: Piece) -> impl Iterator<Item = Square> + '_ {
        self.pieces().filter(move |(_, p)| *p == piece).map(|(sq, _)| sq)
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, sq: Square) -> &Self::Output {
        &self.0[sq.row()][sq.col()]
    }
}
impl IndexMut<Square> for Board {
    fn index_mut(&mut self, sq: Square) -> &mut Self::Output {
        &mut self.0[sq.row()][sq.col()]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (row, squares) in self.0.iter().enumerate() {
            let line: Vec<String> = squares
                .iter()
                .map(|p| p.map_or(String::from("."), |p| p.to_string()))
                .collect();
            writeln!(f, "{} {}", 8 - row, line.join(" "))?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_board_has_one_king_per_side() {
        let b = Board::initial();
        assert_eq!(b.pieces().count(), 32);
        assert_eq!(
            b.find(Piece::new(White, King)).collect::<Vec<_>>(),
            vec![Square::parse("e1").unwrap()]
        );
        assert_eq!(
            b.find(Piece::new(Black, King)).collect::<Vec<_>>(),
            vec![Square::parse("e8").unwrap()]
        );
        assert_eq!(b[Square::parse("d1").unwrap()], Some(Piece::new(White, Queen)));
        assert_eq!(b[Square::parse("e4").unwrap()], None);
    }

    #[test]
    fn display_prints_rank_eight_first() {
        let s = Board::initial().to_string();
        let first = s.lines().next().unwrap();
        assert_eq!(first, "8 r n b q k b n r");
        assert!(s.ends_with("  a b c d e f g h"));
    }
}

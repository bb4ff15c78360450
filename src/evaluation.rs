use crate::board::Board;
use crate::piece::Color::White;
use crate::piece::{Piece, PieceType};
use crate::position::Position;
use crate::square::Square;

/// Scores are in pawn tenths; positive favours white.
/// Table entries are multiples of one half, which f32 adds exactly.
pub type Score = f32;

type PieceSquareTable = [[Score; 8]; 8];

// All tables are seen from white's side, row 0 being the eighth rank.
// Black reads them mirrored.
const KNIGHT_TABLE: PieceSquareTable = [
    [-5.0, -4.0, -3.0, -3.0, -3.0, -3.0, -4.0, -5.0],
    [-4.0, -2.0, 0.0, 0.0, 0.0, 0.0, -2.0, -4.0],
    [-3.0, 0.0, 0.5, 1.5, 1.5, 0.5, 0.0, -3.0],
    [-3.0, 0.5, 1.5, 2.0, 2.0, 1.5, 0.5, -3.0],
    [-3.0, 0.0, 1.5, 2.0, 2.0, 1.5, 0.0, -3.0],
    [-3.0, 0.5, 1.0, 1.5, 1.5, 1.0, 0.5, -3.0],
    [-4.0, -2.0, 0.0, 0.0, 0.0, 0.0, -2.0, -4.0],
    [-5.0, -4.0, -3.0, -3.0, -3.0, -3.0, -4.0, -5.0],
];
const BISHOP_TABLE: PieceSquareTable = [
    [-2.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -2.0],
    [-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0],
    [-1.0, 0.0, 0.5, 1.0, 1.0, 0.5, 0.0, -1.0],
    [-1.0, 0.5, 0.5, 1.0, 1.0, 0.5, 0.5, -1.0],
    [-1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, -1.0],
    [-1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -1.0],
    [-1.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.5, -1.0],
    [-2.0, -1.0, -1.0, -1.0, -1.0, -1.0, -1.0, -2.0],
];
const ROOK_TABLE: PieceSquareTable = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.5, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.5],
    [-0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.5],
    [-0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.5],
    [-0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.5],
    [-0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.5],
    [-0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.5],
    [0.0, 0.0, 0.5, 0.5, 0.5, 0.0, 0.0, 0.0],
];
const QUEEN_TABLE: PieceSquareTable = [
    [-2.0, -1.0, -1.0, -0.5, -0.5, -1.0, -1.0, -2.0],
    [-1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0],
    [-1.0, 0.0, 0.5, 0.5, 0.5, 0.5, 0.0, -1.0],
    [-0.5, 0.0, 0.5, 0.5, 0.5, 0.5, 0.0, -0.5],
    [0.0, 0.0, 0.5, 0.5, 0.5, 0.5, 0.0, -0.5],
    [-1.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.0, -1.0],
    [-1.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0, -1.0],
    [-2.0, -1.0, -1.0, -0.5, -0.5, -1.0, -1.0, -2.0],
];
const PAWN_TABLE: PieceSquareTable = [
    [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0],
    [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0],
    [1.0, 1.0, 2.0, 3.0, 3.0, 2.0, 1.0, 1.0],
    [0.5, 0.5, 1.0, 2.5, 2.5, 1.0, 0.5, 0.5],
    [0.0, 0.0, 0.0, 2.0, 2.0, 0.0, 0.0, 0.0],
    [0.0, -0.5, -1.0, 0.0, 0.0, -1.0, -0.5, 0.0],
    [0.5, 1.0, 1.0, -2.0, -2.0, 1.0, 1.0, 0.5],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
];
const KING_TABLE: PieceSquareTable = [
    [-3.0, -4.0, -4.0, -5.0, -5.0, -4.0, -4.0, -3.0],
    [-3.0, -4.0, -4.0, -5.0, -5.0, -4.0, -4.0, -3.0],
    [-3.0, -4.0, -4.0, -5.0, -5.0, -4.0, -4.0, -3.0],
    [-3.0, -4.0, -4.0, -5.0, -5.0, -4.0, -4.0, -3.0],
    [-2.0, -3.0, -3.0, -4.0, -4.0, -3.0, -3.0, -2.0],
    [-1.0, -2.0, -2.0, -2.0, -2.0, -2.0, -2.0, -1.0],
    [2.0, 2.0, 0.0, 0.0, 0.0, 0.0, 2.0, 2.0],
    [2.0, 3.0, 1.0, 0.0, 0.0, 1.0, 3.0, 2.0],
];

pub struct Evaluation;

impl Evaluation {
    /// Indexed by piece type: pawn, knight, bishop, rook, queen, king
    pub const PIECE_TYPE_VALUE: [Score; 6] = [10.0, 30.0, 30.0, 50.0, 90.0, 900.0];
    pub const MATE_SCORE: Score = 10000.0;
    pub const DRAW_SCORE: Score = 0.0;

    pub fn piece_value(piece_type: PieceType) -> Score {
        Self::PIECE_TYPE_VALUE[piece_type as usize]
    }

    /// Raw material balance, white minus black
    pub fn material(board: &Board) -> Score {
        board
            .pieces()
            .map(|(_, p)| p.color.sign() * Self::piece_value(p.piece_type))
            .sum()
    }

    /// Positional bonus of a piece standing on a square, from its own side's view
    pub fn square_bonus(piece: Piece, sq: Square) -> Score {
        let table = match piece.piece_type {
            PieceType::Pawn => &PAWN_TABLE,
            PieceType::Knight => &KNIGHT_TABLE,
            PieceType::Bishop => &BISHOP_TABLE,
            PieceType::Rook => &ROOK_TABLE,
            PieceType::Queen => &QUEEN_TABLE,
            PieceType::King => &KING_TABLE,
        };
        let sq = if piece.color == White { sq } else { sq.mirrored() };
        table[sq.row()][sq.col()]
    }

    /// Static score of a position, positive when white stands better.
    /// Terminal flags are read as set by the last legal move generation.
    pub fn positional(position: &Position) -> Score {
        if position.is_checkmate() {
            // The side to move has been mated
            return -position.side_to_move().sign() * Self::MATE_SCORE;
        }
        if position.is_stalemate() {
            return Self::DRAW_SCORE;
        }

        position
            .board()
            .pieces()
            .map(|(sq, p)| {
                p.color.sign() * (Self::piece_value(p.piece_type) + Self::square_bonus(p, sq))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::castling::CastlingRights;
    use crate::piece::Color::Black;
    use crate::piece::PieceType::{King, Knight, Pawn, Queen, Rook};

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    #[test]
    fn starting_position_is_balanced() {
        let position = Position::new();
        assert_eq!(Evaluation::material(position.board()), 0.0);
        assert_eq!(Evaluation::positional(&position), 0.0);
    }

    #[test]
    fn material_counts_sign_by_color() {
        let position = Position::with_pieces(
            &[
                (sq("e1"), Piece::new(White, King)),
                (sq("d1"), Piece::new(White, Queen)),
                (sq("e8"), Piece::new(Black, King)),
                (sq("a8"), Piece::new(Black, Rook)),
                (sq("b7"), Piece::new(Black, Pawn)),
            ],
            White,
            CastlingRights::NONE,
        )
        .unwrap();
        assert_eq!(Evaluation::material(position.board()), 90.0 - 50.0 - 10.0);
    }

    #[test]
    fn tables_are_mirrored_for_black() {
        let white_knight = Piece::new(White, Knight);
        let black_knight = Piece::new(Black, Knight);
        for s in Square::all() {
            assert_eq!(
                Evaluation::square_bonus(white_knight, s),
                Evaluation::square_bonus(black_knight, s.mirrored())
            );
        }
        assert_eq!(Evaluation::square_bonus(Piece::new(White, Pawn), sq("e4")), 2.0);
        assert_eq!(Evaluation::square_bonus(Piece::new(Black, Pawn), sq("e5")), 2.0);
        assert_eq!(Evaluation::square_bonus(Piece::new(White, King), sq("g1")), 3.0);
        assert_eq!(Evaluation::square_bonus(Piece::new(Black, King), sq("g8")), 3.0);
    }

    #[test]
    fn central_pawn_push_scores_for_white() {
        let mut position = Position::new();
        position.make_from_str("e2e4").unwrap();
        // e2 is worth -2, e4 is worth +2
        assert_eq!(Evaluation::positional(&position), 4.0);
    }

    #[test]
    fn checkmate_rewards_the_side_that_delivered_it() {
        let mut position = Position::new();
        for m in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            position.make_from_str(m).unwrap();
        }
        position.legal_moves();
        assert_eq!(Evaluation::positional(&position), -Evaluation::MATE_SCORE);
    }

    #[test]
    fn stalemate_is_a_draw() {
        let mut position = Position::with_pieces(
            &[
                (sq("a8"), Piece::new(Black, King)),
                (sq("c7"), Piece::new(White, Queen)),
                (sq("b6"), Piece::new(White, King)),
            ],
            Black,
            CastlingRights::NONE,
        )
        .unwrap();
        position.legal_moves();
        assert!(position.is_stalemate());
        assert_eq!(Evaluation::positional(&position), Evaluation::DRAW_SCORE);
    }
}

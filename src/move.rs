use crate::piece::{Color, Piece, PieceType};
use crate::square::Square;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// What kind of special handling a move needs when applied
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveFlags {
    Normal,
    EnPassant,
    Castle,
    /// Pawn reaching the far rank, always becomes a queen
    Promotion,
}

/// A single ply, snapshotted from the position it was generated in.
/// Two moves compare equal when they share start and end squares.
#[derive(Debug, Copy, Clone)]
pub struct Move {
    start: Square,
    end: Square,
    piece_moved: Piece,
    piece_captured: Option<Piece>,
    flags: MoveFlags,
}

impl Move {
    /// A regular move or capture. Pawns landing on the far rank are
    /// flagged as promotions.
    pub fn new(start: Square, end: Square, piece_moved: Piece, piece_captured: Option<Piece>) -> Move {
        let flags = if piece_moved.piece_type == PieceType::Pawn
            && end.row() == piece_moved.color.promotion_row()
        {
            MoveFlags::Promotion
        } else {
            MoveFlags::Normal
        };
        Move {
            start,
            end,
            piece_moved,
            piece_captured,
            flags,
        }
    }
    /// A pawn capturing en passant: the captured pawn is not on `end`
    pub fn new_en_passant(start: Square, end: Square, pawn: Piece) -> Move {
        Move {
            start,
            end,
            piece_moved: pawn,
            piece_captured: Some(Piece::new(pawn.color.opposite(), PieceType::Pawn)),
            flags: MoveFlags::EnPassant,
        }
    }
    /// A castling move, described by the king's two squares
    pub fn new_castle(start: Square, end: Square, king: Piece) -> Move {
        Move {
            start,
            end,
            piece_moved: king,
            piece_captured: None,
            flags: MoveFlags::Castle,
        }
    }

    pub fn start(&self) -> Square {
        self.start
    }
    pub fn end(&self) -> Square {
        self.end
    }
    pub fn piece_moved(&self) -> Piece {
        self.piece_moved
    }
    pub fn piece_captured(&self) -> Option<Piece> {
        self.piece_captured
    }
    pub fn flags(&self) -> MoveFlags {
        self.flags
    }
    pub fn mover(&self) -> Color {
        self.piece_moved.color
    }

    pub fn is_capture(&self) -> bool {
        self.piece_captured.is_some()
    }
    pub fn is_en_passant(&self) -> bool {
        self.flags == MoveFlags::EnPassant
    }
    pub fn is_castle(&self) -> bool {
        self.flags == MoveFlags::Castle
    }
    pub fn is_promotion(&self) -> bool {
        self.flags == MoveFlags::Promotion
    }
    pub fn is_two_square_advance(&self) -> bool {
        self.piece_moved.piece_type == PieceType::Pawn && self.start.row().abs_diff(self.end.row()) == 2
    }

    /// The piece standing on `end` once the move is made
    pub fn piece_placed(&self) -> Piece {
        if self.is_promotion() {
            Piece::new(self.piece_moved.color, PieceType::Queen)
        } else {
            self.piece_moved
        }
    }

    /// Where the pawn taken en passant actually stood: beside the mover's start
    pub fn en_passant_capture_square(&self) -> Square {
        Square::at(self.start.row(), self.end.col())
    }

    /// Origin and destination of the rook in a castling move
    pub fn castle_rook_squares(&self) -> Option<(Square, Square)> {
        if !self.is_castle() {
            return None;
        }
        let row = self.end.row();
        if self.end.col() > self.start.col() {
            Some((Square::at(row, 7), Square::at(row, self.end.col() - 1)))
        } else {
            Some((Square::at(row, 0), Square::at(row, self.end.col() + 1)))
        }
    }

    /// Short, move-log style notation ("Nf3", "exd5", "O-O")
    pub fn notation(&self) -> String {
        if self.is_castle() {
            return String::from(if self.end.col() > self.start.col() { "O-O" } else { "O-O-O" });
        }
        let mut s = String::new();
        if self.piece_moved.piece_type == PieceType::Pawn {
            if self.is_capture() {
                s.push(self.start.file_char());
                s.push('x');
            }
        } else {
            s.push(self.piece_moved.piece_type.letter().to_ascii_uppercase());
            if self.is_capture() {
                s.push('x');
            }
        }
        s.push_str(&self.end.to_string());
        if self.is_promotion() {
            s.push_str("=Q");
        }
        s
    }

    /// Parses a move formatted in long algebraic notation.
    /// Only the squares are meaningful, flags come from the legal move list
    pub fn parse(mv: &str) -> Option<(Square, Square)> {
        if !mv.is_ascii() || mv.len() < 4 {
            return None;
        }
        let start = Square::parse(&mv[0..2])?;
        let end = Square::parse(&mv[2..4])?;
        match &mv[4..] {
            "" | "q" => Some((start, end)),
            _ => None,
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}
impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_promotion() {
            write!(f, "{}{}q", self.start, self.end)
        } else {
            write!(f, "{}{}", self.start, self.end)
        }
    }
}

use crate::board::Board;
use crate::castling::CastlingRights;
use crate::error::{ChessError, ChessResult};
use crate::history::HistoryEntry;
use crate::move_generator;
use crate::movelist::MoveList;
use crate::piece::Color::{Black, White};
use crate::piece::PieceType::{King, Pawn, Rook};
use crate::piece::{Color, Piece};
use crate::r#move::{Move, MoveFlags};
use crate::square::Square;
use std::fmt::{Display, Formatter};

/// The authoritative game state.
///
/// A position is mutated in place by [`Position::apply_move`] and
/// [`Position::undo_move`]; search recurses on the same instance, so the two
/// must stay exact mirrors of each other.
#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    king_squares: [Square; 2],
    castling_rights: CastlingRights,
    ep_target: Option<Square>,
    history_entries: Vec<HistoryEntry>,
    checkmate: bool,
    stalemate: bool,
}

impl Position {
    /// Creates the standard starting position
    pub fn new() -> Position {
        Position {
            board: Board::initial(),
            side_to_move: White,
            king_squares: [Square::at(7, 4), Square::at(0, 4)],
            castling_rights: CastlingRights::new(),
            ep_target: None,
            history_entries: Vec::with_capacity(128),
            checkmate: false,
            stalemate: false,
        }
    }

    /// Builds a position from an explicit piece placement.
    /// Castling rights whose king or rook is not on its home square are dropped.
    pub fn with_pieces(
        pieces: &[(Square, Piece)],
        side_to_move: Color,
        castling_rights: CastlingRights,
    ) -> ChessResult<Position> {
        let mut board = Board::EMPTY;
        for (sq, piece) in pieces {
            if board[*sq].is_some() {
                return Err(ChessError::InvalidSetup(format!("two pieces on {}", sq)));
            }
            if piece.piece_type == Pawn && (sq.row() == 0 || sq.row() == 7) {
                return Err(ChessError::InvalidSetup(format!("pawn on back rank at {}", sq)));
            }
            board[*sq] = Some(*piece);
        }

        let mut king_squares = [Square::at(0, 0); 2];
        for color in [White, Black] {
            let kings: Vec<Square> = board.find(Piece::new(color, King)).collect();
            match kings.as_slice() {
                [sq] => king_squares[color as usize] = *sq,
                _ => {
                    return Err(ChessError::InvalidSetup(format!(
                        "expected exactly one {:?} king, found {}",
                        color,
                        kings.len()
                    )))
                }
            }
        }

        let mut rights = castling_rights;
        for color in [White, Black] {
            let row = color.back_row();
            let rook = Some(Piece::new(color, Rook));
            if king_squares[color as usize] != Square::at(row, 4) {
                rights.revoke(color);
            }
            if board[Square::at(row, 7)] != rook {
                rights.revoke_kingside(color);
            }
            if board[Square::at(row, 0)] != rook {
                rights.revoke_queenside(color);
            }
        }

        Ok(Position {
            board,
            side_to_move,
            king_squares,
            castling_rights: rights,
            ep_target: None,
            history_entries: Vec::with_capacity(128),
            checkmate: false,
            stalemate: false,
        })
    }

    /// Makes a move on the board.
    /// The move is expected to come from [`Position::legal_moves`] for this
    /// exact position; anything else leaves the position in an undefined state.
    pub fn apply_move(&mut self, mv: Move) {
        debug_assert_eq!(
            self.board[mv.start()],
            Some(mv.piece_moved()),
            "{} does not start from the moved piece",
            mv
        );
        debug_assert_eq!(mv.mover(), self.side_to_move, "{} played out of turn", mv);

        self.history_entries.push(HistoryEntry {
            move_played: mv,
            ep_target: self.ep_target,
            castling_rights: self.castling_rights,
        });

        self.board[mv.start()] = None;
        self.board[mv.end()] = Some(mv.piece_placed());
        if mv.piece_moved().piece_type == King {
            self.king_squares[mv.mover() as usize] = mv.end();
        }

        match mv.flags() {
            MoveFlags::EnPassant => self.board[mv.en_passant_capture_square()] = None,
            MoveFlags::Castle => {
                if let Some((rook_origin, rook_target)) = mv.castle_rook_squares() {
                    let rook = self.board[rook_origin].take();
                    self.board[rook_target] = rook;
                }
            }
            MoveFlags::Normal | MoveFlags::Promotion => (),
        }

        self.ep_target = if mv.is_two_square_advance() {
            Some(Square::at(
                (mv.start().row() + mv.end().row()) / 2,
                mv.start().col(),
            ))
        } else {
            None
        };

        self.update_castling_rights(&mv);
        self.side_to_move = self.side_to_move.opposite();
    }

    /// Unmakes the move on the top of the history stack, if any
    pub fn undo_move(&mut self) {
        let entry = if let Some(h) = self.history_entries.pop() { h } else { return };
        let mv = entry.move_played;

        self.board[mv.start()] = Some(mv.piece_moved());
        match mv.flags() {
            MoveFlags::EnPassant => {
                self.board[mv.end()] = None;
                self.board[mv.en_passant_capture_square()] = mv.piece_captured();
            }
            MoveFlags::Castle => {
                self.board[mv.end()] = None;
                if let Some((rook_origin, rook_target)) = mv.castle_rook_squares() {
                    let rook = self.board[rook_target].take();
                    self.board[rook_origin] = rook;
                }
            }
            MoveFlags::Normal | MoveFlags::Promotion => self.board[mv.end()] = mv.piece_captured(),
        }
        if mv.piece_moved().piece_type == King {
            self.king_squares[mv.mover() as usize] = mv.start();
        }

        self.castling_rights = entry.castling_rights;
        self.ep_target = entry.ep_target;
        self.side_to_move = self.side_to_move.opposite();
        self.checkmate = false;
        self.stalemate = false;
    }

    fn update_castling_rights(&mut self, mv: &Move) {
        match mv.piece_moved().piece_type {
            King => self.castling_rights.revoke(mv.mover()),
            Rook => self.revoke_corner(mv.mover(), mv.start()),
            _ => (),
        }
        if let Some(captured) = mv.piece_captured() {
            if captured.piece_type == Rook {
                self.revoke_corner(captured.color, mv.end());
            }
        }
    }

    fn revoke_corner(&mut self, color: Color, sq: Square) {
        if sq.row() != color.back_row() {
            return;
        }
        match sq.col() {
            0 => self.castling_rights.revoke_queenside(color),
            7 => self.castling_rights.revoke_kingside(color),
            _ => (),
        }
    }

    /// Given a string in long algebraic notation, makes the move if it is legal
    pub fn make_from_str(&mut self, move_str: &str) -> ChessResult<Move> {
        let (start, end) = Move::parse(move_str)
            .ok_or_else(|| ChessError::InvalidNotation(move_str.to_string()))?;
        let mv = self
            .legal_moves()
            .find(start, end)
            .ok_or_else(|| ChessError::IllegalMove(move_str.to_string()))?;
        self.apply_move(mv);
        Ok(mv)
    }

    /// Legal moves for the side to move. Refreshes the checkmate and
    /// stalemate flags as a side effect.
    pub fn legal_moves(&mut self) -> MoveList {
        move_generator::legal_moves(self)
    }

    pub fn is_in_check(&self) -> bool {
        move_generator::in_check(self, self.side_to_move)
    }

    pub(crate) fn set_terminal_flags(&mut self, checkmate: bool, stalemate: bool) {
        self.checkmate = checkmate;
        self.stalemate = stalemate;
    }

    /*
    GETTERS
     */
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board[sq]
    }

    /// Same as [`Position::piece_at`] but from raw coordinates
    pub fn piece_at_coords(&self, row: usize, col: usize) -> ChessResult<Option<Piece>> {
        Ok(self.board[Square::new(row, col)?])
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color as usize]
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.ep_target
    }

    pub fn history_len(&self) -> usize {
        self.history_entries.len()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history_entries.last().map(|h| h.move_played)
    }

    /// Moves played since the start of the game, oldest first
    pub fn moves_played(&self) -> impl Iterator<Item = Move> + '_ {
        self.history_entries.iter().map(|h| h.move_played)
    }

    /// Only meaningful after [`Position::legal_moves`] has run on this position
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Only meaningful after [`Position::legal_moves`] has run on this position
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    pub fn is_game_over(&self) -> bool {
        self.checkmate || self.stalemate
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let grid = self.board.to_string();
        let info = [
            format!("side to move: {}", self.side_to_move),
            format!("castling rights: {}", self.castling_rights),
            format!(
                "en passant: {}",
                self.ep_target.map_or(String::from("-"), |sq| sq.to_string())
            ),
            format!("ply: {}", self.history_entries.len()),
        ];
        let mut lines = grid.lines();
        for extra in info.iter() {
            if let Some(line) = lines.next() {
                writeln!(f, "{}  {}", line, extra)?;
            }
        }
        let rest: Vec<&str> = lines.collect();
        write!(f, "{}", rest.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceType::{Bishop, Knight, Queen};
    use proptest::prelude::*;
    use rand::prelude::*;

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    fn play(position: &mut Position, moves: &[&str]) {
        for m in moves {
            position.make_from_str(m).unwrap();
        }
    }

    #[test]
    fn undo_on_empty_history_is_a_no_op() {
        let mut position = Position::new();
        position.undo_move();
        assert_eq!(position, Position::new());
    }

    #[test]
    fn two_square_advance_sets_en_passant_for_one_ply() {
        let mut position = Position::new();
        play(&mut position, &["e2e4"]);
        assert_eq!(position.en_passant_target(), Some(sq("e3")));
        play(&mut position, &["g8f6"]);
        assert_eq!(position.en_passant_target(), None);
        play(&mut position, &["d2d3"]);
        assert_eq!(position.en_passant_target(), None);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn_and_undo_restores_it() {
        let mut position = Position::new();
        play(&mut position, &["e2e4", "a7a6", "e4e5", "d7d5"]);
        let before = position.clone();

        let mv = position.make_from_str("e5d6").unwrap();
        assert!(mv.is_en_passant());
        assert_eq!(position.piece_at(sq("d5")), None);
        assert_eq!(position.piece_at(sq("d6")), Some(Piece::new(White, Pawn)));

        position.undo_move();
        assert_eq!(position, before);
        assert_eq!(position.piece_at(sq("d5")), Some(Piece::new(Black, Pawn)));
    }

    #[test]
    fn castling_moves_the_rook_and_clears_rights() {
        let mut position = Position::new();
        play(&mut position, &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"]);
        let before = position.clone();

        let mv = position.make_from_str("e1g1").unwrap();
        assert!(mv.is_castle());
        assert_eq!(position.piece_at(sq("g1")), Some(Piece::new(White, King)));
        assert_eq!(position.piece_at(sq("f1")), Some(Piece::new(White, Rook)));
        assert_eq!(position.piece_at(sq("h1")), None);
        assert_eq!(position.king_square(White), sq("g1"));
        assert_eq!(position.castling_rights().get(White), (false, false));
        assert_eq!(position.castling_rights().get(Black), (true, true));

        position.undo_move();
        assert_eq!(position, before);
        assert_eq!(position.king_square(White), sq("e1"));
    }

    #[test]
    fn rook_moves_and_rook_captures_revoke_one_wing() {
        let mut position = Position::with_pieces(
            &[
                (sq("e1"), Piece::new(White, King)),
                (sq("a1"), Piece::new(White, Rook)),
                (sq("h1"), Piece::new(White, Rook)),
                (sq("e8"), Piece::new(Black, King)),
                (sq("a8"), Piece::new(Black, Rook)),
                (sq("h8"), Piece::new(Black, Rook)),
            ],
            White,
            CastlingRights::ALL,
        )
        .unwrap();

        play(&mut position, &["h1h8"]);
        assert_eq!(position.castling_rights().get(White), (false, true));
        assert_eq!(position.castling_rights().get(Black), (false, true));

        position.undo_move();
        assert_eq!(position.castling_rights(), CastlingRights::ALL);
    }

    #[test]
    fn promotion_makes_a_queen_and_undo_restores_the_pawn() {
        let mut position = Position::with_pieces(
            &[
                (sq("e1"), Piece::new(White, King)),
                (sq("b7"), Piece::new(White, Pawn)),
                (sq("a8"), Piece::new(Black, Knight)),
                (sq("h8"), Piece::new(Black, King)),
            ],
            White,
            CastlingRights::NONE,
        )
        .unwrap();
        let before = position.clone();

        let mv = position.make_from_str("b7a8").unwrap();
        assert!(mv.is_promotion());
        assert_eq!(position.piece_at(sq("a8")), Some(Piece::new(White, Queen)));

        position.undo_move();
        assert_eq!(position, before);
        assert_eq!(position.piece_at(sq("a8")), Some(Piece::new(Black, Knight)));
        assert_eq!(position.piece_at(sq("b7")), Some(Piece::new(White, Pawn)));
    }

    #[test]
    fn undo_clears_terminal_flags() {
        let mut position = Position::new();
        play(&mut position, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(position.legal_moves().is_empty());
        assert!(position.is_checkmate());
        position.undo_move();
        assert!(!position.is_checkmate());
        assert!(!position.is_stalemate());
    }

    #[test]
    fn setup_validation() {
        let no_black_king = Position::with_pieces(
            &[(sq("e1"), Piece::new(White, King))],
            White,
            CastlingRights::NONE,
        );
        assert!(matches!(no_black_king, Err(ChessError::InvalidSetup(_))));

        let pawn_on_back_rank = Position::with_pieces(
            &[
                (sq("e1"), Piece::new(White, King)),
                (sq("e8"), Piece::new(Black, King)),
                (sq("a8"), Piece::new(White, Pawn)),
            ],
            White,
            CastlingRights::NONE,
        );
        assert!(pawn_on_back_rank.is_err());

        let stray_rights = Position::with_pieces(
            &[
                (sq("e1"), Piece::new(White, King)),
                (sq("h1"), Piece::new(White, Rook)),
                (sq("d8"), Piece::new(Black, King)),
                (sq("a8"), Piece::new(Black, Bishop)),
            ],
            White,
            CastlingRights::ALL,
        )
        .unwrap();
        assert_eq!(stray_rights.castling_rights().get(White), (true, false));
        assert_eq!(stray_rights.castling_rights().get(Black), (false, false));
    }

    #[test]
    fn coordinate_queries_fail_fast_off_the_board() {
        let position = Position::new();
        assert_eq!(
            position.piece_at_coords(0, 4),
            Ok(Some(Piece::new(Black, King)))
        );
        assert!(matches!(
            position.piece_at_coords(8, 4),
            Err(ChessError::InvalidSquare { .. })
        ));
    }

    #[test]
    fn make_from_str_rejects_bad_input() {
        let mut position = Position::new();
        assert!(matches!(
            position.make_from_str("e2e5"),
            Err(ChessError::IllegalMove(_))
        ));
        assert!(matches!(
            position.make_from_str("hello"),
            Err(ChessError::InvalidNotation(_))
        ));
        assert_eq!(position.history_len(), 0);
    }

    proptest! {
        #[test]
        fn prop_apply_then_undo_restores_position(seed in any::<u64>(), plies in 1..40usize) {
            let mut position = Position::new();
            let initial = position.clone();
            let mut rng = StdRng::seed_from_u64(seed);

            let mut applied = 0;
            for _ in 0..plies {
                let moves = position.legal_moves();
                let mv = match moves.choose(&mut rng) {
                    Some(m) => m,
                    None => break,
                };
                position.apply_move(mv);
                applied += 1;
                prop_assert_eq!(
                    position.piece_at(position.king_square(White)),
                    Some(Piece::new(White, King))
                );
                prop_assert_eq!(
                    position.piece_at(position.king_square(Black)),
                    Some(Piece::new(Black, King))
                );
            }
            for _ in 0..applied {
                position.undo_move();
            }

            prop_assert_eq!(position.board(), initial.board());
            prop_assert_eq!(position.side_to_move(), initial.side_to_move());
            prop_assert_eq!(position.castling_rights(), initial.castling_rights());
            prop_assert_eq!(position.en_passant_target(), initial.en_passant_target());
            prop_assert_eq!(position.king_square(White), initial.king_square(White));
            prop_assert_eq!(position.king_square(Black), initial.king_square(Black));
            prop_assert_eq!(position.history_len(), 0);
        }
    }
}

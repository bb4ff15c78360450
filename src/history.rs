use crate::castling::CastlingRights;
use crate::r#move::Move;
use crate::square::Square;

/// What a move cannot give back on its own: the state it overwrote
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HistoryEntry {
    pub move_played: Move,
    pub ep_target: Option<Square>,
    pub castling_rights: CastlingRights,
}

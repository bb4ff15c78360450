//! Error types for the rules engine.
//!
//! Every failure here is a caller contract violation: the core performs no
//! I/O, so there is nothing to retry.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Coordinates outside the 8x8 board
    #[error("square ({row}, {col}) is off the board (rows and columns are 0-7)")]
    InvalidSquare { row: usize, col: usize },

    /// Text that does not describe a square or a move
    #[error("badly formatted move or square: {0}")]
    InvalidNotation(String),

    /// Well formed move that is not in the current legal move list
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// Piece placement that cannot be played from
    #[error("invalid setup: {0}")]
    InvalidSetup(String),
}

pub type ChessResult<T> = Result<T, ChessError>;

//! USI notation errors and the standard starting position

/// Starting position in SFEN
pub const STARTPOS_SFEN: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

/// Error type for USI / SFEN parsing
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsiParseError {
    #[error("Invalid square notation: {0}")]
    InvalidSquare(String),
    #[error("Invalid piece character: {0}")]
    InvalidPiece(char),
    #[error("Invalid move format: {0}")]
    InvalidMoveFormat(String),
    #[error("Invalid SFEN: {0}")]
    InvalidSfen(String),
    #[error("Invalid rank count: {0} (expected 9)")]
    InvalidRankCount(usize),
    #[error("Invalid hands format: {0}")]
    InvalidHandsFormat(String),
    #[error("Invalid move count: {0}")]
    InvalidMoveCount(String),
    #[error("Invalid side to move: {0} (expected 'b' or 'w')")]
    InvalidSideToMove(String),
}

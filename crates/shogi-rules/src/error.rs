//! Errors surfaced by the rules engine

use crate::usi::UsiParseError;

/// Rules engine errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// The move is not in the current legal move set
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    /// Malformed USI / SFEN text
    #[error(transparent)]
    Parse(#[from] UsiParseError),
}

/// Result type for rules operations
pub type RulesResult<T> = Result<T, RulesError>;

//! Game status queries: checkmate, repetition, game over

use super::Position;

/// Same position seen this many times in total ends the game (千日手)
pub const REPETITION_COUNT: usize = 4;

impl Position {
    /// Side to move is in check and has no legal move
    pub fn is_checkmate(&self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }

    /// Side to move is not in check but has no legal move
    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && self.legal_moves().is_empty()
    }

    /// The current position has occurred `REPETITION_COUNT` times
    pub fn is_repetition(&self) -> bool {
        let earlier = self.history.iter().filter(|&&k| k == self.key).count();
        earlier + 1 >= REPETITION_COUNT
    }

    /// No legal move for the side to move, or repetition
    pub fn is_game_over(&self) -> bool {
        self.is_repetition() || self.legal_moves().is_empty()
    }
}

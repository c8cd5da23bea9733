//! Static evaluation
//!
//! Scores are centipawns from Black's (先手) point of view: positive values
//! favour Black, negative values favour White. Black is the maximizing side
//! of the search, so no sign flip happens when the side to move changes.

pub mod tables;

use std::sync::Arc;

use shogi_rules::{Color, Position};

pub use tables::{PIECE_VALUES, PROMOTED_PIECE_VALUES, hand_value, piece_value, pst_bonus};

/// Trait for position evaluation
///
/// Contract:
/// - Returns a score in centipawns from Black's perspective.
/// - Mirroring the position (`Position::flipped`) negates the score exactly.
/// - Pure function of the position: no caches, no interior mutability.
pub trait Evaluator {
    /// Evaluate position from Black's perspective
    fn evaluate(&self, pos: &Position) -> i32;
}

impl<T: Evaluator + ?Sized> Evaluator for Arc<T> {
    fn evaluate(&self, pos: &Position) -> i32 {
        (**self).evaluate(pos)
    }
}

impl<T: Evaluator + ?Sized> Evaluator for &T {
    fn evaluate(&self, pos: &Position) -> i32 {
        (**self).evaluate(pos)
    }
}

/// Material only: pieces on the board and in hand
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, pos: &Position) -> i32 {
        let board: i32 = pos.pieces().map(|(_, piece)| signed(piece.color, piece_value(piece))).sum();
        board + hand_material(pos)
    }
}

/// Material plus piece-square bonuses
#[derive(Clone, Copy, Debug, Default)]
pub struct PieceSquareEvaluator;

impl Evaluator for PieceSquareEvaluator {
    fn evaluate(&self, pos: &Position) -> i32 {
        let board: i32 = pos
            .pieces()
            .map(|(sq, piece)| signed(piece.color, piece_value(piece) + pst_bonus(piece, sq)))
            .sum();
        board + hand_material(pos)
    }
}

#[inline]
fn signed(color: Color, value: i32) -> i32 {
    match color {
        Color::Black => value,
        Color::White => -value,
    }
}

fn hand_material(pos: &Position) -> i32 {
    [Color::Black, Color::White]
        .into_iter()
        .map(|color| {
            let total: i32 =
                pos.hand(color).iter().map(|(pt, count)| hand_value(pt) * count as i32).sum();
            signed(color, total)
        })
        .sum()
}

/// Evaluate with the default evaluator (`PieceSquareEvaluator`)
pub fn evaluate(pos: &Position) -> i32 {
    PieceSquareEvaluator.evaluate(pos)
}

/// Default evaluation seen from `color`
pub fn evaluate_for(pos: &Position, color: Color) -> i32 {
    signed(color, evaluate(pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIDGAME_SFEN: &str =
        "ln1g3nl/1r3kg2/p2pppsp1/1pp6/7Pp/2P6/PPSPPPP2/2G2S1R1/LN2KG1NL w B2Pb 24";

    #[test]
    fn test_startpos_is_balanced() {
        let pos = Position::startpos();
        assert_eq!(MaterialEvaluator.evaluate(&pos), 0);
        assert_eq!(evaluate(&pos), 0);
    }

    #[test]
    fn test_mirrored_position_negates_score() {
        let pos = Position::from_sfen(MIDGAME_SFEN).unwrap();
        let mirrored = pos.flipped();
        assert_eq!(evaluate(&mirrored), -evaluate(&pos));
        assert_eq!(MaterialEvaluator.evaluate(&mirrored), -MaterialEvaluator.evaluate(&pos));
    }

    #[test]
    fn test_hand_pieces_count_for_owner() {
        let bare = Position::from_sfen("4k4/9/9/9/9/9/9/9/4K4 b - 1").unwrap();
        let black_rook = Position::from_sfen("4k4/9/9/9/9/9/9/9/4K4 b R 1").unwrap();
        let white_pawns = Position::from_sfen("4k4/9/9/9/9/9/9/9/4K4 b 3p 1").unwrap();
        let base = MaterialEvaluator.evaluate(&bare);
        assert_eq!(MaterialEvaluator.evaluate(&black_rook) - base, 1100);
        assert_eq!(MaterialEvaluator.evaluate(&white_pawns) - base, -300);
    }

    #[test]
    fn test_promoted_piece_counts_promoted_value() {
        let pos = Position::from_sfen("4k4/9/9/9/4+R4/9/9/9/4K4 b - 1").unwrap();
        assert_eq!(MaterialEvaluator.evaluate(&pos), 1500);
    }

    #[test]
    fn test_evaluate_for_white_is_negated() {
        let pos = Position::from_sfen(MIDGAME_SFEN).unwrap();
        assert_eq!(evaluate_for(&pos, Color::Black), evaluate(&pos));
        assert_eq!(evaluate_for(&pos, Color::White), -evaluate(&pos));
    }

    #[test]
    fn test_arc_evaluator_delegates() {
        let pos = Position::from_sfen(MIDGAME_SFEN).unwrap();
        let shared: Arc<dyn Evaluator + Send + Sync> = Arc::new(PieceSquareEvaluator);
        assert_eq!(shared.evaluate(&pos), evaluate(&pos));
    }
}

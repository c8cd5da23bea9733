//! Move ordering for alpha-beta search
//!
//! Each candidate gets a one-ply heuristic score:
//! captured piece value + promotion bonus + check bonus.
//! Ordering only changes how fast the search prunes, never its result.

use std::cmp::Reverse;

use shogi_rules::{Move, Position};

use crate::eval::piece_value;

/// Bonus for a promoting move
pub const PROMOTION_BONUS: i32 = 300;

/// Bonus for a move that leaves the opponent in check
pub const CHECK_BONUS: i32 = 500;

/// A move paired with a score (ordering heuristic or search result)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

impl ScoredMove {
    #[inline]
    pub const fn new(mv: Move, score: i32) -> Self {
        ScoredMove { mv, score }
    }
}

/// Heuristic score of a single move
///
/// The move is played and taken back to test for check, so `pos` is borrowed
/// mutably but left unchanged.
pub fn move_score(pos: &mut Position, mv: Move) -> i32 {
    let mut score = 0;
    if let Some(captured) = pos.piece_at(mv.to()) {
        score += piece_value(captured);
    }
    if mv.is_promote() {
        score += PROMOTION_BONUS;
    }
    let undo = pos.do_move(mv);
    if pos.in_check() {
        score += CHECK_BONUS;
    }
    pos.undo_move(mv, undo);
    score
}

/// Score and sort moves, best first. Equal scores keep their input order.
pub fn order_moves(pos: &mut Position, moves: &[Move]) -> Vec<ScoredMove> {
    let mut scored: Vec<ScoredMove> =
        moves.iter().map(|&mv| ScoredMove::new(mv, move_score(pos, mv))).collect();
    // sort_by_key is stable
    scored.sort_by_key(|s| Reverse(s.score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usi(moves: &[ScoredMove]) -> Vec<String> {
        moves.iter().map(|s| s.mv.to_usi()).collect()
    }

    #[test]
    fn test_checking_push_first() {
        let mut pos = Position::from_sfen("9/9/4k4/9/4P4/9/P8/9/4K4 b - 1").unwrap();
        let before = pos.clone();
        let moves = pos.legal_moves();
        let ordered = order_moves(&mut pos, &moves);

        assert_eq!(pos, before);
        assert_eq!(ordered.len(), moves.len());
        assert_eq!(ordered[0].mv.to_usi(), "5e5d");
        assert_eq!(ordered[0].score, CHECK_BONUS);
        assert!(ordered[1..].iter().all(|s| s.score == 0));
    }

    #[test]
    fn test_capture_value_and_promotion_bonus() {
        // 2四の飛車が 2三の歩を取って成れる。9筋は歩で王手が遮られている
        let mut pos = Position::from_sfen("k8/9/p6p1/7R1/9/9/9/9/4K4 b - 1").unwrap();
        let plain = pos.parse_move("2d2c").unwrap();
        let promote = pos.parse_move("2d2c+").unwrap();
        assert_eq!(move_score(&mut pos, plain), 100);
        assert_eq!(move_score(&mut pos, promote), 100 + PROMOTION_BONUS);

        let moves = pos.legal_moves();
        let ordered = order_moves(&mut pos, &moves);
        assert_eq!(ordered[0].mv, promote);
        assert_eq!(ordered[1].mv, plain);
    }

    #[test]
    fn test_ties_keep_generation_order() {
        let mut pos = Position::startpos();
        let moves = pos.legal_moves();
        let ordered = order_moves(&mut pos, &moves);
        let generated: Vec<String> = moves.iter().map(|m| m.to_usi()).collect();
        assert_eq!(usi(&ordered), generated);
    }
}

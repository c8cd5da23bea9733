//! Minimax search with alpha-beta pruning
//!
//! Scores are Black-relative centipawns (see `eval`). Black maximizes and
//! White minimizes, so the recursion passes a `maximizing` flag instead of
//! negating scores. Running out of budget aborts the search with
//! `SearchAborted`; every frame takes back its move before passing the abort
//! up with `?`.
//!
//! Terminal nodes are not sent to the evaluator: checkmate scores
//! `±(MATE_SCORE - plies from root)` and fourfold repetition scores
//! `DRAW_SCORE`, so search scores can lie outside the evaluator's range.

use std::time::{Duration, Instant};

use shogi_rules::{Color, Position};

use crate::eval::{Evaluator, PieceSquareEvaluator};
use crate::limits::SearchBudget;
use crate::ordering::order_moves;

/// Infinity score for search bounds
pub const INFINITY_SCORE: i32 = 32_000;

/// Score of being mated at the root; mate in n plies scores `MATE_SCORE - n`
pub const MATE_SCORE: i32 = INFINITY_SCORE - 2_000;

/// Fourfold repetition
pub const DRAW_SCORE: i32 = 0;

/// The budget ran out somewhere below this frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SearchAborted;

pub(crate) type SearchResult<T> = Result<T, SearchAborted>;

/// Search engine
pub struct Searcher<E: Evaluator = PieceSquareEvaluator> {
    /// Search limits
    budget: SearchBudget,
    /// Start time
    start_time: Instant,
    /// Node counter
    nodes: u64,
    /// Ply of the position the current search started from
    root_ply: u32,
    /// Log every completed iteration at info level
    log_iterations: bool,
    /// Evaluation function
    evaluator: E,
}

impl<E: Evaluator> Searcher<E> {
    /// Create new searcher; the clock starts now
    pub fn new(budget: SearchBudget, evaluator: E) -> Self {
        Searcher {
            budget,
            start_time: Instant::now(),
            nodes: 0,
            root_ply: 0,
            log_iterations: false,
            evaluator,
        }
    }

    pub fn with_iteration_log(mut self, enabled: bool) -> Self {
        self.log_iterations = enabled;
        self
    }

    #[inline]
    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    #[inline]
    pub(crate) fn log_iterations(&self) -> bool {
        self.log_iterations
    }

    /// Fixed-depth search of `pos` with a full window
    ///
    /// Returns the Black-relative score, or `None` if the budget ran out.
    /// `pos` is restored either way.
    pub fn search_fixed_depth(&mut self, pos: &mut Position, depth: u8) -> Option<i32> {
        #[cfg(debug_assertions)]
        let snapshot = pos.clone();

        self.set_root(pos);
        let maximizing = pos.side_to_move() == Color::Black;
        let result = self.alpha_beta(pos, depth, -INFINITY_SCORE, INFINITY_SCORE, maximizing);

        #[cfg(debug_assertions)]
        assert_eq!(*pos, snapshot, "search did not restore the position");
        result.ok()
    }

    /// Mate distances are measured from this position
    pub(crate) fn set_root(&mut self, pos: &Position) {
        self.root_ply = pos.ply();
    }

    /// Check if search should stop
    #[inline]
    fn should_stop(&self) -> bool {
        self.budget.exhausted(self.start_time.elapsed(), self.nodes)
    }

    #[inline]
    pub(crate) fn check_budget(&self) -> SearchResult<()> {
        if self.should_stop() { Err(SearchAborted) } else { Ok(()) }
    }

    /// Check limits before counting the node
    #[inline]
    fn enter_node(&mut self) -> SearchResult<()> {
        self.check_budget()?;
        self.nodes += 1;
        Ok(())
    }

    /// Score for the side to move being mated here
    fn mated_score(&self, pos: &Position) -> i32 {
        let distance = pos.ply().saturating_sub(self.root_ply) as i32;
        let score = MATE_SCORE - distance;
        match pos.side_to_move() {
            Color::Black => -score,
            Color::White => score,
        }
    }

    /// Score of a position whose side to move has no legal move
    pub(crate) fn no_moves_score(&self, pos: &Position) -> i32 {
        if pos.in_check() {
            self.mated_score(pos)
        } else {
            self.evaluator.evaluate(pos)
        }
    }

    /// Score at the horizon: repetition is a draw, checkmate is scored by
    /// distance, anything else goes to the evaluator
    pub(crate) fn leaf_score(&self, pos: &Position) -> i32 {
        if pos.is_repetition() {
            DRAW_SCORE
        } else if pos.in_check() && pos.legal_moves().is_empty() {
            self.mated_score(pos)
        } else {
            self.evaluator.evaluate(pos)
        }
    }

    /// Alpha-beta search
    pub(crate) fn alpha_beta(
        &mut self,
        pos: &mut Position,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> SearchResult<i32> {
        self.enter_node()?;

        if depth == 0 {
            return Ok(self.leaf_score(pos));
        }
        if pos.is_repetition() {
            return Ok(DRAW_SCORE);
        }

        let moves = pos.legal_moves();
        if moves.is_empty() {
            return Ok(self.no_moves_score(pos));
        }

        let ordered = order_moves(pos, &moves);
        let mut best = if maximizing { -INFINITY_SCORE } else { INFINITY_SCORE };

        for scored in ordered {
            self.check_budget()?;

            let undo = pos.do_move(scored.mv);
            let result = self.alpha_beta(pos, depth - 1, alpha, beta, !maximizing);
            pos.undo_move(scored.mv, undo);
            let score = result?;

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            // Cutoff
            if alpha >= beta {
                break;
            }
        }

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use super::*;
    use crate::eval::MaterialEvaluator;

    const MIDGAME_SFEN: &str =
        "ln1g3nl/1r3kg2/p2pppsp1/1pp6/7Pp/2P6/PPSPPPP2/2G2S1R1/LN2KG1NL w B2Pb 24";
    const ENDGAME_SFEN: &str = "4k4/9/4G4/9/9/9/9/9/4K4 b r 1";
    const MATE_IN_ONE_SFEN: &str = "8k/9/6NG1/9/9/9/9/9/4K4 b GP 1";

    /// Plain minimax with the same leaf rules and no pruning
    fn minimax<E: Evaluator>(
        searcher: &Searcher<E>,
        pos: &mut Position,
        depth: u8,
        maximizing: bool,
    ) -> i32 {
        if depth == 0 {
            return searcher.leaf_score(pos);
        }
        if pos.is_repetition() {
            return DRAW_SCORE;
        }
        let moves = pos.legal_moves();
        if moves.is_empty() {
            return searcher.no_moves_score(pos);
        }
        let mut scores = Vec::with_capacity(moves.len());
        for &mv in moves.iter() {
            let undo = pos.do_move(mv);
            scores.push(minimax(searcher, pos, depth - 1, !maximizing));
            pos.undo_move(mv, undo);
        }
        let best = if maximizing { scores.iter().max() } else { scores.iter().min() };
        best.copied().unwrap_or(DRAW_SCORE)
    }

    fn assert_matches_minimax(sfen: &str, depth: u8) {
        let mut pos = Position::from_sfen(sfen).unwrap();
        let mut searcher = Searcher::new(SearchBudget::fixed_depth(depth), PieceSquareEvaluator);
        let pruned = searcher.search_fixed_depth(&mut pos, depth).unwrap();

        searcher.set_root(&pos);
        let maximizing = pos.side_to_move() == Color::Black;
        let full = minimax(&searcher, &mut pos, depth, maximizing);
        assert_eq!(pruned, full, "{sfen} depth {depth}");
    }

    #[test]
    fn test_alpha_beta_equals_minimax() {
        for depth in 1..=2 {
            assert_matches_minimax(MIDGAME_SFEN, depth);
            assert_matches_minimax(shogi_rules::STARTPOS_SFEN, depth);
        }
        for depth in 1..=3 {
            assert_matches_minimax(ENDGAME_SFEN, depth);
            assert_matches_minimax(MATE_IN_ONE_SFEN, depth);
        }
    }

    #[test]
    fn test_finds_mate_in_one() {
        let mut pos = Position::from_sfen(MATE_IN_ONE_SFEN).unwrap();
        let mut searcher = Searcher::new(SearchBudget::fixed_depth(1), MaterialEvaluator);
        assert_eq!(searcher.search_fixed_depth(&mut pos, 1), Some(MATE_SCORE - 1));
    }

    #[test]
    fn test_mated_side_to_move_scores_for_opponent() {
        let mut pos = Position::from_sfen(MATE_IN_ONE_SFEN).unwrap();
        pos.apply_usi("G*1b").unwrap();
        let mut searcher = Searcher::new(SearchBudget::fixed_depth(2), MaterialEvaluator);
        // 後手番で詰んでいる: 先手から見て +MATE
        assert_eq!(searcher.search_fixed_depth(&mut pos, 2), Some(MATE_SCORE));
    }

    #[test]
    fn test_repetition_scores_draw() {
        let mut pos = Position::from_sfen("4k4/9/9/9/9/9/9/9/4K4 b R 1").unwrap();
        for _ in 0..3 {
            for usi in ["5i5h", "5a5b", "5h5i", "5b5a"] {
                pos.apply_usi(usi).unwrap();
            }
        }
        assert!(pos.is_repetition());
        let mut searcher = Searcher::new(SearchBudget::fixed_depth(3), MaterialEvaluator);
        assert_eq!(searcher.search_fixed_depth(&mut pos, 3), Some(DRAW_SCORE));
        assert_eq!(searcher.search_fixed_depth(&mut pos, 0), Some(DRAW_SCORE));
    }

    #[test]
    fn test_abort_restores_position() {
        let mut pos = Position::from_sfen(MIDGAME_SFEN).unwrap();
        let before = pos.clone();
        let budget = SearchBudget::fixed_depth(4).with_nodes(300);
        let mut searcher = Searcher::new(budget, PieceSquareEvaluator);
        assert_eq!(searcher.search_fixed_depth(&mut pos, 4), None);
        assert_eq!(pos, before);
        assert_eq!(searcher.nodes(), 300);
    }

    #[test]
    fn test_stop_flag_aborts_immediately() {
        let mut pos = Position::startpos();
        let flag = Arc::new(AtomicBool::new(true));
        let budget = SearchBudget::fixed_depth(6).with_stop_flag(flag);
        let mut searcher = Searcher::new(budget, PieceSquareEvaluator);
        assert_eq!(searcher.search_fixed_depth(&mut pos, 6), None);
        assert_eq!(searcher.nodes(), 0);
    }
}

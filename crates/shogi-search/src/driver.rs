//! Iterative deepening driver
//!
//! Searches depth 1, 2, 3, ... until the budget runs out or the depth ceiling
//! is reached. A depth interrupted by the budget is discarded; the move of the
//! last fully completed depth is returned.

use std::time::Duration;

use log::{Level, debug, log};
use shogi_rules::{Color, Move, Position};

use crate::alpha_beta::{INFINITY_SCORE, SearchAborted, SearchResult, Searcher};
use crate::eval::{Evaluator, PieceSquareEvaluator};
use crate::limits::SearchBudget;
use crate::ordering::{ScoredMove, order_moves};

/// Result of one `find_best_move` call
#[derive(Clone, Debug, Default)]
pub struct SearchReport {
    /// Best move of the last completed depth, `None` if no depth completed
    /// or the position has no legal move
    pub best_move: Option<Move>,
    /// Score of `best_move` from the side to move's point of view
    pub score: i32,
    /// Last completed depth
    pub depth: u8,
    /// Nodes searched
    pub nodes: u64,
    /// Time elapsed
    pub elapsed: Duration,
    /// The budget ran out before the depth ceiling was reached
    pub timed_out: bool,
}

/// Convert a Black-relative score to `color`'s point of view
#[inline]
pub(crate) fn score_for(color: Color, black_score: i32) -> i32 {
    match color {
        Color::Black => black_score,
        Color::White => -black_score,
    }
}

impl<E: Evaluator> Searcher<E> {
    /// Iterative deepening from `pos`
    pub fn find_best_move(&mut self, pos: &mut Position) -> SearchReport {
        #[cfg(debug_assertions)]
        let snapshot = pos.clone();

        self.set_root(pos);
        let mut report = SearchReport::default();

        if pos.legal_moves().is_empty() {
            debug!("no legal moves in {}", pos.to_sfen());
            return report;
        }

        let ceiling = self.budget().max_depth.max(1);
        let level = if self.log_iterations() { Level::Info } else { Level::Debug };
        for depth in 1..=ceiling {
            match self.search_root(pos, depth) {
                Ok(Some(best)) => {
                    report.best_move = Some(best.mv);
                    report.score = best.score;
                    report.depth = depth;
                    log!(
                        level,
                        "depth {depth} bestmove {} score {} nodes {} time {}ms",
                        best.mv,
                        best.score,
                        self.nodes(),
                        self.elapsed().as_millis()
                    );
                }
                Ok(None) => break,
                Err(SearchAborted) => {
                    report.timed_out = true;
                    debug!("depth {depth} interrupted, keeping depth {}", report.depth);
                    break;
                }
            }
        }

        report.nodes = self.nodes();
        report.elapsed = self.elapsed();

        #[cfg(debug_assertions)]
        assert_eq!(*pos, snapshot, "search did not restore the position");
        report
    }

    /// One root iteration at `depth`, with no iterative deepening
    ///
    /// Returns the best move and its score from the side to move's point of
    /// view, or `None` when the budget ran out or there is no legal move.
    pub fn search_depth(&mut self, pos: &mut Position, depth: u8) -> Option<ScoredMove> {
        self.set_root(pos);
        self.search_root(pos, depth.max(1)).ok().flatten()
    }

    /// Root move loop. The root side's bound narrows as better moves are
    /// found; the first move reaching the best score is kept.
    fn search_root(&mut self, pos: &mut Position, depth: u8) -> SearchResult<Option<ScoredMove>> {
        let us = pos.side_to_move();
        let maximizing = us == Color::Black;
        let moves = pos.legal_moves();
        let ordered = order_moves(pos, &moves);

        let mut alpha = -INFINITY_SCORE;
        let mut beta = INFINITY_SCORE;
        let mut best: Option<ScoredMove> = None;

        for scored in ordered {
            self.check_budget()?;

            let undo = pos.do_move(scored.mv);
            let result = self.alpha_beta(pos, depth - 1, alpha, beta, !maximizing);
            pos.undo_move(scored.mv, undo);
            let score = result?;

            let improved = best.is_none_or(|b| {
                if maximizing { score > b.score } else { score < b.score }
            });
            if improved {
                best = Some(ScoredMove::new(scored.mv, score));
                if maximizing {
                    alpha = alpha.max(score);
                } else {
                    beta = beta.min(score);
                }
            }
        }

        Ok(best.map(|b| ScoredMove::new(b.mv, score_for(us, b.score))))
    }
}

/// Find the best move with the default evaluator
pub fn find_best_move(pos: &mut Position, budget: SearchBudget) -> SearchReport {
    Searcher::new(budget, PieceSquareEvaluator).find_best_move(pos)
}

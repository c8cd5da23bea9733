//! Top-level move selection
//!
//! - `Deterministic`: the iterative deepening result, a random legal move if
//!   no depth completed in time.
//! - `ToleranceBand`: every legal move is searched to a fixed shallow depth and
//!   one of the moves within `tolerance` of the best score is picked at random.

use log::{debug, warn};
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_xoshiro::Xoshiro256PlusPlus;
use shogi_rules::{Color, Move, MoveList, Position, RulesResult};

use crate::alpha_beta::{INFINITY_SCORE, SearchAborted, Searcher};
use crate::config::SearchConfig;
use crate::driver::score_for;
use crate::eval::{Evaluator, PieceSquareEvaluator};
use crate::ordering::{ScoredMove, order_moves};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    #[default]
    Deterministic,
    /// `depth` 0 scores moves with the one-ply ordering heuristic only
    ToleranceBand { tolerance: i32, depth: u8 },
}

/// Outcome of a selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Chosen by search; `score` is from the mover's point of view
    Searched { mv: Move, score: i32 },
    /// Nothing was searched in time; a uniformly random legal move
    Random(Move),
    /// Checkmate or stalemate: the caller ends the game
    NoLegalMoves,
}

impl Selection {
    pub fn mv(&self) -> Option<Move> {
        match *self {
            Selection::Searched { mv, .. } | Selection::Random(mv) => Some(mv),
            Selection::NoLegalMoves => None,
        }
    }
}

/// Chooses moves according to a `SearchConfig`
pub struct MoveSelector<E: Evaluator + Clone = PieceSquareEvaluator> {
    config: SearchConfig,
    evaluator: E,
    rng: Xoshiro256PlusPlus,
}

impl MoveSelector<PieceSquareEvaluator> {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_evaluator(config, PieceSquareEvaluator)
    }
}

impl<E: Evaluator + Clone> MoveSelector<E> {
    pub fn with_evaluator(config: SearchConfig, evaluator: E) -> Self {
        let rng = match config.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
        };
        MoveSelector {
            config,
            evaluator,
            rng,
        }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[inline]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Choose a move for the side to move. `pos` is left unchanged.
    pub fn select(&mut self, pos: &mut Position) -> Selection {
        let moves = pos.legal_moves();
        if moves.is_empty() {
            debug!("no legal moves in {}", pos.to_sfen());
            return Selection::NoLegalMoves;
        }

        #[cfg(debug_assertions)]
        let snapshot = pos.clone();

        let selection = match self.config.selection_policy() {
            SelectionPolicy::Deterministic => self.select_deterministic(pos, &moves),
            SelectionPolicy::ToleranceBand { tolerance, depth } => {
                self.select_tolerance_band(pos, &moves, tolerance, depth)
            }
        };

        #[cfg(debug_assertions)]
        assert_eq!(*pos, snapshot, "selection did not restore the position");
        debug!("selected {selection:?}");
        selection
    }

    /// Select and play the move on `pos`
    pub fn play(&mut self, pos: &mut Position) -> RulesResult<Selection> {
        let selection = self.select(pos);
        if let Some(mv) = selection.mv() {
            pos.apply_move(mv)?;
        }
        Ok(selection)
    }

    fn select_deterministic(&mut self, pos: &mut Position, moves: &MoveList) -> Selection {
        let mut searcher = Searcher::new(self.config.budget(), self.evaluator.clone())
            .with_iteration_log(self.config.log_iterations);
        let report = searcher.find_best_move(pos);
        match report.best_move {
            Some(mv) => Selection::Searched {
                mv,
                score: report.score,
            },
            None => {
                warn!("no depth completed within the budget, playing a random move");
                self.random_move(moves)
            }
        }
    }

    fn select_tolerance_band(
        &mut self,
        pos: &mut Position,
        moves: &MoveList,
        tolerance: i32,
        depth: u8,
    ) -> Selection {
        let us = pos.side_to_move();
        let scored = if depth == 0 {
            order_moves(pos, moves)
        } else {
            self.score_moves(pos, moves, depth)
        };

        let Some(top) = scored.iter().map(|s| s.score).max() else {
            warn!("no move scored within the budget, playing a random move");
            return self.random_move(moves);
        };
        let band: Vec<ScoredMove> =
            scored.into_iter().filter(|s| s.score >= top - tolerance).collect();
        debug!("{} of {} moves within {tolerance} of {top} for {us:?}", band.len(), moves.len());

        match band.choose(&mut self.rng) {
            Some(chosen) => Selection::Searched {
                mv: chosen.mv,
                score: chosen.score,
            },
            None => self.random_move(moves),
        }
    }

    /// Full-window search of every root move; stops early when the budget runs out
    fn score_moves(&mut self, pos: &mut Position, moves: &MoveList, depth: u8) -> Vec<ScoredMove> {
        let us = pos.side_to_move();
        let maximizing = us == Color::Black;
        let mut searcher = Searcher::new(self.config.budget(), self.evaluator.clone());
        searcher.set_root(pos);

        let mut scored = Vec::with_capacity(moves.len());
        for &mv in moves.iter() {
            let undo = pos.do_move(mv);
            let result =
                searcher.alpha_beta(pos, depth - 1, -INFINITY_SCORE, INFINITY_SCORE, !maximizing);
            pos.undo_move(mv, undo);
            match result {
                Ok(score) => scored.push(ScoredMove::new(mv, score_for(us, score))),
                Err(SearchAborted) => {
                    debug!("budget ran out after scoring {} of {} moves", scored.len(), moves.len());
                    break;
                }
            }
        }
        scored
    }

    fn random_move(&mut self, moves: &MoveList) -> Selection {
        match moves.choose(&mut self.rng) {
            Some(&mv) => Selection::Random(mv),
            None => Selection::NoLegalMoves,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyKind;

    fn config(policy: PolicyKind) -> SearchConfig {
        SearchConfig {
            time_ms: 0,
            max_depth: 2,
            policy,
            seed: Some(7),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_deterministic_matches_driver() {
        let mut pos = Position::from_sfen("4k4/9/9/9/4r4/9/9/4R4/4K4 b - 1").unwrap();
        let mut selector = MoveSelector::new(config(PolicyKind::Deterministic));
        let selection = selector.select(&mut pos);
        assert_eq!(selection.mv().map(|m| m.to_usi()), Some("5h5e".to_string()));
        assert!(matches!(selection, Selection::Searched { .. }));
    }

    #[test]
    fn test_no_legal_moves() {
        let mut pos = Position::from_sfen("8k/9/6NG1/9/9/9/9/9/4K4 b GP 1").unwrap();
        pos.apply_usi("G*1b").unwrap();
        for policy in [PolicyKind::Deterministic, PolicyKind::Tolerance] {
            let mut selector = MoveSelector::new(config(policy));
            assert_eq!(selector.select(&mut pos), Selection::NoLegalMoves);
            assert_eq!(selector.play(&mut pos).unwrap(), Selection::NoLegalMoves);
        }
    }

    #[test]
    fn test_exhausted_budget_falls_back_to_random_legal_move() {
        let mut pos = Position::startpos();
        let mut cfg = config(PolicyKind::Deterministic);
        cfg.nodes = Some(0);
        let mut selector = MoveSelector::new(cfg);
        let selection = selector.select(&mut pos);
        let Selection::Random(mv) = selection else {
            panic!("expected random fallback, got {selection:?}");
        };
        assert!(pos.legal_moves().contains(&mv));
    }

    #[test]
    fn test_tolerance_zero_picks_checking_push() {
        let mut pos = Position::from_sfen("9/9/4k4/9/4P4/9/P8/9/4K4 b - 1").unwrap();
        let mut cfg = config(PolicyKind::Tolerance);
        cfg.tolerance = 0;
        cfg.tolerance_depth = 0;
        let mut selector = MoveSelector::new(cfg);
        for _ in 0..8 {
            assert_eq!(selector.select(&mut pos).mv().map(|m| m.to_usi()), Some("5e5d".to_string()));
        }
    }

    #[test]
    fn test_tolerance_band_varies_among_equal_moves() {
        let mut pos = Position::startpos();
        let mut cfg = config(PolicyKind::Tolerance);
        cfg.tolerance = 1_000;
        cfg.tolerance_depth = 1;
        let mut selector = MoveSelector::new(cfg);
        let picks: std::collections::HashSet<Move> =
            (0..20).filter_map(|_| selector.select(&mut pos).mv()).collect();
        assert!(picks.len() > 1);
    }

    #[test]
    fn test_same_seed_same_choice() {
        let mut pos = Position::startpos();
        let mut cfg = config(PolicyKind::Tolerance);
        cfg.tolerance = 1_000;
        cfg.tolerance_depth = 1;
        let first = MoveSelector::new(cfg.clone()).select(&mut pos);
        let second = MoveSelector::new(cfg).select(&mut pos);
        assert_eq!(first, second);
    }

    #[test]
    fn test_play_applies_move() {
        let mut pos = Position::startpos();
        let mut selector = MoveSelector::new(config(PolicyKind::Deterministic));
        let selection = selector.play(&mut pos).unwrap();
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.ply(), 1);
        assert!(selection.mv().is_some());
    }
}

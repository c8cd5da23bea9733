//! Background pre-think
//!
//! After a move is committed the front end may keep searching on the
//! opponent's time. The background search owns its own copy of the position
//! and stops as soon as its flag is raised, so it never touches the live game
//! state. A cancelled search is joined and its result dropped unread.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use log::{debug, warn};
use shogi_rules::Position;

use crate::alpha_beta::Searcher;
use crate::config::SearchConfig;
use crate::driver::SearchReport;
use crate::eval::{Evaluator, PieceSquareEvaluator};
use crate::limits::SearchBudget;

/// Handle to a running background search
pub struct Prethink {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<SearchReport>>,
    /// Key of the position being searched
    key: u64,
}

impl Prethink {
    /// Start searching a clone of `pos` on a new thread
    ///
    /// The search has no time limit of its own; it runs until the depth
    /// ceiling or until `cancel`/`finish` raises the stop flag.
    pub fn spawn(pos: &Position, config: &SearchConfig) -> io::Result<Prethink> {
        Self::spawn_with_evaluator(pos, config, PieceSquareEvaluator)
    }

    /// Same as `spawn`, searching with `evaluator`
    pub fn spawn_with_evaluator<E>(
        pos: &Position,
        config: &SearchConfig,
        evaluator: E,
    ) -> io::Result<Prethink>
    where
        E: Evaluator + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let mut budget = SearchBudget::fixed_depth(config.max_depth).with_stop_flag(stop.clone());
        if let Some(nodes) = config.nodes {
            budget = budget.with_nodes(nodes);
        }
        let mut snapshot = pos.clone();
        let key = snapshot.key();
        let log_iterations = config.log_iterations;

        let handle = thread::Builder::new().name("prethink".to_string()).spawn(move || {
            let mut searcher = Searcher::new(budget, evaluator).with_iteration_log(log_iterations);
            searcher.find_best_move(&mut snapshot)
        })?;
        debug!("prethink started on {}", pos.to_sfen());

        Ok(Prethink {
            stop,
            handle: Some(handle),
            key,
        })
    }

    /// Zobrist key of the position being searched
    pub fn position_key(&self) -> u64 {
        self.key
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Stop the search and discard its result
    pub fn cancel(mut self) {
        self.stop_and_join();
    }

    /// Stop the search and return what it found so far
    pub fn finish(mut self) -> Option<SearchReport> {
        self.stop.store(true, Ordering::Release);
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(report) => Some(report),
            Err(_) => {
                warn!("prethink thread panicked");
                None
            }
        }
    }

    fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("prethink thread panicked");
            }
            debug!("prethink cancelled");
        }
    }
}

impl Drop for Prethink {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

//! Search budget: time, depth, node and stop-flag limits

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default iterative deepening ceiling
pub const DEFAULT_MAX_DEPTH: u8 = 64;

/// Limits for one top-level search invocation
///
/// The clock starts when a `Searcher` is created from the budget. The budget
/// itself is never mutated during the search.
#[derive(Clone)]
pub struct SearchBudget {
    /// Wall-clock limit measured from the start of the search
    pub time: Option<Duration>,
    /// Maximum iterative deepening depth
    pub max_depth: u8,
    /// Maximum nodes to visit
    pub nodes: Option<u64>,
    /// External stop request (pre-think cancellation)
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl std::fmt::Debug for SearchBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchBudget")
            .field("time", &self.time)
            .field("max_depth", &self.max_depth)
            .field("nodes", &self.nodes)
            .field("stop_flag", &self.stop_flag.as_ref().map(|flag| flag.load(Ordering::Relaxed)))
            .finish()
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBudget {
    /// No time or node limit, default depth ceiling
    pub fn new() -> Self {
        SearchBudget {
            time: None,
            max_depth: DEFAULT_MAX_DEPTH,
            nodes: None,
            stop_flag: None,
        }
    }

    /// Depth-only budget
    pub fn fixed_depth(max_depth: u8) -> Self {
        Self::new().with_max_depth(max_depth)
    }

    /// Time-only budget with the default depth ceiling
    pub fn timed(limit: Duration) -> Self {
        Self::new().with_time(limit)
    }

    pub fn with_time(mut self, limit: Duration) -> Self {
        self.time = Some(limit);
        self
    }

    pub fn with_max_depth(mut self, max_depth: u8) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_nodes(mut self, nodes: u64) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    /// Stop flag raised by another thread (Acquire pairs with the Release store)
    #[inline]
    pub fn stop_requested(&self) -> bool {
        self.stop_flag.as_ref().is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Has the search used up its budget?
    #[inline]
    pub fn exhausted(&self, elapsed: Duration, nodes: u64) -> bool {
        if self.stop_requested() {
            return true;
        }
        if self.nodes.is_some_and(|max_nodes| nodes >= max_nodes) {
            return true;
        }
        self.time.is_some_and(|limit| elapsed >= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_never_expires() {
        let budget = SearchBudget::new();
        assert_eq!(budget.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!budget.exhausted(Duration::from_secs(3600), u64::MAX - 1));
    }

    #[test]
    fn test_time_and_node_limits() {
        let budget = SearchBudget::timed(Duration::from_millis(100)).with_nodes(1000);
        assert!(!budget.exhausted(Duration::from_millis(99), 999));
        assert!(budget.exhausted(Duration::from_millis(100), 0));
        assert!(budget.exhausted(Duration::ZERO, 1000));
    }

    #[test]
    fn test_stop_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let budget = SearchBudget::fixed_depth(3).with_stop_flag(flag.clone());
        assert!(!budget.exhausted(Duration::ZERO, 0));
        flag.store(true, Ordering::Release);
        assert!(budget.stop_requested());
        assert!(budget.exhausted(Duration::ZERO, 0));
    }
}

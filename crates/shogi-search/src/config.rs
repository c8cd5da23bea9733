//! Search configuration
//!
//! Deserialized from TOML by the front end. Every field has a default, so an
//! empty file (or no file) is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::limits::{DEFAULT_MAX_DEPTH, SearchBudget};
use crate::selector::SelectionPolicy;

/// Default tolerance of the tolerance-band policy, in centipawns
pub const DEFAULT_TOLERANCE: i32 = 10;

/// Default depth of the tolerance-band policy
pub const DEFAULT_TOLERANCE_DEPTH: u8 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Deterministic,
    Tolerance,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Time per move in milliseconds, 0 = no time limit
    pub time_ms: u64,
    /// Iterative deepening ceiling
    pub max_depth: u8,
    /// Optional node limit per move
    pub nodes: Option<u64>,
    pub policy: PolicyKind,
    /// Tolerance-band width in centipawns
    pub tolerance: i32,
    /// Search depth used by the tolerance band (0 = one-ply ordering heuristic)
    pub tolerance_depth: u8,
    /// Seed for move selection; `None` draws one from the thread RNG
    pub seed: Option<u64>,
    /// Log every completed depth at info level
    pub log_iterations: bool,
    /// Think on the opponent's time in the play loop
    pub prethink: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_ms: 1000,
            max_depth: DEFAULT_MAX_DEPTH,
            nodes: None,
            policy: PolicyKind::Deterministic,
            tolerance: DEFAULT_TOLERANCE,
            tolerance_depth: DEFAULT_TOLERANCE_DEPTH,
            seed: None,
            log_iterations: false,
            prethink: true,
        }
    }
}

impl SearchConfig {
    /// Budget for one move
    pub fn budget(&self) -> SearchBudget {
        let mut budget = SearchBudget::fixed_depth(self.max_depth);
        if self.time_ms > 0 {
            budget = budget.with_time(Duration::from_millis(self.time_ms));
        }
        if let Some(nodes) = self.nodes {
            budget = budget.with_nodes(nodes);
        }
        budget
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        match self.policy {
            PolicyKind::Deterministic => SelectionPolicy::Deterministic,
            PolicyKind::Tolerance => SelectionPolicy::ToleranceBand {
                tolerance: self.tolerance.max(0),
                depth: self.tolerance_depth,
            },
        }
    }
}

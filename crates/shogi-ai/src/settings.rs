//! Configuration loading
//!
//! `SearchConfig` comes from an optional TOML file; command line flags are
//! applied on top of it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use log::debug;
use shogi_search::{PolicyKind, SearchConfig};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Deterministic,
    Tolerance,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Deterministic => PolicyKind::Deterministic,
            PolicyArg::Tolerance => PolicyKind::Tolerance,
        }
    }
}

/// Search flags shared by every subcommand
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// TOML file with search settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Time per move in milliseconds (0 = no time limit)
    #[arg(long, global = true)]
    pub time_ms: Option<u64>,

    /// Iterative deepening ceiling
    #[arg(long, global = true)]
    pub max_depth: Option<u8>,

    /// Node limit per move
    #[arg(long, global = true)]
    pub nodes: Option<u64>,

    /// Move selection policy
    #[arg(long, value_enum, global = true)]
    pub policy: Option<PolicyArg>,

    /// Tolerance band width in centipawns
    #[arg(long, global = true)]
    pub tolerance: Option<i32>,

    /// Search depth of the tolerance band (0 = ordering heuristic only)
    #[arg(long, global = true)]
    pub tolerance_depth: Option<u8>,

    /// RNG seed for move selection
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Log every completed depth
    #[arg(long, global = true)]
    pub log_iterations: bool,

    /// Do not think on the opponent's time
    #[arg(long, global = true)]
    pub no_prethink: bool,
}

impl SearchArgs {
    /// Load the config file (if any) and apply the flags
    pub fn resolve(&self) -> Result<SearchConfig> {
        let mut config = load_config(self.config.as_deref())?;
        self.apply(&mut config);
        debug!("search config: {config:?}");
        Ok(config)
    }

    pub fn apply(&self, config: &mut SearchConfig) {
        if let Some(time_ms) = self.time_ms {
            config.time_ms = time_ms;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if self.nodes.is_some() {
            config.nodes = self.nodes;
        }
        if let Some(policy) = self.policy {
            config.policy = policy.into();
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(depth) = self.tolerance_depth {
            config.tolerance_depth = depth;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.log_iterations {
            config.log_iterations = true;
        }
        if self.no_prethink {
            config.prethink = false;
        }
    }
}

/// Read a `SearchConfig` from TOML, defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<SearchConfig> {
    let Some(path) = path else {
        return Ok(SearchConfig::default());
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&data).with_context(|| format!("failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        search: SearchArgs,
    }

    fn temp_config(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("shogi-ai-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_no_file_gives_defaults() {
        assert_eq!(load_config(None).unwrap(), SearchConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let path = temp_config("override", "time_ms = 250\npolicy = \"tolerance\"\ntolerance = 40\n");
        let cli = TestCli::parse_from([
            "test",
            "--config",
            path.to_str().unwrap(),
            "--tolerance",
            "5",
            "--seed",
            "9",
            "--no-prethink",
        ]);
        let config = cli.search.resolve().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.time_ms, 250);
        assert_eq!(config.policy, PolicyKind::Tolerance);
        assert_eq!(config.tolerance, 5);
        assert_eq!(config.seed, Some(9));
        assert!(!config.prethink);
    }

    #[test]
    fn test_policy_flag() {
        let cli = TestCli::parse_from(["test", "--policy", "tolerance", "--tolerance-depth", "0"]);
        let config = cli.search.resolve().unwrap();
        assert_eq!(config.policy, PolicyKind::Tolerance);
        assert_eq!(config.tolerance_depth, 0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/shogi-ai.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let path = temp_config("bad", "max_depth = \"deep\"\n");
        let result = load_config(Some(&path));
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}

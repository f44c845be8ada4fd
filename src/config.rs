use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::solver::salesman::Bound;
use crate::web::errors::{Result, SolverError};

/// Tunables shared by every solver entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wall-clock budget for exact knight's tour searches, in milliseconds.
    pub time_budget_ms: u64,
    pub minimax_depth: usize,
    /// Random playouts run for every candidate move.
    pub mcts_simulations: usize,
    pub queen_workers: usize,
    pub tsp_bound: Bound,
    /// Seed for reproducible playouts; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            time_budget_ms: DEFAULT_TIME_BUDGET.as_millis() as u64,
            minimax_depth: DEFAULT_MINIMAX_DEPTH,
            mcts_simulations: DEFAULT_MCTS_SIMULATIONS,
            queen_workers: DEFAULT_QUEEN_WORKERS,
            tsp_bound: Bound::Spanning,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.check()?;
        Ok(config)
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn check(&self) -> Result<()> {
        if self.minimax_depth == 0 {
            return Err(SolverError::invalid("minimax depth must be at least 1"));
        }
        if self.mcts_simulations == 0 {
            return Err(SolverError::invalid("mcts needs at least one simulation per move"));
        }
        if self.queen_workers == 0 {
            return Err(SolverError::invalid("queens need at least one worker"));
        }
        Ok(())
    }
}

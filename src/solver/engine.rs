use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

use super::mcts::mcts_with_rng;
use super::minimax::best_move;
use crate::config::Config;
use crate::game::state::{Cell, GameState, Mark};
use crate::web::errors::{Result, SolverError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Minimax,
    Mcts,
}

/// A tic-tac-toe game between a player and the computer.
pub struct Match {
    state: GameState,
    config: Config,
    rng: Pcg64Mcg,
}

impl Match {
    pub fn new(state: GameState, config: Config) -> Match {
        let rng = match config.seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed),
            None => Pcg64Mcg::from_entropy(),
        };
        Match { state, config, rng }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn apply_player_move(&mut self, cell: Cell) -> Result<&GameState> {
        if self.state.is_terminal() {
            return Err(SolverError::invalid("Game is already over."));
        }
        if !self.state.contains(cell) || self.state.get(cell) != Mark::Empty {
            return Err(SolverError::invalid("Invalid move."));
        }
        self.state = self.state.apply_move(cell);
        Ok(&self.state)
    }

    /// Lets `algorithm` play for the side to move and returns its move.
    pub fn ai_move(&mut self, algorithm: Algorithm) -> Result<Cell> {
        if self.state.is_terminal() {
            return Err(SolverError::invalid("Game is already over."));
        }
        let cell = match algorithm {
            Algorithm::Minimax => best_move(&self.state, self.config.minimax_depth).1,
            Algorithm::Mcts => {
                mcts_with_rng(&self.state, self.config.mcts_simulations, &mut self.rng)
                    .map(|(_, cell)| cell)
            }
        };
        let cell = cell.ok_or_else(|| SolverError::internal("AI could not determine a move."))?;
        self.state = self.state.apply_move(cell);
        Ok(cell)
    }
}

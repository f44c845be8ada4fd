use std::fmt::{Display, Error, Formatter};

use log::debug;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::game::state::{Cell, GameState, Winner};

/// Playout tally of one candidate move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaf {
    pub cell: Cell,
    pub wins: u32,
    pub plays: u32,
}

impl Leaf {
    fn new(cell: Cell) -> Leaf {
        Leaf {
            cell,
            wins: 0,
            plays: 0,
        }
    }
    pub fn win_rate(&self) -> f64 {
        if self.plays == 0 {
            0.0
        } else {
            self.wins as f64 / self.plays as f64
        }
    }
}

impl Display for Leaf {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(
            f,
            "({}, {}): {}/{} wins, {:.1}%",
            self.cell.row,
            self.cell.col,
            self.wins,
            self.plays,
            self.win_rate() * 100.0
        )
    }
}

/// Monte Carlo move choice for the side to move, with an entropy-seeded rng.
pub fn mcts(state: &GameState, simulations: usize) -> Option<(f64, Cell)> {
    let mut rng = Pcg64Mcg::from_entropy();
    mcts_with_rng(state, simulations, &mut rng)
}

/// Runs `simulations` uniform random playouts after each legal move and picks
/// the move with the best empirical win rate, first in row-major order on
/// ties. A lone legal move is returned at once with a win rate of 1.
pub fn mcts_with_rng(
    state: &GameState,
    simulations: usize,
    rng: &mut impl Rng,
) -> Option<(f64, Cell)> {
    let moves = state.possible_moves();
    if state.is_terminal() || moves.is_empty() {
        return None;
    }
    if moves.len() == 1 {
        return Some((1.0, moves[0]));
    }
    let player = state.turn();
    let mut leaves: Vec<Leaf> = moves.iter().map(|&cell| Leaf::new(cell)).collect();
    for leaf in &mut leaves {
        let child = state.apply_move(leaf.cell);
        for _ in 0..simulations {
            leaf.plays += 1;
            if simulate_random_game(&child, rng) == Some(Winner::from(player)) {
                leaf.wins += 1;
            }
        }
    }
    let mut best = leaves[0];
    for leaf in &leaves[1..] {
        if leaf.win_rate() > best.win_rate() {
            best = *leaf;
        }
    }
    debug!("mcts for {:?} chose {}", player, best);
    Some((best.win_rate(), best.cell))
}

/// Plays uniformly random moves until the game ends.
pub fn simulate_random_game(state: &GameState, rng: &mut impl Rng) -> Option<Winner> {
    let mut current = state.clone();
    loop {
        if let Some(winner) = current.winner() {
            return Some(winner);
        }
        coz::progress!("mcts playout ply");
        let moves = current.possible_moves();
        let &cell = moves.choose(rng)?;
        current = current.apply_move(cell);
    }
}


use log::debug;

use crate::game::state::{Cell, GameState, Player};

/// Depth-limited minimax with alpha-beta pruning, scored from `perspective`'s
/// side: the side to move maximizes when it is `perspective`.
///
/// Finished games score +1, -1 or 0. Unfinished leaves at depth zero get the
/// line heuristic, which always stays strictly between -1 and +1 so that a
/// real win outranks any heuristic estimate. The best move is `None` only when
/// no move is available.
pub fn minimax(state: &GameState, depth: usize, perspective: Player) -> (f64, Option<Cell>) {
    let mut nodes = 0u64;
    let maximizing = state.turn() == perspective;
    let result = alpha_beta(
        state,
        depth,
        maximizing,
        perspective,
        f64::NEG_INFINITY,
        f64::INFINITY,
        &mut nodes,
    );
    debug!(
        "minimax depth {} for {:?}: value {:.4} after {} nodes",
        depth, perspective, result.0, nodes
    );
    result
}

/// The move minimax picks for the side to move.
pub fn best_move(state: &GameState, depth: usize) -> (f64, Option<Cell>) {
    minimax(state, depth, state.turn())
}

fn alpha_beta(
    state: &GameState,
    depth: usize,
    maximizing: bool,
    perspective: Player,
    mut alpha: f64,
    mut beta: f64,
    nodes: &mut u64,
) -> (f64, Option<Cell>) {
    *nodes += 1;
    if state.is_terminal() {
        return (state.score(perspective) as f64, None);
    }
    if depth == 0 {
        return (evaluate_heuristic(state, perspective), None);
    }
    let mut best = None;
    let mut value = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };
    for cell in state.possible_moves() {
        let child = state.apply_move(cell);
        let (score, _) = alpha_beta(&child, depth - 1, !maximizing, perspective, alpha, beta, nodes);
        if maximizing {
            if score > value {
                value = score;
                best = Some(cell);
            }
            alpha = alpha.max(value);
        } else {
            if score < value {
                value = score;
                best = Some(cell);
            }
            beta = beta.min(value);
        }
        if alpha >= beta {
            break;
        }
    }
    (value, best)
}

/// Sum of squared line counts over every open run of `win_length` cells:
/// a run holding only `perspective`'s marks adds the square of their count,
/// a run holding only the opponent's subtracts it, mixed or empty runs add
/// nothing. Scaled into the open interval (-1, 1).
pub fn evaluate_heuristic(state: &GameState, perspective: Player) -> f64 {
    let mut score = 0i64;
    let mut windows = 0i64;
    for window in state.windows() {
        windows += 1;
        let mut ours = 0i64;
        let mut theirs = 0i64;
        for mark in &window {
            match mark.owner() {
                Some(owner) if owner == perspective => ours += 1,
                Some(_) => theirs += 1,
                None => {}
            }
        }
        if ours > 0 && theirs == 0 {
            score += ours * ours;
        } else if theirs > 0 && ours == 0 {
            score -= theirs * theirs;
        }
    }
    let length = state.win_length() as i64;
    let ceiling = windows * length * length + 1;
    score as f64 / ceiling as f64
}

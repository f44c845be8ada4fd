use std::time::Duration;

use log::{debug, info, warn};

use super::{Deadline, Outcome};
use crate::constants::*;
use crate::game::tour::TourBoard;
use crate::game::Square;

enum Search {
    Complete,
    DeadEnd,
    Aborted,
}

/// Exact knight's tour by depth-first backtracking from `start`.
///
/// Moves are tried in `KNIGHT_MOVES` order. The search gives up with
/// `TimedOut` once `budget` is spent, however deep it is at that moment.
pub fn solve_knights_tour(start: Square, budget: Duration) -> Outcome<Vec<Square>> {
    if !start.on_board() {
        return Outcome::Infeasible;
    }
    let mut board = TourBoard::default();
    let mut path = Vec::with_capacity(BOARD_CELLS);
    let mut deadline = Deadline::new(budget);
    board.visit(start, 0);
    path.push(start);
    let outcome = match extend(&mut board, start, &mut path, &mut deadline) {
        Search::Complete => Outcome::Found(path),
        Search::DeadEnd => Outcome::Infeasible,
        Search::Aborted => {
            warn!("knight's tour from {} ran out of its {:?} budget", start, budget);
            Outcome::TimedOut
        }
    };
    info!(
        "knight's tour from {} finished after {} calls in {:?}",
        start,
        deadline.polls(),
        deadline.elapsed()
    );
    outcome
}

/// Whether the partially walked `board` can still be completed into a full
/// tour with the knight standing on `from`. The board is left as it was given.
pub fn is_tour_possible_from(board: &TourBoard, from: Square, budget: Duration) -> Outcome<()> {
    if board.is_full() {
        return Outcome::Found(());
    }
    let mut board = board.clone();
    let mut path = Vec::with_capacity(BOARD_CELLS - board.visited());
    let mut deadline = Deadline::new(budget);
    let outcome = match extend(&mut board, from, &mut path, &mut deadline) {
        Search::Complete => Outcome::Found(()),
        Search::DeadEnd => Outcome::Infeasible,
        Search::Aborted => Outcome::TimedOut,
    };
    debug!(
        "feasibility check from {} with {} visited: {:?} after {} calls",
        from,
        board.visited(),
        outcome,
        deadline.polls()
    );
    outcome
}

fn extend(
    board: &mut TourBoard,
    from: Square,
    path: &mut Vec<Square>,
    deadline: &mut Deadline,
) -> Search {
    if board.is_full() {
        return Search::Complete;
    }
    if deadline.expired() {
        return Search::Aborted;
    }
    coz::progress!("knight backtrack");
    for next in board.moves_from(from) {
        board.visit(next, board.visited());
        path.push(next);
        match extend(board, next, path, deadline) {
            Search::Complete => return Search::Complete,
            Search::DeadEnd => {}
            Search::Aborted => {
                path.pop();
                board.unvisit(next);
                return Search::Aborted;
            }
        }
        path.pop();
        board.unvisit(next);
    }
    return Search::DeadEnd;
}

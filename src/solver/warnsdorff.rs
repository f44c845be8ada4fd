use log::debug;

use crate::constants::*;
use crate::game::tour::TourBoard;
use crate::game::Square;

/// Greedy knight's tour by Warnsdorff's rule. Never backtracks, so it can
/// dead-end and return `None` even where a tour exists.
pub fn warnsdorff_tour(start: Square) -> Option<Vec<Square>> {
    if !start.on_board() {
        return None;
    }
    let mut board = TourBoard::default();
    board.visit(start, 0);
    let rest = complete_greedily(&mut board, start)?;
    let mut path = Vec::with_capacity(BOARD_CELLS);
    path.push(start);
    path.extend(rest);
    Some(path)
}

/// The unvisited neighbour of `from` with the strictly smallest onward degree,
/// first in `KNIGHT_MOVES` order on ties.
pub fn next_square(board: &TourBoard, from: Square) -> Option<Square> {
    let mut best: Option<(usize, Square)> = None;
    for next in board.moves_from(from) {
        let degree = board.degree(next);
        if best.map_or(true, |(fewest, _)| degree < fewest) {
            best = Some((degree, next));
        }
    }
    best.map(|(_, square)| square)
}

/// Walks `board` greedily from `from` until every cell is visited. Returns the
/// squares walked, or `None` on a dead end; the board keeps the walk either way.
pub(crate) fn complete_greedily(board: &mut TourBoard, from: Square) -> Option<Vec<Square>> {
    let mut current = from;
    let mut walked = Vec::with_capacity(BOARD_CELLS - board.visited());
    while !board.is_full() {
        let Some(next) = next_square(board, current) else {
            debug!(
                "warnsdorff stuck at {} after {} squares",
                current,
                board.visited()
            );
            return None;
        };
        board.visit(next, board.visited());
        walked.push(next);
        current = next;
    }
    Some(walked)
}

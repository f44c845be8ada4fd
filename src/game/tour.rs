use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{Square, Validation};
use crate::constants::*;
use crate::solver::backtrack::is_tour_possible_from;
use crate::solver::warnsdorff::{complete_greedily, next_square};
use crate::solver::Outcome;

pub type Moves = SmallVec<[Square; 8]>;

/// Knight's tour working board: every cell is unvisited or holds the step at
/// which the knight reached it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TourBoard {
    pub(crate) cells: [[Option<u8>; BOARD_SIZE]; BOARD_SIZE],
    pub(crate) visited: usize,
}

impl Default for TourBoard {
    fn default() -> Self {
        TourBoard {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            visited: 0,
        }
    }
}

impl TourBoard {
    /// Board with `path` already walked, in order, or why `path` is not a
    /// legal knight walk.
    pub fn from_path(path: &[Square]) -> Result<TourBoard, String> {
        walk(path)
    }
    pub fn step_at(&self, square: Square) -> Option<u8> {
        self.cells[square.x][square.y]
    }
    pub fn is_unvisited(&self, square: Square) -> bool {
        square.on_board() && self.cells[square.x][square.y].is_none()
    }
    pub fn visited(&self) -> usize {
        self.visited
    }
    pub fn is_full(&self) -> bool {
        self.visited == BOARD_CELLS
    }
    pub(crate) fn visit(&mut self, square: Square, step: usize) {
        debug_assert!(self.is_unvisited(square));
        self.cells[square.x][square.y] = Some(step as u8);
        self.visited += 1;
    }
    pub(crate) fn unvisit(&mut self, square: Square) {
        debug_assert!(!self.is_unvisited(square));
        self.cells[square.x][square.y] = None;
        self.visited -= 1;
    }
    /// Unvisited knight moves from `square`, in `KNIGHT_MOVES` order.
    pub fn moves_from(&self, square: Square) -> Moves {
        KNIGHT_MOVES
            .iter()
            .filter_map(|&(dx, dy)| square.offset(dx, dy))
            .filter(|&next| self.is_unvisited(next))
            .collect()
    }
    /// Warnsdorff degree: how many onward moves `square` has.
    pub fn degree(&self, square: Square) -> usize {
        KNIGHT_MOVES
            .iter()
            .filter_map(|&(dx, dy)| square.offset(dx, dy))
            .filter(|&next| self.is_unvisited(next))
            .count()
    }
}

pub fn random_start(rng: &mut impl Rng) -> Square {
    Square::new(rng.gen_range(0..BOARD_SIZE), rng.gen_range(0..BOARD_SIZE))
}

/// Checks the moves of `path` and returns the walked board, or the reason the
/// path is not a legal knight walk.
fn walk(path: &[Square]) -> Result<TourBoard, String> {
    let mut board = TourBoard::default();
    for (step, &square) in path.iter().enumerate() {
        if !square.on_board() {
            return Err(format!("Square {} is off the board.", square));
        }
        if step > 0 {
            let previous = path[step - 1];
            if !previous.is_knight_move(&square) {
                return Err(format!("Invalid knight move from {} to {}.", previous, square));
            }
        }
        if !board.is_unvisited(square) {
            return Err(format!("Square {} is visited twice.", square));
        }
        board.visit(square, step);
    }
    Ok(board)
}

/// Judges a player's (possibly partial) tour. Incomplete paths are checked for
/// whether a full tour can still be reached from where they stop.
pub fn validate_player_path(path: &[Square], budget: Duration) -> Validation {
    let Some(&last) = path.last() else {
        return Validation::reject("Path is empty.");
    };
    let board = match walk(path) {
        Ok(board) => board,
        Err(message) => return Validation::reject(message),
    };
    if board.is_full() {
        return Validation::accept("Complete Tour!");
    }
    let verdict = match is_tour_possible_from(&board, last, budget) {
        Outcome::Found(()) => "a full tour is still possible from here.",
        Outcome::Infeasible => "no full tour is possible from here.",
        Outcome::TimedOut => "could not decide in time whether a full tour is possible.",
    };
    Validation::reject(format!(
        "Incomplete Tour: {} of {} squares visited, {}",
        path.len(),
        BOARD_CELLS,
        verdict
    ))
}

/// Like `validate_player_path`, but asks whether Warnsdorff's rule alone can
/// finish the path.
pub fn validate_warnsdorff_tour(path: &[Square]) -> Validation {
    let Some(&last) = path.last() else {
        return Validation::reject("Path is empty.");
    };
    let mut board = match walk(path) {
        Ok(board) => board,
        Err(message) => return Validation::reject(message),
    };
    if board.is_full() {
        return Validation::accept("Tour already completed");
    }
    match complete_greedily(&mut board, last) {
        Some(rest) => Validation::accept(format!(
            "Warnsdorff's rule completes the tour in {} more moves.",
            rest.len()
        )),
        None => Validation::reject("Warnsdorff's rule gets stuck before completing the tour."),
    }
}

/// Errors a player can make during manual play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourMoveError {
    OffBoard,
    NotAKnightMove,
    AlreadyVisited,
    Finished,
}

/// A manual-play knight's tour in progress.
#[derive(Clone, Serialize, Deserialize)]
pub struct TourSession {
    board: TourBoard,
    path: Vec<Square>,
}

impl TourSession {
    pub fn start(square: Square) -> Option<TourSession> {
        if !square.on_board() {
            return None;
        }
        let mut board = TourBoard::default();
        board.visit(square, 0);
        Some(TourSession {
            board,
            path: vec![square],
        })
    }

    pub fn current(&self) -> Square {
        self.path[self.path.len() - 1]
    }
    pub fn path(&self) -> &[Square] {
        &self.path
    }
    pub fn board(&self) -> &TourBoard {
        &self.board
    }
    pub fn is_complete(&self) -> bool {
        self.board.is_full()
    }
    pub fn legal_moves(&self) -> Moves {
        self.board.moves_from(self.current())
    }

    pub fn make_move(&mut self, square: Square) -> Result<usize, TourMoveError> {
        if self.is_complete() {
            return Err(TourMoveError::Finished);
        }
        if !square.on_board() {
            return Err(TourMoveError::OffBoard);
        }
        if !self.current().is_knight_move(&square) {
            return Err(TourMoveError::NotAKnightMove);
        }
        if !self.board.is_unvisited(square) {
            return Err(TourMoveError::AlreadyVisited);
        }
        let step = self.path.len();
        self.board.visit(square, step);
        self.path.push(square);
        Ok(step)
    }

    /// Takes back the last move; the starting square can't be undone.
    pub fn undo(&mut self) -> Option<Square> {
        if self.path.len() < 2 {
            return None;
        }
        let square = self.path.pop()?;
        self.board.unvisit(square);
        Some(square)
    }

    /// The move Warnsdorff's rule would play next.
    pub fn hint(&self) -> Option<Square> {
        next_square(&self.board, self.current())
    }

    pub fn validate(&self, budget: Duration) -> Validation {
        validate_player_path(&self.path, budget)
    }
}

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::web::errors::{Result, SolverError};

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum Player {
    O,
    X,
}

impl Player {
    pub fn opponent(&self) -> Player {
        match self {
            Player::O => Player::X,
            Player::X => Player::O,
        }
    }
    fn mark(&self) -> Mark {
        match self {
            Player::O => Mark::O,
            Player::X => Mark::X,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, Default, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    Empty,
    O,
    X,
}

impl Mark {
    pub fn owner(&self) -> Option<Player> {
        match self {
            Mark::Empty => None,
            Mark::O => Some(Player::O),
            Mark::X => Some(Player::X),
        }
    }
    /// The numeric encoding used by callers: 1 for O, -1 for X, 0 for empty.
    pub fn value(&self) -> i8 {
        match self {
            Mark::Empty => 0,
            Mark::O => 1,
            Mark::X => -1,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum Winner {
    O,
    X,
    Draw,
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::O => Winner::O,
            Player::X => Winner::X,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }
}

// (drow, dcol) of the four line directions: row, column, `\` and `/`.
static DIRECTIONS: [(usize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// An immutable tic-tac-toe position. Playing a move yields a new state and
/// leaves this one untouched, so search branches can share states freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    size: usize,
    win_length: usize,
    cells: Vec<Mark>,
    turn: Player,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(TIC_TAC_TOE_SIZE, TIC_TAC_TOE_WIN_LENGTH)
    }
}

impl GameState {
    /// Empty board with O to move.
    pub fn new(size: usize, win_length: usize) -> GameState {
        let size = size.max(1);
        GameState {
            size,
            win_length: win_length.clamp(1, size),
            cells: vec![Mark::Empty; size * size],
            turn: Player::O,
        }
    }

    /// Builds a state from rows of 1 (O), -1 (X) and 0 (empty).
    pub fn from_rows(rows: &[Vec<i8>], turn: Player, win_length: usize) -> Result<GameState> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|row| row.len() != size) {
            return Err(SolverError::invalid("board must be a non-empty square grid"));
        }
        if win_length == 0 || win_length > size {
            return Err(SolverError::invalid(format!(
                "win length {} does not fit a {}x{} board",
                win_length, size, size
            )));
        }
        let mut cells = Vec::with_capacity(size * size);
        for &value in rows.iter().flatten() {
            cells.push(match value {
                0 => Mark::Empty,
                1 => Mark::O,
                -1 => Mark::X,
                other => {
                    return Err(SolverError::invalid(format!(
                        "board cells must be 1, -1 or 0, found {}",
                        other
                    )))
                }
            });
        }
        Ok(GameState {
            size,
            win_length,
            cells,
            turn,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }
    pub fn win_length(&self) -> usize {
        self.win_length
    }
    pub fn turn(&self) -> Player {
        self.turn
    }
    pub fn get(&self, cell: Cell) -> Mark {
        self.cells[cell.row * self.size + cell.col]
    }
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }
    pub fn rows(&self) -> Vec<Vec<i8>> {
        self.cells.chunks(self.size).map(|row| row.iter().map(Mark::value).collect()).collect()
    }

    /// Empty cells in row-major order.
    pub fn possible_moves(&self) -> Vec<Cell> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i] == Mark::Empty)
            .map(|i| Cell::new(i / self.size, i % self.size))
            .collect()
    }

    /// The position after the player to move marks `cell`. The caller must
    /// pass an empty cell on the board.
    pub fn apply_move(&self, cell: Cell) -> GameState {
        debug_assert!(self.contains(cell) && self.get(cell) == Mark::Empty);
        let mut cells = self.cells.clone();
        cells[cell.row * self.size + cell.col] = self.turn.mark();
        GameState {
            size: self.size,
            win_length: self.win_length,
            cells,
            turn: self.turn.opponent(),
        }
    }

    /// Every straight run of `win_length` cells on the board.
    pub(crate) fn windows(&self) -> impl Iterator<Item = Vec<Mark>> + '_ {
        let n = self.size as isize;
        let len = self.win_length as isize;
        (0..self.size).flat_map(move |row| {
            (0..self.size).flat_map(move |col| {
                DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
                    let end_row = row as isize + dr as isize * (len - 1);
                    let end_col = col as isize + dc * (len - 1);
                    if end_row >= n || end_col < 0 || end_col >= n {
                        return None;
                    }
                    Some(
                        (0..len)
                            .map(|k| {
                                let r = row as isize + dr as isize * k;
                                let c = col as isize + dc * k;
                                self.cells[(r * n + c) as usize]
                            })
                            .collect(),
                    )
                })
            })
        })
    }

    /// `Some` once the game is over: a completed run decides it, otherwise a
    /// full board is a draw.
    pub fn winner(&self) -> Option<Winner> {
        for window in self.windows() {
            let first = window[0];
            if let Some(player) = first.owner() {
                if window.iter().all(|&mark| mark == first) {
                    return Some(player.into());
                }
            }
        }
        if self.cells.iter().all(|&mark| mark != Mark::Empty) {
            return Some(Winner::Draw);
        }
        None
    }

    pub fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// +1 when `perspective` has won, -1 when it has lost, 0 for a draw or an
    /// unfinished game.
    pub fn score(&self, perspective: Player) -> i32 {
        match self.winner() {
            Some(Winner::Draw) | None => 0,
            Some(winner) if winner == Winner::from(perspective) => 1,
            Some(_) => -1,
        }
    }
}

use std::collections::BTreeSet;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::Validation;
use crate::constants::*;
use crate::solver::queens::solve_sequential;
use crate::solver::Outcome;
use crate::web::errors::{Result, SolverError};

/// 8×8 board of queens, indexed `[row][col]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueenBoard(pub [[bool; BOARD_SIZE]; BOARD_SIZE]);

impl QueenBoard {
    pub fn has_queen(&self, row: usize, col: usize) -> bool {
        self.0[row][col]
    }
    pub(crate) fn place(&mut self, row: usize, col: usize) {
        self.0[row][col] = true;
    }
    pub(crate) fn remove(&mut self, row: usize, col: usize) {
        self.0[row][col] = false;
    }
    pub fn queens(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..BOARD_SIZE)
            .flat_map(move |row| (0..BOARD_SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.0[row][col])
    }

    /// Whether a queen at (`row`, `col`) is safe from every queen already in
    /// columns `0..col`: same row, `\` diagonal and `/` diagonal.
    pub fn is_safe(&self, row: usize, col: usize) -> bool {
        if (0..col).any(|c| self.0[row][c]) {
            return false;
        }
        if (0..=row).rev().zip((0..=col).rev()).any(|(r, c)| self.0[r][c]) {
            return false;
        }
        if (row..BOARD_SIZE).zip((0..=col).rev()).any(|(r, c)| self.0[r][c]) {
            return false;
        }
        return true;
    }

    /// Row-major string of `0`s and `1`s, 64 characters long.
    pub fn to_solution_string(&self) -> String {
        self.0
            .iter()
            .flat_map(|row| row.iter().map(|&queen| if queen { '1' } else { '0' }))
            .collect()
    }

    pub fn parse_solution(solution: &str) -> Result<QueenBoard> {
        if solution.len() != BOARD_CELLS {
            return Err(SolverError::invalid(format!(
                "solution string must have {} characters, got {}",
                BOARD_CELLS,
                solution.len()
            )));
        }
        let mut board = QueenBoard::default();
        for (i, ch) in solution.chars().enumerate() {
            match ch {
                '1' => board.place(i / BOARD_SIZE, i % BOARD_SIZE),
                '0' => {}
                other => {
                    return Err(SolverError::invalid(format!(
                        "solution string may only hold 0 and 1, found {:?}",
                        other
                    )))
                }
            }
        }
        Ok(board)
    }

    /// Accepts 8 rows of 8 values that are each 0 or 1.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<QueenBoard> {
        if rows.len() != BOARD_SIZE || rows.iter().any(|row| row.len() != BOARD_SIZE) {
            return Err(SolverError::invalid("Board must be an 8x8 array."));
        }
        let mut board = QueenBoard::default();
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                match value {
                    0 => {}
                    1 => board.place(row, col),
                    _ => return Err(SolverError::invalid("Board must contain only 0s and 1s.")),
                }
            }
        }
        Ok(board)
    }
}

/// Full check of a submitted board, independent of any solver.
pub fn validate_board(board: &QueenBoard) -> Validation {
    let queens: Vec<(usize, usize)> = board.queens().collect();
    if queens.len() != QUEENS {
        return Validation::reject(format!("Expected {} queens, found {}.", QUEENS, queens.len()));
    }
    for row in 0..BOARD_SIZE {
        let count = (0..BOARD_SIZE).filter(|&col| board.has_queen(row, col)).count();
        if count != 1 {
            return Validation::reject(format!("Row {} has {} queens.", row, count));
        }
    }
    for col in 0..BOARD_SIZE {
        let count = (0..BOARD_SIZE).filter(|&row| board.has_queen(row, col)).count();
        if count != 1 {
            return Validation::reject(format!("Column {} has {} queens.", col, count));
        }
    }
    for (i, &(r1, c1)) in queens.iter().enumerate() {
        for &(r2, c2) in &queens[i + 1..] {
            if r1.abs_diff(r2) == c1.abs_diff(c2) {
                return Validation::reject(format!(
                    "Queens at ({}, {}) and ({}, {}) share a diagonal.",
                    r1, c1, r2, c2
                ));
            }
        }
    }
    Validation::accept("Queens are placed correctly.")
}

static CANONICAL: OnceCell<BTreeSet<String>> = OnceCell::new();

/// The 92 solutions of the standard board, enumerated once per process.
pub fn canonical_solutions() -> &'static BTreeSet<String> {
    CANONICAL.get_or_init(|| solve_sequential().into_iter().collect())
}

/// Validates a submission and looks it up among the canonical solutions.
pub fn check_submission(board: &QueenBoard) -> (Validation, Outcome<String>) {
    let validation = validate_board(board);
    if !validation.valid {
        return (validation, Outcome::Infeasible);
    }
    let solution = board.to_solution_string();
    if canonical_solutions().contains(&solution) {
        (validation, Outcome::Found(solution))
    } else {
        (
            Validation::reject(format!(
                "Not one of the {} precomputed solutions.",
                QUEEN_SOLUTIONS
            )),
            Outcome::Infeasible,
        )
    }
}

use std::collections::BTreeMap;

use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::constants::*;
use crate::game::distances::{city_index, DistanceMatrix, Route};
use crate::game::queens::{check_submission, QueenBoard};
use crate::game::state::{Cell, GameState, Player};
use crate::game::tour::{validate_player_path, validate_warnsdorff_tour};
use crate::game::towers::{score_solution, Mode, Move, Score};
use crate::game::{Square, Validation};
use crate::solver::backtrack::solve_knights_tour;
use crate::solver::engine::Algorithm;
use crate::solver::hanoi::{new_game, NewGame};
use crate::solver::held_karp::tsp_held_karp;
use crate::solver::mcts::mcts_with_rng;
use crate::solver::minimax::best_move;
use crate::solver::queens::{run_rounds, solve_parallel, solve_sequential, RoundsReport};
use crate::solver::salesman::{
    compare_human_route, tsp_branch_and_bound, tsp_nearest_neighbor, HumanComparison,
};
use crate::solver::warnsdorff::warnsdorff_tour;
use crate::solver::{timed, Outcome, Timed};
use errors::{Result, SolverError};

pub mod errors;


/// The uniform answer of every solve call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    /// Seconds.
    pub elapsed_time: f64,
    pub message: String,
}

impl<T> SolveResponse<T> {
    fn from_outcome(timed: Timed<Outcome<T>>, found: &str) -> SolveResponse<T> {
        let elapsed_time = timed.seconds();
        let (success, result, message) = match timed.value {
            Outcome::Found(value) => (true, Some(value), found.to_string()),
            Outcome::Infeasible => (false, None, "No solution exists.".to_string()),
            Outcome::TimedOut => (false, None, "Search ran out of time.".to_string()),
        };
        SolveResponse {
            success,
            result,
            elapsed_time,
            message,
        }
    }
}

pub type ValidateResponse = Validation;

/// Deserializes a request body.
pub fn parse_request<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

fn square(&[x, y]: &[usize; 2]) -> Result<Square> {
    let square = Square::new(x, y);
    if square.on_board() {
        Ok(square)
    } else {
        Err(SolverError::invalid(format!(
            "coordinates must lie in 0..{}, got {}",
            BOARD_SIZE, square
        )))
    }
}

// ---------------------------------------------------------------------------
// Knight's tour

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TourMethod {
    #[default]
    Backtracking,
    Warnsdorff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourRequest {
    pub start: [usize; 2],
    #[serde(default)]
    pub method: TourMethod,
}

pub fn solve_tour(request: &TourRequest, config: &Config) -> Result<SolveResponse<Vec<[usize; 2]>>> {
    let start = square(&request.start)?;
    let run = match request.method {
        TourMethod::Backtracking => timed(|| solve_knights_tour(start, config.time_budget())),
        TourMethod::Warnsdorff => timed(|| Outcome::from(warnsdorff_tour(start))),
    };
    let run = Timed {
        elapsed: run.elapsed,
        value: run.value.map(|path| path.iter().map(|s| [s.x, s.y]).collect::<Vec<_>>()),
    };
    Ok(SolveResponse::from_outcome(run, "Tour found."))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourValidateRequest {
    pub path: Vec<[usize; 2]>,
    #[serde(default)]
    pub method: TourMethod,
}

/// Coordinates are taken as given; off-board squares are reported by the
/// validator itself.
pub fn validate_tour(request: &TourValidateRequest, config: &Config) -> ValidateResponse {
    let path: Vec<Square> = request.path.iter().map(|&[x, y]| Square::new(x, y)).collect();
    match request.method {
        TourMethod::Backtracking => validate_player_path(&path, config.time_budget()),
        TourMethod::Warnsdorff => validate_warnsdorff_tour(&path),
    }
}

// ---------------------------------------------------------------------------
// Eight queens

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueensSolutions {
    pub sequential: Vec<String>,
    pub parallel: Vec<String>,
}

pub fn solve_queens(config: &Config) -> Result<SolveResponse<QueensSolutions>> {
    let run = timed(|| agreed_solutions(solve_sequential(), solve_parallel(config.queen_workers)));
    let run = Timed {
        value: Outcome::Found(run.value?),
        elapsed: run.elapsed,
    };
    Ok(SolveResponse::from_outcome(run, &format!("Found all {} solutions.", QUEEN_SOLUTIONS)))
}

/// Both enumerations must produce the same solution set.
fn agreed_solutions(sequential: Vec<String>, parallel: Vec<String>) -> Result<QueensSolutions> {
    if sequential != parallel {
        return Err(SolverError::internal(format!(
            "parallel and sequential queens enumerations disagree ({} vs {} solutions)",
            parallel.len(),
            sequential.len()
        )));
    }
    Ok(QueensSolutions { sequential, parallel })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueensSubmitRequest {
    pub board: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueensVerdict {
    #[serde(flatten)]
    pub validation: Validation,
    /// The board as a solution string when it is one of the canonical solutions.
    pub solution: Option<String>,
}

pub fn submit_queens(request: &QueensSubmitRequest) -> Result<QueensVerdict> {
    let board = QueenBoard::from_rows(&request.board)?;
    let (validation, canonical) = check_submission(&board);
    Ok(QueensVerdict {
        validation,
        solution: canonical.found(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundsRequest {
    #[serde(default = "one_round")]
    pub rounds: usize,
}

fn one_round() -> usize {
    1
}

pub fn queens_rounds(request: &RoundsRequest, config: &Config) -> Result<RoundsReport> {
    if request.rounds == 0 {
        return Err(SolverError::invalid("rounds must be at least 1"));
    }
    Ok(run_rounds(request.rounds, config.queen_workers))
}

// ---------------------------------------------------------------------------
// Tic-tac-toe

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeRequest {
    /// Rows of 1 (O), -1 (X) and 0 (empty).
    pub board: Vec<Vec<i8>>,
    pub turn: Player,
    pub algorithm: Algorithm,
    #[serde(default)]
    pub win_length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveAnswer {
    pub row: usize,
    pub col: usize,
    /// Minimax value or MCTS win rate of the chosen move.
    pub score: f64,
}

pub fn tic_tac_toe_move(
    request: &TicTacToeRequest,
    config: &Config,
    rng: &mut impl rand::Rng,
) -> Result<SolveResponse<MoveAnswer>> {
    let win_length = request.win_length.unwrap_or(TIC_TAC_TOE_WIN_LENGTH.min(request.board.len()));
    let state = GameState::from_rows(&request.board, request.turn, win_length)?;
    if state.is_terminal() {
        return Err(SolverError::invalid("Game is already over."));
    }
    let run = timed(|| {
        let choice: Option<(f64, Cell)> = match request.algorithm {
            Algorithm::Minimax => {
                let (score, cell) = best_move(&state, config.minimax_depth);
                cell.map(|cell| (score, cell))
            }
            Algorithm::Mcts => mcts_with_rng(&state, config.mcts_simulations, rng),
        };
        Outcome::from(choice.map(|(score, cell)| MoveAnswer {
            row: cell.row,
            col: cell.col,
            score,
        }))
    });
    Ok(SolveResponse::from_outcome(run, "Move chosen."))
}

// ---------------------------------------------------------------------------
// Traveling salesman

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TspRequest {
    /// Single letter label of the home city.
    pub home_city: String,
    /// Labels of the cities to visit besides home.
    pub cities: Vec<String>,
    /// Keyed by city index: `{"0": {"0": null, "1": 20.5}}`.
    pub distances: BTreeMap<String, BTreeMap<String, Option<f64>>>,
    #[serde(default)]
    pub human_route: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedRoute {
    pub route: Vec<char>,
    pub distance: f64,
    pub time: f64,
}

impl From<Timed<Route>> for TimedRoute {
    fn from(timed: Timed<Route>) -> Self {
        TimedRoute {
            route: timed.value.labels(),
            distance: timed.value.distance,
            time: timed.seconds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TspReport {
    pub nearest_neighbor: TimedRoute,
    pub branch_bound: TimedRoute,
    pub held_karp: TimedRoute,
    pub human_route: Option<HumanComparison>,
}

pub fn solve_tsp(request: &TspRequest, config: &Config) -> Result<TspReport> {
    let matrix = DistanceMatrix::from_keyed(&request.distances)?;
    let home = city_index(&request.home_city)?;
    let stops = request
        .cities
        .iter()
        .map(|label| city_index(label))
        .filter(|index| index.as_ref().map_or(true, |&i| i != home))
        .collect::<Result<Vec<_>>>()?;

    let nearest = timed(|| tsp_nearest_neighbor(&matrix, home, &stops));
    let branch = timed(|| tsp_branch_and_bound(&matrix, home, &stops, config.tsp_bound));
    let exact = timed(|| tsp_held_karp(&matrix, home, &stops));
    let nearest = Timed {
        elapsed: nearest.elapsed,
        value: nearest.value?,
    };
    let branch = Timed {
        elapsed: branch.elapsed,
        value: branch.value?,
    };
    let exact = Timed {
        elapsed: exact.elapsed,
        value: exact.value?,
    };
    info!(
        "tsp over {} stops: nearest {:.2}, branch and bound {:.2}, held-karp {:.2}",
        stops.len(),
        nearest.value.distance,
        branch.value.distance,
        exact.value.distance
    );

    let human_route = if request.human_route.is_empty() {
        None
    } else {
        let route = request
            .human_route
            .iter()
            .map(|label| city_index(label))
            .collect::<Result<Vec<_>>>()?;
        let best = nearest.value.distance.min(branch.value.distance).min(exact.value.distance);
        Some(compare_human_route(&matrix, &route, best)?)
    };
    Ok(TspReport {
        nearest_neighbor: nearest.into(),
        branch_bound: branch.into(),
        held_karp: exact.into(),
        human_route,
    })
}

// ---------------------------------------------------------------------------
// Tower of Hanoi

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HanoiNewGameRequest {
    #[serde(default)]
    pub disk_count: Option<u8>,
    #[serde(default)]
    pub mode: Mode,
}

pub fn hanoi_new_game(request: &HanoiNewGameRequest, rng: &mut impl rand::Rng) -> Result<NewGame> {
    let disks = match request.disk_count {
        Some(disks) => disks,
        None => crate::solver::hanoi::random_disk_count(rng),
    };
    new_game(disks, request.mode)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HanoiValidateRequest {
    pub disk_count: u8,
    /// `[disk, "from", "to"]` triples.
    pub moves: Vec<Move>,
    #[serde(default)]
    pub mode: Mode,
}

pub fn hanoi_validate(request: &HanoiValidateRequest) -> Score {
    score_solution(request.disk_count, &request.moves, request.mode)
}

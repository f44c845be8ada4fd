use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{error, info};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::Serialize;

use solver::config::Config;
use solver::constants::*;
use solver::game::distances::random_distance_matrix;
use solver::game::queens::QueenBoard;
use solver::game::state::GameState;
use solver::game::tour::TourBoard;
use solver::game::towers::{Mode, Towers};
use solver::solver::engine::{Algorithm, Match};
use solver::solver::salesman::Bound;
use solver::web::errors::{Result, SolverError};
use solver::web::{self, TourMethod, TourRequest};

#[derive(Parser)]
#[command(name = "puzzle-solver")]
#[command(about = "Knight's tour, eight queens, tic-tac-toe, traveling salesman and Tower of Hanoi solvers")]
struct Cli {
    /// JSON file with solver settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print results as JSON instead of boards
    #[arg(long, global = true)]
    json: bool,
    /// Seed for every random choice
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find a knight's tour from a starting square
    Knight {
        #[arg(default_value_t = 0)]
        x: usize,
        #[arg(default_value_t = 0)]
        y: usize,
        #[arg(long, value_enum, default_value_t = TourMethod::Backtracking)]
        method: TourMethod,
        /// Search budget in milliseconds
        #[arg(long)]
        time_budget_ms: Option<u64>,
    },
    /// Enumerate all eight queens solutions
    Queens {
        #[arg(long, default_value_t = 1)]
        rounds: usize,
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Let the computer play a game of tic-tac-toe against itself
    Tictactoe {
        #[arg(long, value_enum, default_value_t = Algorithm::Minimax)]
        o: Algorithm,
        #[arg(long, value_enum, default_value_t = Algorithm::Mcts)]
        x: Algorithm,
        #[arg(long)]
        depth: Option<usize>,
        #[arg(long)]
        simulations: Option<usize>,
    },
    /// Solve a random traveling salesman instance
    Tsp {
        #[arg(long, default_value_t = 6)]
        cities: usize,
        #[arg(long, value_enum)]
        bound: Option<Bound>,
    },
    /// Solve the Tower of Hanoi
    Hanoi {
        #[arg(long)]
        disks: Option<u8>,
        #[arg(long, value_enum, default_value_t = Mode::ThreePeg)]
        mode: Mode,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let now = Instant::now();
    match run(cli) {
        Ok(()) => {
            info!("took {:?}", now.elapsed());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err.to_string().red());
            ExitCode::FAILURE
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let mut rng = match config.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_entropy(),
    };

    match cli.command {
        Command::Knight {
            x,
            y,
            method,
            time_budget_ms,
        } => {
            if let Some(ms) = time_budget_ms {
                config.time_budget_ms = ms;
            }
            let response = web::solve_tour(&TourRequest { start: [x, y], method }, &config)?;
            if cli.json {
                return print_json(&response);
            }
            println!("{} ({:.3}s)", response.message, response.elapsed_time);
            if let Some(path) = &response.result {
                let squares: Vec<_> = path
                    .iter()
                    .map(|&[x, y]| solver::game::Square::new(x, y))
                    .collect();
                print!("{}", TourBoard::from_path(&squares).map_err(SolverError::Internal)?);
            }
        }
        Command::Queens { rounds, workers } => {
            if let Some(workers) = workers {
                config.queen_workers = workers;
            }
            config.check()?;
            let response = web::solve_queens(&config)?;
            let report = web::queens_rounds(&web::RoundsRequest { rounds }, &config)?;
            if cli.json {
                print_json(&response)?;
                return print_json(&report);
            }
            println!("{} ({:.3}s)", response.message, response.elapsed_time);
            if let Some(first) = response.result.as_ref().and_then(|found| found.sequential.first()) {
                print!("{}", QueenBoard::parse_solution(first)?);
            }
            println!(
                "sequential {:.6}s ± {:.6}, parallel {:.6}s ± {:.6}",
                report.mean_sequential,
                report.std_dev_sequential,
                report.mean_parallel,
                report.std_dev_parallel
            );
        }
        Command::Tictactoe {
            o,
            x,
            depth,
            simulations,
        } => {
            if let Some(depth) = depth {
                config.minimax_depth = depth;
            }
            if let Some(simulations) = simulations {
                config.mcts_simulations = simulations;
            }
            config.check()?;
            let mut game = Match::new(GameState::default(), config);
            let mut moves = Vec::new();
            while !game.state().is_terminal() {
                let algorithm = match game.state().turn() {
                    solver::game::state::Player::O => o,
                    solver::game::state::Player::X => x,
                };
                let cell = game.ai_move(algorithm)?;
                moves.push(cell);
                if !cli.json {
                    println!("{:?} plays ({}, {})", algorithm, cell.row, cell.col);
                    print!("{}", game.state());
                }
            }
            if cli.json {
                return print_json(&(moves, game.state().winner()));
            }
        }
        Command::Tsp { cities, bound } => {
            if !(2..=MAX_CITIES).contains(&cities) {
                return Err(SolverError::InvalidInput(format!(
                    "city count must be between 2 and {}",
                    MAX_CITIES
                )));
            }
            if let Some(bound) = bound {
                config.tsp_bound = bound;
            }
            let matrix = random_distance_matrix(cities, RANDOM_DISTANCE_KM, &mut rng);
            let request = web::TspRequest {
                home_city: "A".to_string(),
                cities: CITY_LABELS.chars().skip(1).take(cities - 1).map(String::from).collect(),
                distances: matrix.to_keyed(),
                human_route: Vec::new(),
            };
            let report = web::solve_tsp(&request, &config)?;
            if cli.json {
                return print_json(&report);
            }
            print!("{}", matrix);
            for (name, run) in [
                ("nearest neighbour", &report.nearest_neighbor),
                ("branch and bound", &report.branch_bound),
                ("held-karp", &report.held_karp),
            ] {
                let route: Vec<String> = run.route.iter().map(char::to_string).collect();
                println!(
                    "{:>18}: {} ({:.2} km, {:.6}s)",
                    name.bold(),
                    route.join(" -> "),
                    run.distance,
                    run.time
                );
            }
        }
        Command::Hanoi { disks, mode } => {
            let request = web::HanoiNewGameRequest {
                disk_count: disks,
                mode,
            };
            let game = web::hanoi_new_game(&request, &mut rng)?;
            if cli.json {
                return print_json(&game);
            }
            print!("{}", Towers::for_mode(game.disk_count, mode));
            println!("minimum moves: {}", game.min_moves);
            for (name, run) in [
                ("recursive", &game.recursive),
                ("iterative", &game.iterative),
                ("frame-stewart", &game.frame_stewart),
            ] {
                println!("{:>14}: {} moves in {:.6}s", name.bold(), run.moves.len(), run.time);
            }
        }
    }
    Ok(())
}

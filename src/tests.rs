use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::config::Config;
use crate::constants::*;
use crate::game::distances::{random_distance_matrix, DistanceMatrix};
use crate::game::queens::{canonical_solutions, validate_board, QueenBoard};
use crate::game::state::{Cell, GameState, Player};
use crate::game::tour::{validate_player_path, TourBoard, TourSession};
use crate::game::towers::{score_solution, validate_move_sequence, Mode, Move, Peg};
use crate::game::Square;
use crate::solver::backtrack::{is_tour_possible_from, solve_knights_tour};
use crate::solver::engine::{Algorithm, Match};
use crate::solver::hanoi::{
    frame_stewart_algorithm, frame_stewart_move_count, minimum_moves, new_game, plan, solve_toh_iterative,
    solve_toh_recursive,
};
use crate::solver::held_karp::tsp_held_karp;
use crate::solver::mcts::{mcts_with_rng, simulate_random_game};
use crate::solver::minimax::{best_move, evaluate_heuristic, minimax};
use crate::solver::queens::{run_rounds, solve_parallel, solve_sequential};
use crate::solver::salesman::{compare_human_route, tsp_branch_and_bound, tsp_nearest_neighbor, Bound};
use crate::solver::warnsdorff::warnsdorff_tour;
use crate::solver::{Deadline, Outcome};
use crate::web::errors::SolverError;

fn assert_tour(path: &[Square], start: Square) {
    assert_eq!(BOARD_CELLS, path.len());
    assert_eq!(start, path[0]);
    for pair in path.windows(2) {
        assert!(pair[0].is_knight_move(&pair[1]), "{} -> {}", pair[0], pair[1]);
    }
    let board = TourBoard::from_path(path).unwrap();
    assert!(board.is_full());
}

// ---------------------------------------------------------------------------
// knight's tour

#[test]
fn test_backtracking_tour_from_corner() {
    let start = Square::new(0, 0);
    match solve_knights_tour(start, Duration::from_secs(120)) {
        Outcome::Found(path) => assert_tour(&path, start),
        other => panic!("expected a tour, got {:?}", other.map(|path| path.len())),
    }
}

#[test]
fn test_player_path_verdicts_along_exact_tour() {
    let budget = Duration::from_secs(120);
    let Outcome::Found(tour) = solve_knights_tour(Square::new(0, 0), budget) else {
        panic!("expected a tour from the corner");
    };
    assert_eq!("Complete Tour!", validate_player_path(&tour, budget).message);
    for steps in [10, 32, 50, BOARD_CELLS - 1] {
        let verdict = validate_player_path(&tour[..steps], budget);
        assert_eq!(false, verdict.valid);
        assert!(verdict.message.starts_with(&format!("Incomplete Tour: {} of 64", steps)));
        assert!(verdict.message.ends_with("a full tour is still possible from here."), "{}", verdict.message);
    }
    // walk back to the corner once both of its neighbours are used up
    let corner = Square::new(0, 0);
    let last_neighbour = tour
        .iter()
        .rposition(|square| square.is_knight_move(&corner))
        .unwrap();
    assert!(last_neighbour + 1 < BOARD_CELLS);
    let stranded: Vec<Square> = tour[..=last_neighbour].iter().rev().copied().collect();
    let verdict = validate_player_path(&stranded, budget);
    assert_eq!(false, verdict.valid);
    assert!(verdict.message.ends_with("no full tour is possible from here."), "{}", verdict.message);
}

#[test]
fn test_backtracking_times_out_without_budget() {
    assert_eq!(Outcome::TimedOut, solve_knights_tour(Square::new(3, 4), Duration::ZERO));
}

#[test]
fn test_backtracking_rejects_off_board_start() {
    assert_eq!(Outcome::Infeasible, solve_knights_tour(Square::new(8, 0), Duration::from_secs(1)));
}

#[test]
fn test_warnsdorff_tours_are_valid() {
    let mut completed = 0;
    for x in 0..BOARD_SIZE {
        for y in 0..BOARD_SIZE {
            let start = Square::new(x, y);
            if let Some(path) = warnsdorff_tour(start) {
                assert_tour(&path, start);
                completed += 1;
            }
        }
    }
    assert!(completed > 0);
}

#[test]
fn test_feasibility_check_leaves_board_alone() {
    let mut session = TourSession::start(Square::new(0, 0)).unwrap();
    session.make_move(Square::new(2, 1)).unwrap();
    let before = session.board().clone();
    let outcome = is_tour_possible_from(session.board(), session.current(), Duration::ZERO);
    assert_eq!(Outcome::TimedOut, outcome);
    assert_eq!(&before, session.board());
}

#[test]
fn test_feasibility_check_on_last_square() {
    let tour = (0..BOARD_SIZE)
        .flat_map(|x| (0..BOARD_SIZE).map(move |y| Square::new(x, y)))
        .find_map(warnsdorff_tour)
        .unwrap();
    let last = tour[BOARD_CELLS - 1];
    let board = TourBoard::from_path(&tour[..BOARD_CELLS - 1]).unwrap();
    let budget = Duration::from_secs(60);
    assert_eq!(Outcome::Found(()), is_tour_possible_from(&board, tour[BOARD_CELLS - 2], budget));
    // a knight that cannot reach the one open square is stuck
    let stranded = tour[..BOARD_CELLS - 1]
        .iter()
        .copied()
        .find(|square| !square.is_knight_move(&last))
        .unwrap();
    assert_eq!(Outcome::Infeasible, is_tour_possible_from(&board, stranded, budget));
}

#[test]
fn test_deadline_is_sticky() {
    let mut deadline = Deadline::new(Duration::ZERO);
    assert_eq!(true, deadline.expired());
    for _ in 0..10 {
        assert_eq!(true, deadline.expired());
    }
    let mut unbounded = Deadline::unbounded();
    assert_eq!(false, (0..5000).any(|_| unbounded.expired()));
}

// ---------------------------------------------------------------------------
// eight queens

#[test]
fn test_sequential_finds_92_valid_solutions() {
    let solutions = solve_sequential();
    assert_eq!(QUEEN_SOLUTIONS, solutions.len());
    for solution in &solutions {
        let board = QueenBoard::parse_solution(solution).unwrap();
        assert_eq!(true, validate_board(&board).valid, "{}", solution);
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let sequential = solve_sequential();
    for workers in [1, 3, 4, 8, 20] {
        assert_eq!(sequential, solve_parallel(workers), "{} workers", workers);
    }
    assert_eq!(QUEEN_SOLUTIONS, canonical_solutions().len());
}

#[test]
fn test_rounds_report() {
    let report = run_rounds(3, 4);
    assert_eq!(vec![QUEEN_SOLUTIONS; 3], report.sequential_solutions);
    assert_eq!(vec![QUEEN_SOLUTIONS; 3], report.parallel_solutions);
    assert_eq!(3, report.speedup.len());
    assert!(report.mean_sequential > 0.0);
    assert!(report.std_dev_parallel >= 0.0);

    let single = run_rounds(1, 2);
    assert_eq!(0.0, single.std_dev_sequential);
}

// ---------------------------------------------------------------------------
// tic-tac-toe

fn board(rows: &[[i8; 5]], turn: Player) -> GameState {
    let rows: Vec<Vec<i8>> = rows.iter().map(|row| row.to_vec()).collect();
    GameState::from_rows(&rows, turn, 5).unwrap()
}

#[test]
fn test_minimax_takes_the_win() {
    let state = board(
        &[
            [1, 1, 1, 1, 0],
            [-1, -1, -1, -1, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ],
        Player::O,
    );
    let (score, cell) = best_move(&state, 2);
    assert_eq!(Some(Cell::new(0, 4)), cell);
    assert_eq!(1.0, score);
}

#[test]
fn test_minimax_blocks_the_loss() {
    let state = board(
        &[
            [1, 1, 0, 0, 0],
            [-1, -1, -1, -1, 0],
            [1, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ],
        Player::O,
    );
    let (_, cell) = best_move(&state, 2);
    assert_eq!(Some(Cell::new(1, 4)), cell);
}

#[test]
fn test_minimax_on_finished_game() {
    let state = board(&[[-1; 5], [1, 1, 1, 1, 0], [0; 5], [0; 5], [0; 5]], Player::O);
    assert_eq!((-1.0, None), minimax(&state, 3, Player::O));
    assert_eq!((1.0, None), minimax(&state, 3, Player::X));
}

#[test]
fn test_heuristic_stays_inside_unit_interval() {
    let mut rng = Pcg64Mcg::seed_from_u64(3);
    let mut state = GameState::default();
    assert_eq!(0.0, evaluate_heuristic(&state, Player::O));
    for _ in 0..12 {
        let moves = state.possible_moves();
        let pick = moves[rand::Rng::gen_range(&mut rng, 0..moves.len())];
        state = state.apply_move(pick);
        for player in [Player::O, Player::X] {
            let value = evaluate_heuristic(&state, player);
            assert!(value > -1.0 && value < 1.0, "{}", value);
        }
        assert_eq!(evaluate_heuristic(&state, Player::O), -evaluate_heuristic(&state, Player::X));
    }
}

#[test]
fn test_mcts_single_move_shortcut() {
    let state = board(
        &[
            [1, -1, 1, -1, 1],
            [1, -1, 1, -1, 1],
            [-1, 1, -1, 1, -1],
            [-1, 1, -1, 1, -1],
            [1, -1, 1, -1, 0],
        ],
        Player::X,
    );
    assert_eq!(false, state.is_terminal());
    let mut rng = Pcg64Mcg::seed_from_u64(1);
    assert_eq!(Some((1.0, Cell::new(4, 4))), mcts_with_rng(&state, 0, &mut rng));
}

#[test]
fn test_mcts_takes_the_win() {
    let state = board(
        &[
            [1, 1, 1, 1, 0],
            [-1, -1, -1, -1, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ],
        Player::O,
    );
    let mut rng = Pcg64Mcg::seed_from_u64(11);
    let (rate, cell) = mcts_with_rng(&state, 50, &mut rng).unwrap();
    assert_eq!(Cell::new(0, 4), cell);
    assert_eq!(1.0, rate);
}

#[test]
fn test_random_playouts_finish() {
    let mut rng = Pcg64Mcg::seed_from_u64(5);
    for _ in 0..20 {
        assert!(simulate_random_game(&GameState::default(), &mut rng).is_some());
    }
}

#[test]
fn test_match_rejects_bad_moves() {
    let config = Config {
        seed: Some(9),
        mcts_simulations: 5,
        ..Config::default()
    };
    let mut game = Match::new(GameState::default(), config);
    game.apply_player_move(Cell::new(2, 2)).unwrap();
    assert!(game.apply_player_move(Cell::new(2, 2)).is_err());
    assert!(game.apply_player_move(Cell::new(5, 0)).is_err());
    let cell = game.ai_move(Algorithm::Mcts).unwrap();
    assert_ne!(Cell::new(2, 2), cell);
    assert_eq!(23, game.state().possible_moves().len());
}

#[test]
fn test_match_stops_after_game_over() {
    let state = board(&[[1; 5], [-1, -1, -1, -1, 0], [0; 5], [0; 5], [0; 5]], Player::X);
    let mut game = Match::new(state, Config::default());
    assert!(game.ai_move(Algorithm::Minimax).is_err());
    assert!(game.apply_player_move(Cell::new(4, 4)).is_err());
}

// ---------------------------------------------------------------------------
// traveling salesman

fn stops(n: usize) -> Vec<usize> {
    (1..n).collect()
}

#[test]
fn test_exact_solvers_agree_and_beat_greedy() {
    let mut rng = Pcg64Mcg::seed_from_u64(2024);
    for n in 2..=8 {
        let matrix = random_distance_matrix(n, RANDOM_DISTANCE_KM, &mut rng);
        let stops = stops(n);
        let greedy = tsp_nearest_neighbor(&matrix, 0, &stops).unwrap();
        let exact = tsp_held_karp(&matrix, 0, &stops).unwrap();
        for bound in [Bound::NearestEdge, Bound::Spanning] {
            let branch = tsp_branch_and_bound(&matrix, 0, &stops, bound).unwrap();
            assert!(branch.visits_exactly(0, &stops));
            assert!((branch.distance - exact.distance).abs() < 1e-6, "n = {}, {:?}", n, bound);
            assert!((matrix.path_length(&branch.nodes) - branch.distance).abs() < 1e-6);
        }
        assert!(exact.distance <= greedy.distance + 1e-6, "n = {}", n);
        assert!(greedy.visits_exactly(0, &stops));
        assert!(exact.visits_exactly(0, &stops));
        assert!((matrix.path_length(&exact.nodes) - exact.distance).abs() < 1e-6);
    }
}

#[test]
fn test_asymmetric_matrix_is_respected() {
    // going round 0 -> 1 -> 2 -> 0 is cheap, the other way is not
    let matrix = DistanceMatrix::new(vec![
        vec![None, Some(1.0), Some(10.0)],
        vec![Some(10.0), None, Some(1.0)],
        vec![Some(1.0), Some(10.0), None],
    ])
    .unwrap();
    let exact = tsp_held_karp(&matrix, 0, &[2, 1]).unwrap();
    assert_eq!(vec![0, 1, 2, 0], exact.nodes);
    assert_eq!(3.0, exact.distance);
    let branch = tsp_branch_and_bound(&matrix, 0, &[2, 1], Bound::Spanning).unwrap();
    assert_eq!(3.0, branch.distance);
}

#[test]
fn test_no_stops_is_a_zero_length_tour() {
    let mut rng = Pcg64Mcg::seed_from_u64(1);
    let matrix = random_distance_matrix(3, RANDOM_DISTANCE_KM, &mut rng);
    for route in [
        tsp_nearest_neighbor(&matrix, 1, &[]).unwrap(),
        tsp_branch_and_bound(&matrix, 1, &[], Bound::NearestEdge).unwrap(),
        tsp_held_karp(&matrix, 1, &[]).unwrap(),
    ] {
        assert_eq!(vec![1, 1], route.nodes);
        assert_eq!(0.0, route.distance);
    }
}

#[test]
fn test_bad_stops_are_rejected() {
    let mut rng = Pcg64Mcg::seed_from_u64(1);
    let matrix = random_distance_matrix(4, RANDOM_DISTANCE_KM, &mut rng);
    assert!(tsp_held_karp(&matrix, 0, &[1, 1]).is_err());
    assert!(tsp_nearest_neighbor(&matrix, 0, &[0, 2]).is_err());
    assert!(tsp_branch_and_bound(&matrix, 4, &[1], Bound::Spanning).is_err());
    assert!(tsp_held_karp(&matrix, 0, &[7]).is_err());
}

#[test]
fn test_human_route_comparison() {
    let mut rng = Pcg64Mcg::seed_from_u64(77);
    let matrix = random_distance_matrix(5, RANDOM_DISTANCE_KM, &mut rng);
    let exact = tsp_held_karp(&matrix, 0, &stops(5)).unwrap();
    let matched = compare_human_route(&matrix, &exact.nodes[..5], exact.distance).unwrap();
    assert_eq!(true, matched.matched);
    assert!(matched.message.starts_with("Congratulations!"));

    let worse = compare_human_route(&matrix, &exact.nodes, exact.distance - 1.0).unwrap();
    assert_eq!(false, worse.matched);
    assert_eq!("Nice try! The algorithm found a shorter route.", worse.message);
    assert!(compare_human_route(&matrix, &[], 0.0).is_err());
}

// ---------------------------------------------------------------------------
// tower of hanoi

#[test]
fn test_single_disk_moves_straight_across() {
    assert_eq!(vec![Move::new(1, Peg::A, Peg::C)], solve_toh_recursive(1, Peg::A, Peg::B, Peg::C));
}

#[test]
fn test_three_peg_move_count_law() {
    for n in 1..=11u8 {
        let expected = (1usize << n) - 1;
        let recursive = solve_toh_recursive(n, Peg::A, Peg::B, Peg::C);
        let iterative = solve_toh_iterative(n, Peg::A, Peg::B, Peg::C).unwrap();
        assert_eq!(expected, recursive.len());
        assert_eq!(expected, iterative.len());
        assert_eq!(true, validate_move_sequence(n, &recursive, Mode::ThreePeg).valid);
        assert_eq!(true, validate_move_sequence(n, &iterative, Mode::ThreePeg).valid, "{} disks", n);
    }
}

#[test]
fn test_frame_stewart_two_disks() {
    assert_eq!(
        vec![
            Move::new(1, Peg::A, Peg::B),
            Move::new(2, Peg::A, Peg::D),
            Move::new(1, Peg::B, Peg::D),
        ],
        frame_stewart_algorithm(2, Peg::A, Peg::B, Peg::C, Peg::D)
    );
}

#[test]
fn test_frame_stewart_counts() {
    let expected = [0, 1, 3, 5, 9, 13, 17, 25, 33, 41, 49, 65];
    for (n, &count) in expected.iter().enumerate() {
        let n = n as u8;
        assert_eq!(count, frame_stewart_move_count(n), "{} disks", n);
        let moves = frame_stewart_algorithm(n, Peg::A, Peg::B, Peg::C, Peg::D);
        assert_eq!(count as usize, moves.len());
        if n > 0 {
            assert_eq!(true, validate_move_sequence(n, &moves, Mode::FourPeg).valid, "{} disks", n);
        }
    }
}

#[test]
fn test_four_pegs_beat_three_but_are_not_proven() {
    for n in 3..=10u8 {
        assert!(minimum_moves(n, Mode::FourPeg) < minimum_moves(n, Mode::ThreePeg));
    }
    assert_eq!(true, plan(6, Mode::ThreePeg).proven_optimal);
    let four = plan(6, Mode::FourPeg);
    assert_eq!(false, four.proven_optimal);
    assert_eq!(17, four.moves.len());
}

#[test]
fn test_new_game_reports_mode_minimum() {
    let game = new_game(5, Mode::FourPeg).unwrap();
    assert_eq!(13, game.min_moves);
    assert_eq!(31, game.recursive.moves.len());
    assert_eq!(31, game.iterative.moves.len());
    assert_eq!(13, game.frame_stewart.moves.len());
    assert_eq!(31, new_game(5, Mode::ThreePeg).unwrap().min_moves);
    assert!(new_game(0, Mode::ThreePeg).is_err());
    assert!(new_game(12, Mode::FourPeg).is_err());
}

#[test]
fn test_new_game_disk_range() {
    for disks in [1, 4, 11] {
        match new_game(disks, Mode::ThreePeg) {
            Err(SolverError::InvalidInput(message)) => assert!(message.contains("between 5 and 10")),
            other => panic!("{} disks should be rejected, got {:?}", disks, other.map(|g| g.min_moves)),
        }
    }
    assert_eq!(true, new_game(10, Mode::FourPeg).is_ok());
    // validation still accepts the wider range
    assert_eq!(true, score_solution(1, &solve_toh_recursive(1, Peg::A, Peg::B, Peg::C), Mode::ThreePeg).valid);
}

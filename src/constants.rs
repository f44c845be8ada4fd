use std::ops::RangeInclusive;
use std::time::Duration;

// Knight's Tour and Eight Queens share the standard chess board.
pub const BOARD_SIZE: usize = 8;
pub const BOARD_CELLS: usize = BOARD_SIZE * BOARD_SIZE;
pub const QUEENS: usize = BOARD_SIZE;
pub const QUEEN_SOLUTIONS: usize = 92;

// (dx, dy) in the order the exact solver tries them.
pub const KNIGHT_MOVES: [(isize, isize); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(60);
// the deadline is polled once every this many recursive calls
pub const DEADLINE_POLL_MASK: u64 = (1 << 10) - 1;

pub const TIC_TAC_TOE_SIZE: usize = 5;
pub const TIC_TAC_TOE_WIN_LENGTH: usize = 5;
pub const DEFAULT_MINIMAX_DEPTH: usize = 4;
pub const DEFAULT_MCTS_SIMULATIONS: usize = 1000;

pub const DEFAULT_QUEEN_WORKERS: usize = 4;

pub const MAX_CITIES: usize = 10;
pub const CITY_LABELS: &str = "ABCDEFGHIJ";
pub const RANDOM_DISTANCE_KM: RangeInclusive<f64> = 50.0..=100.0;

pub const ACCEPTED_DISKS: RangeInclusive<u8> = 1..=11;
pub const NEW_GAME_DISKS: RangeInclusive<u8> = 5..=10;
pub const MAX_SCORE: u32 = 1000;

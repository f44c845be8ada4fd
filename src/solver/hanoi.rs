use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::timed;
use crate::constants::*;
use crate::game::towers::{Mode, Move, Peg, Towers};
use crate::web::errors::{Result, SolverError};

/// Classic three peg solution moving `disks` from `source` to `destination`.
pub fn solve_toh_recursive(disks: u8, source: Peg, auxiliary: Peg, destination: Peg) -> Vec<Move> {
    let mut moves = Vec::new();
    three_peg(0, disks, source, auxiliary, destination, &mut moves);
    moves
}

// moves disks `base + 1..=base + count`, which must sit on top of `from`
fn three_peg(base: u8, count: u8, from: Peg, via: Peg, to: Peg, moves: &mut Vec<Move>) {
    if count == 0 {
        return;
    }
    three_peg(base, count - 1, from, to, via, moves);
    moves.push(Move::new(base + count, from, to));
    three_peg(base, count - 1, via, from, to, moves);
}

/// Loop-based three peg solution. Odd steps cycle the smallest disk through
/// the pegs (towards `destination` first when the disk count is odd, towards
/// `auxiliary` first when it is even); even steps make the one legal move
/// that leaves the smallest disk alone. Every move is replayed on a
/// `Towers` so an illegal step surfaces as an error.
pub fn solve_toh_iterative(disks: u8, source: Peg, auxiliary: Peg, destination: Peg) -> Result<Vec<Move>> {
    let cycle = if disks % 2 == 1 {
        [source, destination, auxiliary]
    } else {
        [source, auxiliary, destination]
    };
    let mut towers = Towers::new(disks, &cycle, source);
    let total = three_peg_count(disks);
    let mut moves = Vec::with_capacity(total as usize);
    let mut smallest = 0;
    for step in 0..total {
        let m = if step % 2 == 0 {
            let next = (smallest + 1) % 3;
            let m = Move::new(1, cycle[smallest], cycle[next]);
            smallest = next;
            m
        } else {
            let a = cycle[(smallest + 1) % 3];
            let b = cycle[(smallest + 2) % 3];
            match (towers.top(a), towers.top(b)) {
                (Some(x), Some(y)) if x < y => Move::new(x, a, b),
                (Some(x), None) => Move::new(x, a, b),
                (_, Some(y)) => Move::new(y, b, a),
                (None, None) => {
                    return Err(SolverError::internal(format!(
                        "iterative hanoi stalled at step {}",
                        step + 1
                    )))
                }
            }
        };
        towers
            .apply(&m)
            .map_err(|illegal| SolverError::internal(format!("iterative hanoi played {}: {}", m, illegal)))?;
        moves.push(m);
    }
    Ok(moves)
}

fn three_peg_count(disks: u8) -> u64 {
    if disks >= 64 {
        u64::MAX
    } else {
        (1u64 << disks) - 1
    }
}

/// `(moves, k)` for every disk count up to `disks`: the four peg move count
/// and the number of small disks parked on a spare peg at that count.
///
/// `k` minimizes `2 * moves(k) + 2^(n - k) - 1`; ties go to the larger `k`.
fn split_table(disks: u8) -> Vec<(u64, u8)> {
    let mut table: Vec<(u64, u8)> = vec![(0, 0), (1, 0)];
    for n in 2..=disks {
        let mut best = (u64::MAX, 1);
        for k in 1..n {
            let cost = table[k as usize]
                .0
                .saturating_mul(2)
                .saturating_add(three_peg_count(n - k));
            if cost <= best.0 {
                best = (cost, k);
            }
        }
        table.push(best);
    }
    table.truncate(disks as usize + 1);
    table
}

/// Moves the Frame-Stewart algorithm needs for `disks` disks on four pegs.
pub fn frame_stewart_move_count(disks: u8) -> u64 {
    split_table(disks)[disks as usize].0
}

/// Four peg solution: park the `k` smallest disks on `auxiliary1` using all
/// four pegs, move the rest with the three peg method while `auxiliary1` is
/// blocked, then bring the parked disks over on top.
pub fn frame_stewart_algorithm(
    disks: u8,
    source: Peg,
    auxiliary1: Peg,
    auxiliary2: Peg,
    destination: Peg,
) -> Vec<Move> {
    let table = split_table(disks);
    let mut moves = Vec::with_capacity(table[disks as usize].0 as usize);
    four_peg(&table, disks, [source, auxiliary1, auxiliary2, destination], &mut moves);
    debug!("frame-stewart for {} disks made {} moves", disks, moves.len());
    moves
}

fn four_peg(table: &[(u64, u8)], disks: u8, [from, spare, via, to]: [Peg; 4], moves: &mut Vec<Move>) {
    match disks {
        0 => {}
        1 => moves.push(Move::new(1, from, to)),
        _ => {
            let k = table[disks as usize].1;
            four_peg(table, k, [from, via, to, spare], moves);
            three_peg(k, disks - k, from, via, to, moves);
            four_peg(table, k, [spare, from, via, to], moves);
        }
    }
}

/// Shortest known solution length for `mode`.
pub fn minimum_moves(disks: u8, mode: Mode) -> u64 {
    match mode {
        Mode::ThreePeg => three_peg_count(disks),
        Mode::FourPeg => frame_stewart_move_count(disks),
    }
}

/// A solver's answer together with whether its length is known to be
/// the least possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub moves: Vec<Move>,
    pub proven_optimal: bool,
}

/// Solves `mode` with its reference algorithm. The three peg answer is
/// optimal; the four peg answer is the Frame-Stewart construction, which is
/// not treated as proven.
pub fn plan(disks: u8, mode: Mode) -> Plan {
    match mode {
        Mode::ThreePeg => Plan {
            moves: solve_toh_recursive(disks, Peg::A, Peg::B, Peg::C),
            proven_optimal: true,
        },
        Mode::FourPeg => Plan {
            moves: frame_stewart_algorithm(disks, Peg::A, Peg::B, Peg::C, Peg::D),
            proven_optimal: false,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedMoves {
    pub moves: Vec<Move>,
    pub time: f64,
}

/// Everything a fresh game shows: the three algorithm runs with timings and
/// the target move count for the chosen mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGame {
    pub disk_count: u8,
    pub mode: Mode,
    pub min_moves: u64,
    pub recursive: TimedMoves,
    pub iterative: TimedMoves,
    pub frame_stewart: TimedMoves,
}

pub fn random_disk_count(rng: &mut impl Rng) -> u8 {
    rng.gen_range(NEW_GAME_DISKS)
}

pub fn new_game(disks: u8, mode: Mode) -> Result<NewGame> {
    if !NEW_GAME_DISKS.contains(&disks) {
        return Err(SolverError::invalid(format!(
            "a new game needs between {} and {} disks, got {}",
            NEW_GAME_DISKS.start(),
            NEW_GAME_DISKS.end(),
            disks
        )));
    }
    let recursive = timed(|| solve_toh_recursive(disks, Peg::A, Peg::B, Peg::C));
    let iterative = timed(|| solve_toh_iterative(disks, Peg::A, Peg::B, Peg::C));
    let frame_stewart = timed(|| frame_stewart_algorithm(disks, Peg::A, Peg::B, Peg::C, Peg::D));
    info!(
        "hanoi with {} disks: recursive {:?}, iterative {:?}, frame-stewart {:?}",
        disks, recursive.elapsed, iterative.elapsed, frame_stewart.elapsed
    );
    let iterative_time = iterative.seconds();
    Ok(NewGame {
        disk_count: disks,
        mode,
        min_moves: minimum_moves(disks, mode),
        recursive: TimedMoves {
            time: recursive.seconds(),
            moves: recursive.value,
        },
        iterative: TimedMoves {
            moves: iterative.value?,
            time: iterative_time,
        },
        frame_stewart: TimedMoves {
            time: frame_stewart.seconds(),
            moves: frame_stewart.value,
        },
    })
}

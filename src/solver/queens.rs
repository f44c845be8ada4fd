use std::collections::BTreeSet;
use std::thread;

use crossbeam_channel::unbounded;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use super::timed;
use crate::constants::*;
use crate::game::queens::QueenBoard;

/// Every solution of the eight queens puzzle as row-major `0`/`1` strings,
/// sorted and free of duplicates.
pub fn solve_sequential() -> Vec<String> {
    let mut board = QueenBoard::default();
    let mut found = BTreeSet::new();
    place(&mut board, 0, &mut found);
    found.into_iter().collect()
}

/// Same enumeration, with the first column's row choices handed out to
/// `workers` threads. Each worker reports its partition's solutions over a
/// channel and a single aggregator merges and deduplicates them.
pub fn solve_parallel(workers: usize) -> Vec<String> {
    let workers = workers.clamp(1, BOARD_SIZE);
    let (job_sender, jobs) = unbounded::<usize>();
    let (result_sender, results) = unbounded::<(usize, Vec<String>)>();
    for row in 0..BOARD_SIZE {
        // the receiver lives until the end of this function
        let _ = job_sender.send(row);
    }
    drop(job_sender);

    thread::scope(|scope| {
        for _ in 0..workers {
            let jobs = jobs.clone();
            let result_sender = result_sender.clone();
            scope.spawn(move || {
                for row in jobs.iter() {
                    let _ = result_sender.send((row, solve_from_row(row)));
                }
            });
        }
    });
    drop(result_sender);

    let mut merged = BTreeSet::new();
    for (row, partition) in results.iter() {
        debug!("queens partition row {} found {} solutions", row, partition.len());
        let before = merged.len();
        let size = partition.len();
        merged.extend(partition);
        if merged.len() - before != size {
            debug!("queens partition row {} overlapped earlier partitions", row);
        }
    }
    merged.into_iter().collect()
}

/// Solutions with the first column's queen fixed in `row`.
fn solve_from_row(row: usize) -> Vec<String> {
    let mut board = QueenBoard::default();
    let mut found = BTreeSet::new();
    board.place(row, 0);
    place(&mut board, 1, &mut found);
    found.into_iter().collect()
}

fn place(board: &mut QueenBoard, col: usize, found: &mut BTreeSet<String>) {
    if col >= BOARD_SIZE {
        found.insert(board.to_solution_string());
        return;
    }
    coz::progress!("queens place");
    for row in 0..BOARD_SIZE {
        if board.is_safe(row, col) {
            board.place(row, col);
            place(board, col + 1, found);
            board.remove(row, col);
        }
    }
}

/// Timings of repeated sequential and parallel enumerations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundsReport {
    pub sequential_times: Vec<f64>,
    pub parallel_times: Vec<f64>,
    pub sequential_solutions: Vec<usize>,
    pub parallel_solutions: Vec<usize>,
    /// Sequential time over parallel time, per round; zero when parallel took no time.
    pub speedup: Vec<f64>,
    pub mean_sequential: f64,
    pub mean_parallel: f64,
    pub std_dev_sequential: f64,
    pub std_dev_parallel: f64,
}

pub fn run_rounds(rounds: usize, workers: usize) -> RoundsReport {
    let mut sequential_times = Vec::with_capacity(rounds);
    let mut parallel_times = Vec::with_capacity(rounds);
    let mut sequential_solutions = Vec::with_capacity(rounds);
    let mut parallel_solutions = Vec::with_capacity(rounds);
    for round in 0..rounds {
        let sequential = timed(solve_sequential);
        let parallel = timed(|| solve_parallel(workers));
        debug!(
            "queens round {}: sequential {} in {:?}, parallel {} in {:?}",
            round + 1,
            sequential.value.len(),
            sequential.elapsed,
            parallel.value.len(),
            parallel.elapsed
        );
        sequential_times.push(sequential.seconds());
        parallel_times.push(parallel.seconds());
        sequential_solutions.push(sequential.value.len());
        parallel_solutions.push(parallel.value.len());
    }
    let speedup = sequential_times
        .iter()
        .zip(&parallel_times)
        .map(|(&seq, &par)| if par > 0.0 { seq / par } else { 0.0 })
        .collect();
    let spread = |times: &[f64]| {
        if times.len() > 1 {
            times.std_dev()
        } else {
            0.0
        }
    };
    let report = RoundsReport {
        mean_sequential: if rounds > 0 { sequential_times.iter().mean() } else { 0.0 },
        mean_parallel: if rounds > 0 { parallel_times.iter().mean() } else { 0.0 },
        std_dev_sequential: spread(&sequential_times),
        std_dev_parallel: spread(&parallel_times),
        sequential_times,
        parallel_times,
        sequential_solutions,
        parallel_solutions,
        speedup,
    };
    info!(
        "queens: {} rounds, mean sequential {:.6}s, mean parallel {:.6}s",
        rounds, report.mean_sequential, report.mean_parallel
    );
    report
}

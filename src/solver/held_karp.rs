use std::collections::HashMap;

use log::debug;

use super::salesman::check_stops;
use crate::game::distances::{DistanceMatrix, Route};
use crate::web::errors::{Result, SolverError};

/// Cheapest cost of leaving home, visiting exactly the stops in the mask and
/// stopping at `last`, with the stop visited just before it.
type Table = HashMap<(u32, usize), (f64, Option<usize>)>;

/// Exact tour by dynamic programming over subsets of `stops`.
///
/// Subsets are filled in order of increasing size, so every entry a subset
/// reads was completed while handling the smaller subsets before it.
pub fn tsp_held_karp(matrix: &DistanceMatrix, home: usize, stops: &[usize]) -> Result<Route> {
    check_stops(matrix, home, stops)?;
    let m = stops.len();
    if m == 0 {
        return Ok(Route {
            nodes: vec![home, home],
            distance: 0.0,
        });
    }
    let full: u32 = (1 << m) - 1;
    let mut table = Table::new();
    for (k, &stop) in stops.iter().enumerate() {
        table.insert((1 << k, k), (matrix.get(home, stop), None));
    }
    for size in 2..=m as u32 {
        for mask in (1..=full).filter(|mask| mask.count_ones() == size) {
            for last in (0..m).filter(|&k| mask & (1 << k) != 0) {
                let prev = mask ^ (1 << last);
                let mut best: Option<(f64, usize)> = None;
                for before in (0..m).filter(|&k| prev & (1 << k) != 0) {
                    let &(cost, _) = lookup(&table, prev, before)?;
                    let cost = cost + matrix.get(stops[before], stops[last]);
                    if best.map_or(true, |(b, _)| cost < b) {
                        best = Some((cost, before));
                    }
                }
                if let Some((cost, before)) = best {
                    table.insert((mask, last), (cost, Some(before)));
                }
            }
        }
    }
    let mut finish: Option<(f64, usize)> = None;
    for last in 0..m {
        let &(cost, _) = lookup(&table, full, last)?;
        let cost = cost + matrix.get(stops[last], home);
        if finish.map_or(true, |(b, _)| cost < b) {
            finish = Some((cost, last));
        }
    }
    let (distance, mut last) =
        finish.ok_or_else(|| SolverError::internal("held-karp found no closing city"))?;
    debug!("held-karp table holds {} entries", table.len());

    let mut order = Vec::with_capacity(m);
    let mut mask = full;
    loop {
        order.push(stops[last]);
        let &(_, before) = lookup(&table, mask, last)?;
        mask ^= 1 << last;
        match before {
            Some(before) => last = before,
            None => break,
        }
    }
    if mask != 0 {
        return Err(SolverError::internal("held-karp back-pointers skip a city"));
    }
    let mut nodes = vec![home];
    nodes.extend(order.into_iter().rev());
    nodes.push(home);
    Ok(Route { nodes, distance })
}

fn lookup(table: &Table, mask: u32, last: usize) -> Result<&(f64, Option<usize>)> {
    table.get(&(mask, last)).ok_or_else(|| {
        SolverError::internal(format!(
            "held-karp entry for subset {:#b} ending at {} was never computed",
            mask, last
        ))
    })
}

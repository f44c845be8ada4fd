use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::game::distances::{DistanceMatrix, Route};
use crate::web::errors::{Result, SolverError};

/// Lower bound on the cost of finishing a partial tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    /// Cheapest way out of the current city plus the cheapest way out of
    /// every unvisited city.
    NearestEdge,
    /// Cheapest way out of the current city, a minimum spanning tree over the
    /// unvisited cities and the cheapest way back home.
    Spanning,
}

/// Rejects home or stops outside the matrix, repeated stops and stops equal
/// to home.
pub(crate) fn check_stops(matrix: &DistanceMatrix, home: usize, stops: &[usize]) -> Result<()> {
    let n = matrix.size();
    if home >= n {
        return Err(SolverError::invalid(format!("home city {} is not in the matrix", home)));
    }
    if stops.len() >= MAX_CITIES {
        return Err(SolverError::invalid(format!(
            "at most {} cities including home are supported",
            MAX_CITIES
        )));
    }
    let mut seen = vec![false; n];
    seen[home] = true;
    for &stop in stops {
        if stop >= n {
            return Err(SolverError::invalid(format!("city {} is not in the matrix", stop)));
        }
        if seen[stop] {
            return Err(SolverError::invalid(format!("city {} is listed twice", stop)));
        }
        seen[stop] = true;
    }
    Ok(())
}

fn close(matrix: &DistanceMatrix, mut nodes: Vec<usize>, home: usize) -> Route {
    nodes.push(home);
    let distance = matrix.path_length(&nodes);
    Route { nodes, distance }
}

/// Greedy tour: always drive to the closest city not yet visited, first in
/// `stops` order on ties, then return home.
pub fn tsp_nearest_neighbor(matrix: &DistanceMatrix, home: usize, stops: &[usize]) -> Result<Route> {
    check_stops(matrix, home, stops)?;
    let mut remaining = stops.to_vec();
    let mut nodes = vec![home];
    let mut current = home;
    while !remaining.is_empty() {
        let mut nearest = 0;
        for i in 1..remaining.len() {
            if matrix.get(current, remaining[i]) < matrix.get(current, remaining[nearest]) {
                nearest = i;
            }
        }
        current = remaining.remove(nearest);
        nodes.push(current);
    }
    Ok(close(matrix, nodes, home))
}

struct Search<'a> {
    matrix: &'a DistanceMatrix,
    home: usize,
    stops: &'a [usize],
    bound: Bound,
    visited: Vec<bool>,
    path: Vec<usize>,
    best: Route,
    nodes: u64,
    pruned: u64,
}

impl Search<'_> {
    fn unvisited(&self) -> impl Iterator<Item = usize> + '_ {
        self.stops
            .iter()
            .enumerate()
            .filter(|&(i, _)| !self.visited[i])
            .map(|(_, &stop)| stop)
    }

    fn lower_bound(&self, cost: f64, last: usize) -> f64 {
        let open: Vec<usize> = self.unvisited().collect();
        if open.is_empty() {
            return cost + self.matrix.get(last, self.home);
        }
        let leave = open
            .iter()
            .map(|&u| self.matrix.get(last, u))
            .fold(f64::INFINITY, f64::min);
        match self.bound {
            Bound::NearestEdge => {
                let onward: f64 = open
                    .iter()
                    .map(|&u| {
                        open.iter()
                            .chain(std::iter::once(&self.home))
                            .filter(|&&v| v != u)
                            .map(|&v| self.matrix.get(u, v))
                            .fold(f64::INFINITY, f64::min)
                    })
                    .sum();
                cost + leave + onward
            }
            Bound::Spanning => {
                let back = open
                    .iter()
                    .map(|&u| self.matrix.get(u, self.home))
                    .fold(f64::INFINITY, f64::min);
                cost + leave + spanning_tree_weight(self.matrix, &open) + back
            }
        }
    }

    fn explore(&mut self, cost: f64, last: usize) {
        self.nodes += 1;
        coz::progress!("tsp branch");
        if self.path.len() == self.stops.len() + 1 {
            let total = cost + self.matrix.get(last, self.home);
            if total < self.best.distance {
                let mut nodes = self.path.clone();
                nodes.push(self.home);
                self.best = Route {
                    nodes,
                    distance: total,
                };
            }
            return;
        }
        if self.lower_bound(cost, last) >= self.best.distance {
            self.pruned += 1;
            return;
        }
        for i in 0..self.stops.len() {
            if self.visited[i] {
                continue;
            }
            let next = self.stops[i];
            self.visited[i] = true;
            self.path.push(next);
            self.explore(cost + self.matrix.get(last, next), next);
            self.path.pop();
            self.visited[i] = false;
        }
    }
}

/// Prim's algorithm over `nodes`, weighing each pair by its cheaper direction.
fn spanning_tree_weight(matrix: &DistanceMatrix, nodes: &[usize]) -> f64 {
    let weight = |a: usize, b: usize| matrix.get(a, b).min(matrix.get(b, a));
    let mut in_tree = vec![false; nodes.len()];
    let mut reach = vec![f64::INFINITY; nodes.len()];
    let mut total = 0.0;
    reach[0] = 0.0;
    for _ in 0..nodes.len() {
        let mut pick = None;
        for i in 0..nodes.len() {
            if !in_tree[i] && pick.map_or(true, |p: usize| reach[i] < reach[p]) {
                pick = Some(i);
            }
        }
        let Some(p) = pick else { break };
        in_tree[p] = true;
        total += reach[p];
        for i in 0..nodes.len() {
            if !in_tree[i] {
                reach[i] = reach[i].min(weight(nodes[p], nodes[i]));
            }
        }
    }
    total
}

/// Exact tour by depth-first search over orderings of `stops`, starting from
/// the nearest-neighbour tour as incumbent and cutting every branch whose
/// lower bound cannot beat it.
pub fn tsp_branch_and_bound(
    matrix: &DistanceMatrix,
    home: usize,
    stops: &[usize],
    bound: Bound,
) -> Result<Route> {
    let incumbent = tsp_nearest_neighbor(matrix, home, stops)?;
    let mut search = Search {
        matrix,
        home,
        stops,
        bound,
        visited: vec![false; stops.len()],
        path: vec![home],
        best: incumbent,
        nodes: 0,
        pruned: 0,
    };
    search.explore(0.0, home);
    debug!(
        "branch and bound ({:?}) over {} stops: {} nodes, {} pruned",
        bound,
        stops.len(),
        search.nodes,
        search.pruned
    );
    info!("branch and bound tour of {:.2}", search.best.distance);
    Ok(search.best)
}

/// How a hand-drawn tour measures up against the solvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanComparison {
    pub distance: f64,
    pub best_distance: f64,
    pub matched: bool,
    pub message: String,
}

/// Scores the closed loop through `route` (the return leg to its first city
/// is added when missing) against `best_distance`.
pub fn compare_human_route(
    matrix: &DistanceMatrix,
    route: &[usize],
    best_distance: f64,
) -> Result<HumanComparison> {
    let (&first, _) = route
        .split_first()
        .ok_or_else(|| SolverError::invalid("route is empty"))?;
    if let Some(&bad) = route.iter().find(|&&node| node >= matrix.size()) {
        return Err(SolverError::invalid(format!("city {} is not in the matrix", bad)));
    }
    let mut distance = matrix.path_length(route);
    if route.last() != Some(&first) {
        distance += matrix.get(route[route.len() - 1], first);
    }
    let matched = distance <= best_distance + 1e-9;
    let message = if matched {
        "Congratulations! You matched the best algorithm's route!"
    } else {
        "Nice try! The algorithm found a shorter route."
    };
    Ok(HumanComparison {
        distance,
        best_distance,
        matched,
        message: message.to_string(),
    })
}

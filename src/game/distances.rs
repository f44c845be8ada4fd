use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::web::errors::{Result, SolverError};

/// Node-to-node distances, looked up by index pair. The matrix may be
/// asymmetric; a missing self distance counts as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    size: usize,
    entries: Vec<Option<f64>>,
}

impl DistanceMatrix {
    /// Every off-diagonal entry must be present, finite and non-negative.
    pub fn new(rows: Vec<Vec<Option<f64>>>) -> Result<DistanceMatrix> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return Err(SolverError::invalid("distance matrix must be square"));
        }
        let mut entries = Vec::with_capacity(size * size);
        for (from, row) in rows.into_iter().enumerate() {
            for (to, entry) in row.into_iter().enumerate() {
                match entry {
                    Some(d) if !d.is_finite() || d < 0.0 => {
                        return Err(SolverError::invalid(format!(
                            "distance {} -> {} must be finite and non-negative, got {}",
                            from, to, d
                        )))
                    }
                    None if from != to => {
                        return Err(SolverError::invalid(format!(
                            "distance {} -> {} is missing",
                            from, to
                        )))
                    }
                    _ => {}
                }
                entries.push(entry);
            }
        }
        Ok(DistanceMatrix { size, entries })
    }

    /// Parses the keyed form `{"0": {"0": null, "1": 20.0}, ...}`. Keys must be
    /// node indices `0..n`.
    pub fn from_keyed(keyed: &BTreeMap<String, BTreeMap<String, Option<f64>>>) -> Result<DistanceMatrix> {
        let size = keyed.len();
        let mut rows = vec![vec![None; size]; size];
        for (from, row) in keyed {
            let from = parse_node(from, size)?;
            for (to, &entry) in row {
                let to = parse_node(to, size)?;
                rows[from][to] = entry;
            }
        }
        DistanceMatrix::new(rows)
    }

    pub fn from_json(json: &str) -> Result<DistanceMatrix> {
        let keyed: BTreeMap<String, BTreeMap<String, Option<f64>>> = serde_json::from_str(json)?;
        DistanceMatrix::from_keyed(&keyed)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        match self.entries[from * self.size + to] {
            Some(d) => d,
            None => {
                if from != to {
                    warn!("distance {} -> {} is missing, using 0", from, to);
                }
                0.0
            }
        }
    }

    /// Length of `nodes` walked in order, without closing the loop.
    pub fn path_length(&self, nodes: &[usize]) -> f64 {
        nodes.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }

    pub fn to_keyed(&self) -> BTreeMap<String, BTreeMap<String, Option<f64>>> {
        (0..self.size)
            .map(|from| {
                let row = (0..self.size)
                    .map(|to| (to.to_string(), self.entries[from * self.size + to]))
                    .collect();
                (from.to_string(), row)
            })
            .collect()
    }
}

fn parse_node(key: &str, size: usize) -> Result<usize> {
    match key.parse::<usize>() {
        Ok(node) if node < size => Ok(node),
        _ => Err(SolverError::invalid(format!("unknown city id {:?}", key))),
    }
}

/// Symmetric random matrix with distances drawn from `range`, rounded to two
/// decimals, and no self distances.
pub fn random_distance_matrix(
    size: usize,
    range: RangeInclusive<f64>,
    rng: &mut impl Rng,
) -> DistanceMatrix {
    let mut rows = vec![vec![None; size]; size];
    for from in 0..size {
        for to in (from + 1)..size {
            let d = rng.gen_range(range.clone());
            let d = (d * 100.0).round() / 100.0;
            rows[from][to] = Some(d);
            rows[to][from] = Some(d);
        }
    }
    DistanceMatrix {
        size,
        entries: rows.into_iter().flatten().collect(),
    }
}

/// A closed tour: starts and ends on the home node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub nodes: Vec<usize>,
    pub distance: f64,
}

impl Route {
    pub fn labels(&self) -> Vec<char> {
        self.nodes.iter().filter_map(|&node| city_label(node)).collect()
    }

    /// Checks that the route starts and ends at `home` and visits each of
    /// `stops` exactly once in between.
    pub fn visits_exactly(&self, home: usize, stops: &[usize]) -> bool {
        let n = self.nodes.len();
        if n < 2 || self.nodes[0] != home || self.nodes[n - 1] != home {
            return false;
        }
        let mut inner = self.nodes[1..n - 1].to_vec();
        let mut expected = stops.to_vec();
        inner.sort_unstable();
        expected.sort_unstable();
        inner == expected
    }
}

pub fn city_label(node: usize) -> Option<char> {
    CITY_LABELS.chars().nth(node)
}

/// `A` → 0 through `J` → 9, case-insensitive.
pub fn city_index(label: &str) -> Result<usize> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_alphabetic() => CITY_LABELS
            .find(ch.to_ascii_uppercase())
            .ok_or_else(|| SolverError::invalid(format!("city {:?} is outside A-J", label))),
        _ => Err(SolverError::invalid(format!(
            "city labels are single letters A-J, got {:?}",
            label
        ))),
    }
}

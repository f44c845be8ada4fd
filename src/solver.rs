use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::constants::DEADLINE_POLL_MASK;

pub mod backtrack;
pub mod engine;
pub mod hanoi;
pub mod held_karp;
pub mod mcts;
pub mod minimax;
pub mod queens;
pub mod salesman;
pub mod warnsdorff;

/// Result of a search that may legitimately come back empty handed.
///
/// `TimedOut` is kept apart from `Infeasible`: running out of budget says
/// nothing about whether a solution exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum Outcome<T> {
    Found(T),
    Infeasible,
    TimedOut,
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }
    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            _ => None,
        }
    }
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Found(value) => Outcome::Found(f(value)),
            Outcome::Infeasible => Outcome::Infeasible,
            Outcome::TimedOut => Outcome::TimedOut,
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Outcome::Infeasible, Outcome::Found)
    }
}

/// A value paired with the wall time it took to produce.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

pub fn timed<T>(work: impl FnOnce() -> T) -> Timed<T> {
    let now = Instant::now();
    let value = work();
    Timed {
        value,
        elapsed: now.elapsed(),
    }
}

/// Cooperative cancellation for deep recursive searches.
///
/// The clock is only read once every `DEADLINE_POLL_MASK + 1` polls; once the
/// budget is spent every later poll reports expiry without touching the clock.
#[derive(Debug, Clone)]
pub struct Deadline {
    start: Instant,
    budget: Option<Duration>,
    polls: u64,
    expired: bool,
}

impl Deadline {
    pub fn new(budget: Duration) -> Deadline {
        Deadline {
            start: Instant::now(),
            budget: Some(budget),
            polls: 0,
            expired: false,
        }
    }

    pub fn unbounded() -> Deadline {
        Deadline {
            start: Instant::now(),
            budget: None,
            polls: 0,
            expired: false,
        }
    }

    pub fn expired(&mut self) -> bool {
        if self.expired {
            return true;
        }
        let poll = self.polls;
        self.polls += 1;
        if poll & DEADLINE_POLL_MASK == 0 {
            if let Some(budget) = self.budget {
                self.expired = self.start.elapsed() >= budget;
            }
        }
        return self.expired;
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

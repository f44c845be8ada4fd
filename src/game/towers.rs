use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Validation;
use crate::constants::*;
use crate::solver::hanoi::minimum_moves;
use crate::web::errors::{Result, SolverError};

/// A peg, named by a single uppercase letter.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Peg(char);

impl Peg {
    pub const A: Peg = Peg('A');
    pub const B: Peg = Peg('B');
    pub const C: Peg = Peg('C');
    pub const D: Peg = Peg('D');

    pub fn new(label: char) -> Result<Peg> {
        if label.is_ascii_uppercase() {
            Ok(Peg(label))
        } else {
            Err(SolverError::invalid(format!(
                "pegs are named by one uppercase letter, got {:?}",
                label
            )))
        }
    }
    pub fn label(&self) -> char {
        self.0
    }
}

impl TryFrom<char> for Peg {
    type Error = SolverError;
    fn try_from(label: char) -> Result<Peg> {
        Peg::new(label)
    }
}

impl From<Peg> for char {
    fn from(peg: Peg) -> char {
        peg.0
    }
}

impl Display for Peg {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Moves `disk` off the top of `from` onto `to`. Serialized as
/// `[disk, "from", "to"]`.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, Peg, Peg)", into = "(u8, Peg, Peg)")]
pub struct Move {
    pub disk: u8,
    pub from: Peg,
    pub to: Peg,
}

impl Move {
    pub const fn new(disk: u8, from: Peg, to: Peg) -> Move {
        Move { disk, from, to }
    }
}

impl From<(u8, Peg, Peg)> for Move {
    fn from((disk, from, to): (u8, Peg, Peg)) -> Move {
        Move { disk, from, to }
    }
}

impl From<Move> for (u8, Peg, Peg) {
    fn from(m: Move) -> Self {
        (m.disk, m.from, m.to)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "disk {} {} -> {}", self.disk, self.from, self.to)
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    ThreePeg,
    FourPeg,
}

impl Mode {
    pub fn pegs(&self) -> &'static [Peg] {
        match self {
            Mode::ThreePeg => &[Peg::A, Peg::B, Peg::C],
            Mode::FourPeg => &[Peg::A, Peg::B, Peg::C, Peg::D],
        }
    }
    pub fn source(&self) -> Peg {
        Peg::A
    }
    pub fn target(&self) -> Peg {
        match self {
            Mode::ThreePeg => Peg::C,
            Mode::FourPeg => Peg::D,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Error)]
pub enum IllegalMove {
    #[error("there is no peg {0}")]
    UnknownPeg(Peg),
    #[error("peg {0} is empty")]
    EmptySource(Peg),
    #[error("the top disk on peg {peg} is {top}, not {disk}")]
    TopDiskMismatch { peg: Peg, top: u8, disk: u8 },
    #[error("disk {disk} cannot go onto the smaller disk {onto}")]
    LargerOntoSmaller { disk: u8, onto: u8 },
}

/// Peg stacks, bottom disk first. Every stack is kept strictly decreasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Towers {
    stacks: BTreeMap<Peg, Vec<u8>>,
}

impl Towers {
    /// Disks `disks..=1` stacked on `source`, the other pegs empty.
    pub fn new(disks: u8, pegs: &[Peg], source: Peg) -> Towers {
        let mut stacks: BTreeMap<Peg, Vec<u8>> = pegs.iter().map(|&peg| (peg, Vec::new())).collect();
        stacks.insert(source, (1..=disks).rev().collect());
        Towers { stacks }
    }

    pub fn for_mode(disks: u8, mode: Mode) -> Towers {
        Towers::new(disks, mode.pegs(), mode.source())
    }

    pub fn pegs(&self) -> impl Iterator<Item = (Peg, &[u8])> {
        self.stacks.iter().map(|(&peg, stack)| (peg, stack.as_slice()))
    }

    pub fn stack(&self, peg: Peg) -> Option<&[u8]> {
        self.stacks.get(&peg).map(Vec::as_slice)
    }

    pub fn top(&self, peg: Peg) -> Option<u8> {
        self.stacks.get(&peg).and_then(|stack| stack.last().copied())
    }

    /// Replays one move, leaving the towers untouched when it is illegal.
    pub fn apply(&mut self, m: &Move) -> Result<(), IllegalMove> {
        if !self.stacks.contains_key(&m.to) {
            return Err(IllegalMove::UnknownPeg(m.to));
        }
        let top = match self.stacks.get(&m.from) {
            None => return Err(IllegalMove::UnknownPeg(m.from)),
            Some(stack) => *stack.last().ok_or(IllegalMove::EmptySource(m.from))?,
        };
        if top != m.disk {
            return Err(IllegalMove::TopDiskMismatch {
                peg: m.from,
                top,
                disk: m.disk,
            });
        }
        if let Some(onto) = self.top(m.to) {
            if onto < top {
                return Err(IllegalMove::LargerOntoSmaller { disk: top, onto });
            }
        }
        if let Some(stack) = self.stacks.get_mut(&m.from) {
            stack.pop();
        }
        if let Some(stack) = self.stacks.get_mut(&m.to) {
            stack.push(top);
        }
        Ok(())
    }

    /// Whether all `disks` sit on `target`, largest at the bottom.
    pub fn is_solved(&self, disks: u8, target: Peg) -> bool {
        self.stack(target)
            .map_or(false, |stack| stack.iter().copied().eq((1..=disks).rev()))
    }
}

pub(crate) fn check_disk_count(disks: u8) -> Result<()> {
    if ACCEPTED_DISKS.contains(&disks) {
        Ok(())
    } else {
        Err(SolverError::invalid(format!(
            "disk count must be between {} and {}, got {}",
            ACCEPTED_DISKS.start(),
            ACCEPTED_DISKS.end(),
            disks
        )))
    }
}

/// Replays `moves` from the starting position of `mode` and checks that every
/// move is legal and that the tower ends up whole on the target peg.
pub fn validate_move_sequence(disks: u8, moves: &[Move], mode: Mode) -> Validation {
    if let Err(err) = check_disk_count(disks) {
        return Validation::reject(err.to_string());
    }
    let mut towers = Towers::for_mode(disks, mode);
    for (i, m) in moves.iter().enumerate() {
        if let Err(illegal) = towers.apply(m) {
            return Validation::reject(format!("Move {} ({}) is illegal: {}.", i + 1, m, illegal));
        }
    }
    if !towers.is_solved(disks, mode.target()) {
        return Validation::reject(format!("Not all disks reached peg {}.", mode.target()));
    }
    Validation::accept(format!(
        "Congratulations! You solved it in {} moves.",
        moves.len()
    ))
}

/// How a submitted solution scores against the minimum move count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub valid: bool,
    pub optimal: bool,
    pub min_moves: u64,
    pub score_amount: u32,
    pub message: String,
}

/// Full marks for an optimal solution, ten points off per percent of extra
/// moves, nothing for an invalid one.
pub fn score_solution(disks: u8, moves: &[Move], mode: Mode) -> Score {
    let validation = validate_move_sequence(disks, moves, mode);
    let min_moves = minimum_moves(disks, mode);
    let len = moves.len() as u64;
    let score_amount = if !validation.valid {
        0
    } else if min_moves == 0 {
        MAX_SCORE
    } else {
        let extra = len.saturating_sub(min_moves) as f64;
        let penalty = (100.0 * extra / min_moves as f64).min(100.0);
        (MAX_SCORE as f64 - 10.0 * penalty).max(0.0) as u32
    };
    Score {
        valid: validation.valid,
        optimal: validation.valid && len == min_moves,
        min_moves,
        score_amount,
        message: validation.message,
    }
}

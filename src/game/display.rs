use std::fmt::{Debug, Display, Error, Formatter};

use colored::{Color, Colorize};

use super::distances::{city_label, DistanceMatrix, Route};
use super::queens::QueenBoard;
use super::state::{GameState, Mark};
use super::towers::Towers;
use super::Square;
use crate::constants::*;

fn background(x: usize, y: usize) -> Color {
    if (x + y) % 2 == 0 {
        Color::White
    } else {
        Color::BrightBlack
    }
}

impl Display for super::tour::TourBoard {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        for y in (0..BOARD_SIZE).rev() {
            write!(f, "{} ", y)?;
            for x in 0..BOARD_SIZE {
                let cell = match self.step_at(Square::new(x, y)) {
                    Some(step) => format!("{:>3}", step + 1).color(Color::Black),
                    None => "  .".color(Color::Black),
                };
                write!(f, "{}", cell.on_color(background(x, y)))?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for x in 0..BOARD_SIZE {
            write!(f, "{:>3}", x)?;
        }
        writeln!(f)
    }
}

impl Debug for super::tour::TourBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self)
    }
}

impl Display for QueenBoard {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let cell = if self.has_queen(row, col) {
                    " ♛ ".color(Color::Red)
                } else {
                    "   ".normal()
                };
                write!(f, "{}", cell.on_color(background(row, col)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        for (r, row) in self.rows().iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, "|")?;
                }
                let mark = match value {
                    1 => " O ".blue().bold(),
                    -1 => " X ".red().bold(),
                    _ => format!("{:>2} ", r * self.size() + c).dimmed(),
                };
                write!(f, "{}", mark)?;
            }
            writeln!(f)?;
            if r + 1 < self.size() {
                writeln!(f, "{}", "-".repeat(self.size() * 4 - 1))?;
            }
        }
        let to_move = match self.winner() {
            Some(winner) => format!("winner: {:?}", winner),
            None => format!("{:?} to move", self.turn()),
        };
        writeln!(f, "{}", to_move.italic())
    }
}

impl Display for Mark {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            Mark::Empty => write!(f, "."),
            Mark::O => write!(f, "O"),
            Mark::X => write!(f, "X"),
        }
    }
}

impl Display for Towers {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        for (peg, stack) in self.pegs() {
            write!(f, "{} |", peg.to_string().bold())?;
            for &disk in stack {
                let shade = if disk % 2 == 0 { Color::Cyan } else { Color::Yellow };
                write!(f, " {}", "=".repeat(disk as usize).color(shade))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn label(node: usize) -> String {
    city_label(node).map_or_else(|| node.to_string(), String::from)
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let names: Vec<String> = self.nodes.iter().map(|&node| label(node)).collect();
        write!(f, "{} ({:.2} km)", names.join(" -> "), self.distance)
    }
}

impl Display for DistanceMatrix {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "   ")?;
        for to in 0..self.size() {
            write!(f, "{:>8}", label(to).bold())?;
        }
        writeln!(f)?;
        for from in 0..self.size() {
            write!(f, "{:>3}", label(from).bold())?;
            for to in 0..self.size() {
                if from == to {
                    write!(f, "{:>8}", "-".dimmed())?;
                } else {
                    write!(f, "{:>8.2}", self.get(from, to))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

use std::fmt::{Display, Error, Formatter};

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;

pub mod display;
pub mod distances;
pub mod queens;
pub mod state;
pub mod tour;
pub mod towers;


/// A cell on the 8×8 board, `x` is the first index and `y` the second.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Serialize, Deserialize)]
pub struct Square {
    pub x: usize,
    pub y: usize,
}

impl Square {
    pub const fn new(x: usize, y: usize) -> Square {
        Square { x, y }
    }

    pub fn on_board(&self) -> bool {
        self.x < BOARD_SIZE && self.y < BOARD_SIZE
    }

    /// The square `(dx, dy)` away, if it is still on the board.
    pub fn offset(&self, dx: isize, dy: isize) -> Option<Square> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        let target = Square { x, y };
        target.on_board().then_some(target)
    }

    pub fn is_knight_move(&self, other: &Square) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        (dx, dy) == (1, 2) || (dx, dy) == (2, 1)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Verdict of an independent validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub message: String,
}

impl Validation {
    pub fn accept(message: impl Into<String>) -> Validation {
        Validation {
            valid: true,
            message: message.into(),
        }
    }
    pub fn reject(message: impl Into<String>) -> Validation {
        Validation {
            valid: false,
            message: message.into(),
        }
    }
}

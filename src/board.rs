use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::GameError;

/// Occupancy mask: bit `i` is cell `i`, row-major from the top-left corner.
pub type Mask = u16;

/// Cell index into a [`Mask`].
pub type Cell = u16;

/// Supported board sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardSize {
    #[default]
    Three,
    Four,
}

impl BoardSize {
    /// Cells per side.
    pub fn side(self) -> u16 {
        match self {
            BoardSize::Three => 3,
            BoardSize::Four => 4,
        }
    }

    pub fn cells(self) -> u16 {
        self.side() * self.side()
    }

    /// Bits that address real cells.
    pub fn full_board(self) -> Mask {
        match self {
            BoardSize::Three => 0b0000_0001_1111_1111,
            BoardSize::Four => 0b1111_1111_1111_1111,
        }
    }

    /// Padding bits above the last cell. They always count as occupied.
    pub fn out_of_bounds(self) -> Mask {
        !self.full_board()
    }

    pub fn contains(self, cell: Cell) -> bool {
        cell < self.cells()
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = GameError;

    fn try_from(side: u8) -> Result<Self, Self::Error> {
        match side {
            3 => Ok(BoardSize::Three),
            4 => Ok(BoardSize::Four),
            other => Err(GameError::UnsupportedBoardSize(other)),
        }
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.side())
    }
}

/// The two players. X's Zobrist keys come first in the key table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

#[inline]
pub fn cell_bit(cell: Cell) -> Mask {
    1 << cell
}

#[inline]
pub fn is_occupied(occupied: Mask, cell: Cell) -> bool {
    occupied & cell_bit(cell) != 0
}

/// Empty cells of `occupied`, lowest index first.
pub fn legal_moves(size: BoardSize, occupied: Mask) -> Moves {
    Moves {
        remaining: !occupied & size.full_board(),
    }
}

pub fn is_full(size: BoardSize, occupied: Mask) -> bool {
    occupied & size.full_board() == size.full_board()
}

/// Iterator over the set bits of an empty-cell mask.
///
/// Cloning it restarts the walk from the same point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moves {
    remaining: Mask,
}

impl Iterator for Moves {
    type Item = Cell;

    #[inline]
    fn next(&mut self) -> Option<Cell> {
        if self.remaining == 0 {
            return None;
        }
        let cell = self.remaining.trailing_zeros() as Cell;
        // Clear the lowest set bit.
        self.remaining &= self.remaining - 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Moves {}

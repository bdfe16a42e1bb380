//! Exact win/loss detection against a fixed table of winning lines.

use crate::board::{BoardSize, Mask};

pub const WIN: i16 = 100;
pub const LOSS: i16 = -100;
pub const UNDECIDED: i16 = 0;

// 3x3 lines. Cell 0 is the top-left corner.
const COL_LEFT: Mask = 0b001_001_001;
const COL_MIDDLE: Mask = 0b010_010_010;
const COL_RIGHT: Mask = 0b100_100_100;
const ROW_TOP: Mask = 0b000_000_111;
const ROW_MIDDLE: Mask = 0b000_111_000;
const ROW_BOTTOM: Mask = 0b111_000_000;
const DIAG_DOWN: Mask = 0b100_010_001;
const DIAG_UP: Mask = 0b001_010_100;

const PATTERNS_3: [Mask; 8] = [
    COL_RIGHT, COL_MIDDLE, COL_LEFT, ROW_BOTTOM, ROW_MIDDLE, ROW_TOP, DIAG_DOWN, DIAG_UP,
];

/// Three in a row on 4x4: every horizontal, vertical and diagonal run of
/// three cells, including the off-centre diagonals.
const PATTERNS_4: [Mask; 24] = [
    // horizontal
    0b0000_0000_0000_0111,
    0b0000_0000_0000_1110,
    0b0000_0000_0111_0000,
    0b0000_0000_1110_0000,
    0b0000_0111_0000_0000,
    0b0000_1110_0000_0000,
    0b0111_0000_0000_0000,
    0b1110_0000_0000_0000,
    // vertical
    0b0000_0001_0001_0001,
    0b0001_0001_0001_0000,
    0b0000_0010_0010_0010,
    0b0010_0010_0010_0000,
    0b0000_0100_0100_0100,
    0b0100_0100_0100_0000,
    0b0000_1000_1000_1000,
    0b1000_1000_1000_0000,
    // down-right
    0b0000_0100_0010_0001,
    0b0000_1000_0100_0010,
    0b0100_0010_0001_0000,
    0b1000_0100_0010_0000,
    // down-left
    0b0000_0001_0010_0100,
    0b0000_0010_0100_1000,
    0b0001_0010_0100_0000,
    0b0010_0100_1000_0000,
];

/// Winning lines for `size`, in scan order.
pub fn winning_patterns(size: BoardSize) -> &'static [Mask] {
    match size {
        BoardSize::Three => &PATTERNS_3,
        BoardSize::Four => &PATTERNS_4,
    }
}

/// Score the position for `mover`: [`WIN`] if it holds a complete line,
/// [`LOSS`] if `opponent` does, [`UNDECIDED`] otherwise.
///
/// Each pattern is tested against `mover` before `opponent`, so if both
/// somehow hold a line the first matching pattern decides.
pub fn evaluate(size: BoardSize, mover: Mask, opponent: Mask) -> i16 {
    for &pattern in winning_patterns(size) {
        if pattern & mover == pattern {
            return WIN;
        } else if pattern & opponent == pattern {
            return LOSS;
        }
    }
    UNDECIDED
}

//! Zobrist hashing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{BoardSize, Cell, Mark, Mask};

/// One random key per (mark, cell): X keys in `0..cells`, O keys in
/// `cells..2 * cells`.
#[derive(Clone, Debug)]
pub struct Zobrist {
    keys: Vec<u64>,
    cells: usize,
}

impl Zobrist {
    pub fn new(size: BoardSize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let cells = size.cells() as usize;
        let keys = (0..2 * cells).map(|_| rng.random::<u64>()).collect();
        Self { keys, cells }
    }

    #[inline]
    pub fn key(&self, mark: Mark, cell: Cell) -> u64 {
        let base = match mark {
            Mark::X => 0,
            Mark::O => self.cells,
        };
        self.keys[base + cell as usize]
    }

    /// Fingerprint computed from scratch.
    pub fn full_hash(&self, x: Mask, o: Mask) -> u64 {
        let mut h = 0u64;
        for cell in 0..self.cells as Cell {
            if x & (1 << cell) != 0 {
                h ^= self.key(Mark::X, cell);
            }
            if o & (1 << cell) != 0 {
                h ^= self.key(Mark::O, cell);
            }
        }
        h
    }

    /// Add or remove one stone. XOR is its own inverse, so the same call
    /// undoes itself.
    #[inline]
    #[must_use]
    pub fn toggle(&self, hash: u64, mark: Mark, cell: Cell) -> u64 {
        hash ^ self.key(mark, cell)
    }
}

//! Move selection policies.
//!
//! Every policy returns the mover's mask with exactly one new cell set.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::{Cell, Mask, cell_bit, is_full, is_occupied, legal_moves};
use crate::engine::Engine;
use crate::eval::{LOSS, evaluate};
use crate::game::GameError;
use crate::search::INFINITY;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Iterative-deepening negamax; falls back to `LossAverse` when every
    /// line loses.
    #[default]
    Optimal,
    /// Block the opponent's immediate win, otherwise play randomly.
    LossAverse,
    Random,
}

impl Policy {
    /// Resolve the CLI flags. At most one of them may be set.
    pub fn from_flags(loss_averse: bool, random: bool) -> Result<Policy, GameError> {
        match (loss_averse, random) {
            (false, false) => Ok(Policy::Optimal),
            (true, false) => Ok(Policy::LossAverse),
            (false, true) => Ok(Policy::Random),
            (true, true) => Err(GameError::ConflictingPolicies),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Optimal => write!(f, "optimal"),
            Policy::LossAverse => write!(f, "loss-averse"),
            Policy::Random => write!(f, "random"),
        }
    }
}

impl Engine {
    /// Pick a move for `mover` against `opponent` and return `mover` with
    /// that cell added.
    pub fn select_move(
        &mut self,
        policy: Policy,
        mover: Mask,
        opponent: Mask,
    ) -> Result<Mask, GameError> {
        if mover & opponent != 0 {
            return Err(GameError::OverlappingMasks);
        }
        if is_full(self.size, mover | opponent) {
            return Err(GameError::BoardFull);
        }

        self.begin_decision();
        let cell = match policy {
            Policy::Optimal => self.optimal_move(mover, opponent),
            Policy::LossAverse => self.loss_averse_move(mover, opponent),
            Policy::Random => self.random_move(mover, opponent),
        };
        log::info!("{policy} policy plays cell {cell}");
        Ok(mover | cell_bit(cell))
    }

    fn optimal_move(&mut self, mover: Mask, opponent: Mask) -> Cell {
        let empties = legal_moves(self.size, mover | opponent).len() as u16;
        let mut best = (-INFINITY, Cell::MAX);

        for depth in 1..=empties {
            best = (-INFINITY, Cell::MAX);
            for cell in legal_moves(self.size, mover | opponent) {
                let score = self.score_move(mover, opponent, cell, depth);
                if score > 0 {
                    log::debug!("depth {depth}: cell {cell} wins ({score})");
                    self.log_table_stats();
                    return cell;
                }
                if score > best.0 {
                    best = (score, cell);
                }
            }
            log::debug!("depth {depth}: best cell {} ({})", best.1, best.0);
        }
        self.log_table_stats();

        if best.0 < 0 {
            log::warn!("every line loses against perfect play; blocking instead");
            return self.loss_averse_move(mover, opponent);
        }
        best.1
    }

    /// Take the first cell where the opponent would complete a line.
    fn loss_averse_move(&mut self, mover: Mask, opponent: Mask) -> Cell {
        for cell in legal_moves(self.size, mover | opponent) {
            if evaluate(self.size, mover, opponent | cell_bit(cell)) == LOSS {
                return cell;
            }
        }
        self.random_move(mover, opponent)
    }

    /// Uniform draw over all cells, repeated until an empty one comes up.
    fn random_move(&mut self, mover: Mask, opponent: Mask) -> Cell {
        let occupied = mover | opponent;
        loop {
            let cell = self.rng.random_range(0..self.size.cells());
            if !is_occupied(occupied, cell) {
                return cell;
            }
        }
    }

    fn log_table_stats(&self) {
        let stats = self.table.stats();
        log::debug!(
            "table: {} entries, {}/{} hits, {} stores",
            stats.entries,
            stats.hits,
            stats.probes,
            stats.stores
        );
    }
}

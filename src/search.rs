//! Negamax with alpha-beta pruning and transposition-table cutoffs.
//!
//! Values are always from the point of view of the side about to move.
//! A forced win scores `WIN + depth_remaining` and a forced loss
//! `LOSS - depth_remaining`, so faster wins and slower losses are preferred.
//! Positions still open at the horizon, and full boards, score 0.

use crate::board::{Cell, Mark, Mask, cell_bit, is_full, legal_moves};
use crate::engine::Engine;
use crate::eval::{UNDECIDED, evaluate};
use crate::transposition::{Bound, TtEntry};

/// Window sentinel, larger than any reachable score.
pub const INFINITY: i16 = 10_000;

impl Engine {
    /// Search the position where `last_mover` has just moved and `to_play`
    /// (playing `side`) is next.
    ///
    /// `fingerprint` must equal the Zobrist hash of the position. Masks and
    /// fingerprint are passed by value, so each recursive call works on its
    /// own copy and nothing needs undoing on return.
    #[allow(clippy::too_many_arguments)]
    pub fn negamax(
        &mut self,
        fingerprint: u64,
        last_mover: Mask,
        to_play: Mask,
        depth: u16,
        mut alpha: i16,
        mut beta: i16,
        side: Mark,
    ) -> i16 {
        let alpha_orig = alpha;

        if let Some(entry) = self.table.lookup(fingerprint) {
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return entry.value,
                    Bound::LowerBound => alpha = alpha.max(entry.value),
                    Bound::UpperBound => beta = beta.min(entry.value),
                }
                if alpha >= beta {
                    return entry.value;
                }
            }
        }

        // The previous move belongs to `last_mover`, so a finished line can
        // only be theirs. Checked before the horizon so that a won position
        // at depth 0 or on a full board is still reported as won.
        let score = evaluate(self.size, to_play, last_mover);
        if score != UNDECIDED {
            return if score > 0 {
                score + depth as i16
            } else {
                score - depth as i16
            };
        }

        let occupied = last_mover | to_play;
        if depth == 0 || is_full(self.size, occupied) {
            return 0;
        }

        let mut value = -INFINITY;
        for cell in legal_moves(self.size, occupied) {
            let child = self.zobrist.toggle(fingerprint, side, cell);
            let score = -self.negamax(
                child,
                to_play | cell_bit(cell),
                last_mover,
                depth - 1,
                -beta,
                -alpha,
                side.opponent(),
            );
            value = value.max(score);
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }

        let bound = if value <= alpha_orig {
            Bound::UpperBound
        } else if value >= beta {
            Bound::LowerBound
        } else {
            Bound::Exact
        };
        self.table.store(TtEntry::new(fingerprint, bound, depth, value));

        value
    }

    /// Score for the engine of playing `cell`, searching the reply `depth`
    /// plies deep.
    pub fn score_move(&mut self, mine: Mask, theirs: Mask, cell: Cell, depth: u16) -> i16 {
        let mine = mine | cell_bit(cell);
        let fingerprint = self.fingerprint(mine, theirs);
        -self.negamax(
            fingerprint,
            mine,
            theirs,
            depth,
            -INFINITY,
            INFINITY,
            self.mark.opponent(),
        )
    }
}

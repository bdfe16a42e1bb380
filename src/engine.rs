use serde::{Deserialize, Serialize};

use crate::board::{BoardSize, Mark, Mask};
use crate::transposition::{DEFAULT_BUCKETS, TableStats, TranspositionTable};
use crate::zobrist::Zobrist;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// How long cached search results are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableLifetime {
    /// Cleared at the start of every decision.
    PerDecision,
    /// Cleared when a new game starts.
    #[default]
    PerGame,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub size: BoardSize,
    /// Seed for the Zobrist keys and the random policy. Drawn at startup
    /// when absent.
    pub seed: Option<u64>,
    pub buckets: usize,
    pub table_lifetime: TableLifetime,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            size: BoardSize::Three,
            seed: None,
            buckets: DEFAULT_BUCKETS,
            table_lifetime: TableLifetime::PerGame,
        }
    }
}

impl EngineConfig {
    pub fn with_size(size: BoardSize) -> Self {
        EngineConfig {
            size,
            ..Self::default()
        }
    }
}

/// Search context: Zobrist keys, transposition table and RNG for one agent.
///
/// The engine keys positions by real marks, so it must know which mark it
/// plays; see [`Engine::set_mark`]. Use one engine per agent.
pub struct Engine {
    pub(crate) size: BoardSize,
    pub(crate) zobrist: Zobrist,
    pub(crate) table: TranspositionTable,
    pub(crate) rng: StdRng,
    pub(crate) mark: Mark,
    seed: u64,
    table_lifetime: TableLifetime,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        log::debug!(
            "engine for {} board, seed {seed}, {} buckets, {:?} table",
            config.size,
            config.buckets,
            config.table_lifetime
        );
        Engine {
            size: config.size,
            zobrist: Zobrist::new(config.size, seed),
            table: TranspositionTable::new(config.buckets),
            // Offset so the policy RNG does not replay the key sequence.
            rng: StdRng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15),
            mark: Mark::O,
            seed,
            table_lifetime: config.table_lifetime,
        }
    }

    pub fn with_size(size: BoardSize) -> Self {
        Self::new(EngineConfig::with_size(size))
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Set the mark the engine moves for. Cached results are keyed by
    /// mark, so changing it clears the table.
    pub fn set_mark(&mut self, mark: Mark) {
        if mark != self.mark {
            self.table.clear();
        }
        self.mark = mark;
    }

    pub fn table_lifetime(&self) -> TableLifetime {
        self.table_lifetime
    }

    pub fn table_stats(&self) -> TableStats {
        self.table.stats()
    }

    /// Called by the bot layer when a game begins.
    pub fn new_game(&mut self, mark: Mark) {
        self.set_mark(mark);
        self.table.clear();
    }

    /// Fingerprint of a position given from the engine's point of view.
    pub fn fingerprint(&self, mine: Mask, theirs: Mask) -> u64 {
        match self.mark {
            Mark::X => self.zobrist.full_hash(mine, theirs),
            Mark::O => self.zobrist.full_hash(theirs, mine),
        }
    }

    pub(crate) fn begin_decision(&mut self) {
        if self.table_lifetime == TableLifetime::PerDecision {
            self.table.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::cell_bit;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.size, BoardSize::Three);
        assert_eq!(config.buckets, DEFAULT_BUCKETS);
        assert_eq!(config.table_lifetime, TableLifetime::PerGame);
    }

    #[test]
    fn test_seeded_engines_agree() {
        let config = EngineConfig {
            seed: Some(17),
            ..EngineConfig::with_size(BoardSize::Four)
        };
        let a = Engine::new(config.clone());
        let b = Engine::new(config);
        assert_eq!(a.seed(), 17);
        assert_eq!(
            a.fingerprint(cell_bit(3), cell_bit(12)),
            b.fingerprint(cell_bit(3), cell_bit(12))
        );
    }

    #[test]
    fn test_fingerprint_respects_mark() {
        let mut engine = Engine::new(EngineConfig {
            seed: Some(5),
            ..EngineConfig::default()
        });
        let (mine, theirs) = (cell_bit(0), cell_bit(4));

        engine.set_mark(Mark::O);
        assert_eq!(
            engine.fingerprint(mine, theirs),
            engine.zobrist.full_hash(theirs, mine)
        );
        engine.set_mark(Mark::X);
        assert_eq!(
            engine.fingerprint(mine, theirs),
            engine.zobrist.full_hash(mine, theirs)
        );
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = EngineConfig {
            seed: Some(3),
            table_lifetime: TableLifetime::PerDecision,
            ..EngineConfig::with_size(BoardSize::Four)
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}

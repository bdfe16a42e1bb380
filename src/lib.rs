//! N-in-a-row on 3x3 and 4x4 bitboards: a negamax engine with alpha-beta
//! pruning and a Zobrist-keyed transposition table, three move-selection
//! policies, and a small arena for playing games between bots.

pub mod arena;
pub mod board;
pub mod bot;
pub mod engine;
pub mod eval;
pub mod game;
pub mod policy;
pub mod search;
pub mod transposition;
pub mod zobrist;

pub use arena::*;
pub use board::{BoardSize, Cell, Mark, Mask};
pub use bot::*;
pub use engine::{Engine, EngineConfig, TableLifetime};
pub use game::*;
pub use policy::Policy;

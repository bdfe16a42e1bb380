use serde::Serialize;
use std::time::{Duration, Instant};

use crate::board::{BoardSize, Cell, Mark};
use crate::bot::Bot;
use crate::game::{GameResult, GameState};

#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    pub size: BoardSize,
    pub first_player: Mark,
    pub verbose: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            size: BoardSize::Three,
            first_player: Mark::X,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    XWins { winner_name: String, moves: usize },
    OWins { winner_name: String, moves: usize },
    Draw { moves: usize },
    /// A player returned no move.
    Forfeit { violator: String, winner: String },
    IllegalMove { violator: String, winner: String },
}

impl MatchResult {
    pub fn winner(&self) -> Option<&str> {
        match self {
            MatchResult::XWins { winner_name, .. } => Some(winner_name),
            MatchResult::OWins { winner_name, .. } => Some(winner_name),
            MatchResult::Forfeit { winner, .. } => Some(winner),
            MatchResult::IllegalMove { winner, .. } => Some(winner),
            MatchResult::Draw { .. } => None,
        }
    }
}

pub struct Match {
    config: MatchConfig,
    state: GameState,
    x_bot: Box<dyn Bot>,
    o_bot: Box<dyn Bot>,
}

impl Match {
    pub fn new(x_bot: Box<dyn Bot>, o_bot: Box<dyn Bot>, config: MatchConfig) -> Self {
        Match {
            config,
            state: GameState::with_first_player(config.size, config.first_player),
            x_bot,
            o_bot,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    fn bot(&self, mark: Mark) -> &dyn Bot {
        match mark {
            Mark::X => self.x_bot.as_ref(),
            Mark::O => self.o_bot.as_ref(),
        }
    }

    pub fn play(&mut self) -> MatchResult {
        self.x_bot.game_start(Mark::X);
        self.o_bot.game_start(Mark::O);

        log::info!(
            "{} (X) vs {} (O) on {}, {} moves first",
            self.x_bot.name(),
            self.o_bot.name(),
            self.config.size,
            self.config.first_player
        );
        if self.config.verbose {
            println!("{}", self.state.display_board());
        }

        while !self.state.is_game_over() {
            if let Some(result) = self.play_turn() {
                log::info!("match ended early: {result:?}");
                return result;
            }
        }

        self.x_bot.game_end();
        self.o_bot.game_end();

        let moves = self.state.move_count();
        let result = match self.state.result() {
            Some(GameResult::XWins) => MatchResult::XWins {
                winner_name: self.x_bot.name().to_string(),
                moves,
            },
            Some(GameResult::OWins) => MatchResult::OWins {
                winner_name: self.o_bot.name().to_string(),
                moves,
            },
            Some(GameResult::Draw) | None => MatchResult::Draw { moves },
        };
        log::info!("match over after {moves} moves: {result:?}");
        result
    }

    fn play_turn(&mut self) -> Option<MatchResult> {
        let mark = self.state.current_player();
        let bot = match mark {
            Mark::X => &mut self.x_bot,
            Mark::O => &mut self.o_bot,
        };

        let start = Instant::now();
        let cell = bot.get_move(&self.state);
        let elapsed = start.elapsed();

        let name = self.bot(mark).name().to_string();
        let other = self.bot(mark.opponent()).name().to_string();

        let Some(cell) = cell else {
            log::warn!("{name} ({mark}) returned no move");
            if self.config.verbose {
                println!("{name} forfeits");
            }
            return Some(MatchResult::Forfeit {
                violator: name,
                winner: other,
            });
        };

        if let Err(e) = self.state.make_move(cell) {
            log::warn!("{name} ({mark}) played illegal cell {cell}: {e}");
            if self.config.verbose {
                println!("ILLEGAL MOVE: {name} - {e}");
            }
            return Some(MatchResult::IllegalMove {
                violator: name,
                winner: other,
            });
        }

        log::debug!("{name} ({mark}) plays {cell} after {elapsed:?}");
        self.notify(mark, cell);

        if self.config.verbose {
            println!("{}", describe_move(&name, mark, cell, elapsed));
            println!("{}", self.state.display_board());
        }
        None
    }

    fn notify(&mut self, mark: Mark, cell: Cell) {
        self.x_bot.notify_move(mark, cell);
        self.o_bot.notify_move(mark, cell);
    }
}

/// One line of verbose output, including how long the player took.
fn describe_move(name: &str, mark: Mark, cell: Cell, elapsed: Duration) -> String {
    format!("{name} ({mark}) plays: {cell} (took {elapsed:?})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Mask;
    use crate::bot::EngineBot;
    use crate::engine::{Engine, EngineConfig};
    use crate::game::added_cell;
    use crate::policy::Policy;

    fn engine_bot(name: &str, policy: Policy, seed: u64) -> Box<dyn Bot> {
        let engine = Engine::new(EngineConfig {
            seed: Some(seed),
            ..EngineConfig::default()
        });
        Box::new(EngineBot::new(name.to_string(), engine, policy))
    }

    /// Plays a fixed list of cells, then gives up.
    struct ScriptedBot {
        cells: Vec<Cell>,
    }

    impl ScriptedBot {
        fn new(cells: &[Cell]) -> Self {
            ScriptedBot {
                cells: cells.iter().rev().copied().collect(),
            }
        }
    }

    impl Bot for ScriptedBot {
        fn name(&self) -> &str {
            "scripted"
        }

        fn get_move(&mut self, _state: &GameState) -> Option<Cell> {
            self.cells.pop()
        }
    }

    /// Walks every opponent reply, letting the engine answer for `agent`,
    /// and checks the engine never ends up on the losing side.
    fn never_loses(engine: &mut Engine, state: &GameState, agent: Mark, games: &mut usize) {
        if let Some(result) = state.result() {
            let lost = match agent {
                Mark::X => GameResult::OWins,
                Mark::O => GameResult::XWins,
            };
            assert_ne!(result, lost, "engine lost:\n{state}");
            *games += 1;
            return;
        }

        if state.current_player() == agent {
            let (mine, theirs): (Mask, Mask) = state.masks_for(agent);
            let updated = engine.select_move(Policy::Optimal, mine, theirs).unwrap();
            let mut next = state.clone();
            next.make_move(added_cell(mine, updated).unwrap()).unwrap();
            never_loses(engine, &next, agent, games);
        } else {
            for cell in state.legal_moves() {
                let mut next = state.clone();
                next.make_move(cell).unwrap();
                never_loses(engine, &next, agent, games);
            }
        }
    }

    #[test]
    fn test_optimal_never_loses_moving_second() {
        let mut engine = Engine::new(EngineConfig {
            seed: Some(1),
            ..EngineConfig::default()
        });
        engine.new_game(Mark::O);
        let mut games = 0;
        never_loses(&mut engine, &GameState::default(), Mark::O, &mut games);
        assert!(games > 0);
    }

    #[test]
    fn test_optimal_never_loses_moving_first() {
        let mut engine = Engine::new(EngineConfig {
            seed: Some(2),
            ..EngineConfig::default()
        });
        engine.new_game(Mark::X);
        let mut games = 0;
        never_loses(&mut engine, &GameState::default(), Mark::X, &mut games);
        assert!(games > 0);
    }

    #[test]
    fn test_optimal_vs_optimal_draws() {
        for first in [Mark::X, Mark::O] {
            let config = MatchConfig {
                first_player: first,
                ..MatchConfig::default()
            };
            let mut game = Match::new(
                engine_bot("a", Policy::Optimal, 3),
                engine_bot("b", Policy::Optimal, 4),
                config,
            );
            assert_eq!(game.play(), MatchResult::Draw { moves: 9 });
        }
    }

    #[test]
    fn test_optimal_never_loses_to_random() {
        for seed in 0..20 {
            let mut game = Match::new(
                engine_bot("random", Policy::Random, seed),
                engine_bot("optimal", Policy::Optimal, seed + 100),
                MatchConfig::default(),
            );
            let result = game.play();
            assert!(
                !matches!(result, MatchResult::XWins { .. }),
                "seed {seed}: {result:?}"
            );
        }
    }

    #[test]
    fn test_scripted_win() {
        let mut game = Match::new(
            Box::new(ScriptedBot::new(&[0, 1, 2])),
            Box::new(ScriptedBot::new(&[3, 4])),
            MatchConfig::default(),
        );
        let result = game.play();
        assert_eq!(
            result,
            MatchResult::XWins {
                winner_name: "scripted".to_string(),
                moves: 5
            }
        );
        assert_eq!(result.winner(), Some("scripted"));
    }

    #[test]
    fn test_forfeit_when_bot_gives_up() {
        let mut game = Match::new(
            Box::new(ScriptedBot::new(&[0])),
            engine_bot("agent", Policy::Optimal, 5),
            MatchConfig::default(),
        );
        let result = game.play();
        assert_eq!(
            result,
            MatchResult::Forfeit {
                violator: "scripted".to_string(),
                winner: "agent".to_string()
            }
        );
        assert_eq!(game.state().move_count(), 2);
    }

    #[test]
    fn test_illegal_move_reported() {
        let mut game = Match::new(
            Box::new(ScriptedBot::new(&[4])),
            Box::new(ScriptedBot::new(&[4])),
            MatchConfig::default(),
        );
        assert!(matches!(game.play(), MatchResult::IllegalMove { .. }));
    }

    #[test]
    fn test_o_can_move_first() {
        let config = MatchConfig {
            first_player: Mark::O,
            ..MatchConfig::default()
        };
        let mut game = Match::new(
            Box::new(ScriptedBot::new(&[3, 4])),
            Box::new(ScriptedBot::new(&[0, 1, 2])),
            config,
        );
        assert!(matches!(game.play(), MatchResult::OWins { moves: 5, .. }));
    }

    #[test]
    fn test_move_line_shows_think_time() {
        let line = describe_move("agent", Mark::O, 4, Duration::from_millis(12));
        assert_eq!(line, "agent (O) plays: 4 (took 12ms)");
    }

    #[test]
    fn test_result_json() {
        let result = MatchResult::Draw { moves: 9 };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"outcome":"draw","moves":9}"#);
        assert_eq!(result.winner(), None);
    }
}

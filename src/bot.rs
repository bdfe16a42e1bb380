use std::io::{self, BufRead, Write};
use std::time::Instant;

use crate::board::{Cell, Mark, is_occupied};
use crate::engine::{Engine, TableLifetime};
use crate::game::{GameState, added_cell};
use crate::policy::Policy;

/// Trait that all players implement
pub trait Bot {
    /// Get the name of the bot
    fn name(&self) -> &str;

    /// Pick a cell for the current player. `None` means the bot gives up.
    fn get_move(&mut self, state: &GameState) -> Option<Cell>;

    /// Notified when the game starts
    fn game_start(&mut self, _mark: Mark) {}

    /// Notified when a move is made (by either player)
    fn notify_move(&mut self, _mark: Mark, _cell: Cell) {}

    /// Notified when the game ends
    fn game_end(&mut self) {}
}

/// Agent backed by the search engine and one of the three policies.
pub struct EngineBot {
    name: String,
    engine: Engine,
    policy: Policy,
}

impl EngineBot {
    pub fn new(name: String, engine: Engine, policy: Policy) -> Self {
        EngineBot {
            name,
            engine,
            policy,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl Bot for EngineBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, state: &GameState) -> Option<Cell> {
        let mark = state.current_player();
        if mark != self.engine.mark() {
            self.engine.set_mark(mark);
        }
        let (mine, theirs) = state.masks_for(mark);

        let start = Instant::now();
        let result = self.engine.select_move(self.policy, mine, theirs);
        log::info!("{} thought for {:?}", self.name, start.elapsed());

        match result.and_then(|updated| added_cell(mine, updated)) {
            Ok(cell) => Some(cell),
            Err(e) => {
                log::error!("{}: {e}", self.name);
                None
            }
        }
    }

    fn game_start(&mut self, mark: Mark) {
        match self.engine.table_lifetime() {
            TableLifetime::PerGame => self.engine.new_game(mark),
            TableLifetime::PerDecision => self.engine.set_mark(mark),
        }
    }
}

/// Console player. Prompts until an empty in-range cell is entered.
pub struct HumanBot<R, W> {
    name: String,
    input: R,
    output: W,
}

impl HumanBot<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(name: String) -> Self {
        HumanBot::new(name, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanBot<R, W> {
    pub fn new(name: String, input: R, output: W) -> Self {
        HumanBot {
            name,
            input,
            output,
        }
    }

    fn prompt(&mut self) -> io::Result<Option<String>> {
        write!(self.output, "Your move: ")?;
        self.output.flush()?;
        // Raw bytes: a line that is not UTF-8 is just another bad entry.
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

impl<R: BufRead, W: Write> Bot for HumanBot<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, state: &GameState) -> Option<Cell> {
        let size = state.size();
        loop {
            let line = match self.prompt() {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    log::error!("reading move: {e}");
                    return None;
                }
            };
            match line.trim().parse::<Cell>() {
                Ok(cell) if size.contains(cell) && !is_occupied(state.occupied(), cell) => {
                    return Some(cell);
                }
                _ => log::debug!("rejected input {:?}", line.trim()),
            }
        }
    }
}

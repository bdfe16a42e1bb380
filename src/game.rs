use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::board::{BoardSize, Cell, Mark, Mask, cell_bit, is_full, is_occupied, legal_moves};
use crate::eval::{LOSS, WIN, evaluate};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Only 3x3 and 4x4 boards are supported, got {0}")]
    UnsupportedBoardSize(u8),
    #[error("Loss-averse and random policies are mutually exclusive")]
    ConflictingPolicies,
    #[error("Board is full")]
    BoardFull,
    #[error("Player masks overlap")]
    OverlappingMasks,
    #[error("Cell {0} is off the board")]
    CellOutOfRange(Cell),
    #[error("Cell {0} is already taken")]
    CellOccupied(Cell),
    #[error("Move must add exactly one stone")]
    InvalidUpdate,
    #[error("Game already over")]
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    XWins,
    OWins,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    size: BoardSize,
    x: Mask,
    o: Mask,
    current_player: Mark,
    move_count: usize,
    result: Option<GameResult>,
}

impl GameState {
    /// Empty board, X to move.
    pub fn new(size: BoardSize) -> Self {
        Self::with_first_player(size, Mark::X)
    }

    pub fn with_first_player(size: BoardSize, first: Mark) -> Self {
        GameState {
            size,
            x: 0,
            o: 0,
            current_player: first,
            move_count: 0,
            result: None,
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn mask(&self, mark: Mark) -> Mask {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    /// `(mine, theirs)` for `mark`.
    pub fn masks_for(&self, mark: Mark) -> (Mask, Mask) {
        (self.mask(mark), self.mask(mark.opponent()))
    }

    pub fn occupied(&self) -> Mask {
        self.x | self.o
    }

    pub fn get_cell(&self, cell: Cell) -> Option<Mark> {
        if !self.size.contains(cell) {
            None
        } else if is_occupied(self.x, cell) {
            Some(Mark::X)
        } else if is_occupied(self.o, cell) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Empty cells, lowest first. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Cell> {
        if self.is_game_over() {
            return Vec::new();
        }
        legal_moves(self.size, self.occupied()).collect()
    }

    /// Place a stone for the current player and update the result.
    pub fn make_move(&mut self, cell: Cell) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        if !self.size.contains(cell) {
            return Err(GameError::CellOutOfRange(cell));
        }
        if is_occupied(self.occupied(), cell) {
            return Err(GameError::CellOccupied(cell));
        }

        match self.current_player {
            Mark::X => self.x |= cell_bit(cell),
            Mark::O => self.o |= cell_bit(cell),
        }
        self.move_count += 1;
        self.check_game_end();
        self.current_player = self.current_player.opponent();
        Ok(())
    }

    /// Play the move encoded by a policy result: the current player's mask
    /// with exactly one extra cell.
    pub fn apply_update(&mut self, updated: Mask) -> Result<Cell, GameError> {
        let cell = added_cell(self.mask(self.current_player), updated)?;
        self.make_move(cell)?;
        Ok(cell)
    }

    fn check_game_end(&mut self) {
        self.result = match evaluate(self.size, self.x, self.o) {
            WIN => Some(GameResult::XWins),
            LOSS => Some(GameResult::OWins),
            _ if is_full(self.size, self.occupied()) => Some(GameResult::Draw),
            _ => None,
        };
    }

    pub fn display_board(&self) -> String {
        let side = self.size.side();
        let mut output = String::new();
        for row in 0..side {
            for col in 0..side {
                let symbol = match self.get_cell(row * side + col) {
                    Some(Mark::X) => 'X',
                    Some(Mark::O) => 'O',
                    None => '-',
                };
                output.push(symbol);
                output.push(' ');
            }
            output.push('\n');
        }
        output
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(BoardSize::Three)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_board())
    }
}

/// The single cell set in `after` but not in `before`.
pub fn added_cell(before: Mask, after: Mask) -> Result<Cell, GameError> {
    let added = after & !before;
    if after & before != before || added.count_ones() != 1 {
        return Err(GameError::InvalidUpdate);
    }
    Ok(added.trailing_zeros() as Cell)
}

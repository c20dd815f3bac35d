use serde::{Deserialize, Serialize};

use super::game_board::GameBoard;

/// Statistics of one game.
///
/// # Example
///
/// ```
/// use tdl2048_engine::{BitBoard, GameBoard, GameStats};
///
/// let mut stats = GameStats::new();
/// let board = GameBoard::from_state(BitBoard::from_bits(0x0000_0000_0000_0021), 4);
/// stats.complete_move(&board);
///
/// assert_eq!(stats.moves(), 1);
/// assert_eq!(stats.score(), 4);
/// assert_eq!(stats.max_tile(), 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    moves: usize,
    score: u32,
    max_tile: u32,
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            moves: 0,
            score: 0,
            max_tile: 0,
        }
    }

    /// Returns the number of moves that changed the board.
    #[must_use]
    pub const fn moves(&self) -> usize {
        self.moves
    }

    /// Returns the final (or current) game score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Returns the largest tile value seen so far.
    #[must_use]
    pub const fn max_tile(&self) -> u32 {
        self.max_tile
    }

    /// Updates statistics after an effective move.
    pub fn complete_move(&mut self, board: &GameBoard) {
        self.moves += 1;
        self.observe(board);
    }

    /// Refreshes score and largest tile without counting a move.
    pub fn observe(&mut self, board: &GameBoard) {
        self.score = board.score();
        self.max_tile = self.max_tile.max(board.max_tile());
    }
}

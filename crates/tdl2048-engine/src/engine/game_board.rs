use serde::{Deserialize, Serialize};

use crate::core::{
    bit_board::{BOARD_SIZE, BitBoard, tile_value},
    direction::Direction,
    row_table::RowTable,
};

/// Board state plus accumulated score.
///
/// This is the deterministic half of the game: [`slide`](Self::slide) applies
/// a move without spawning a tile. Random spawning lives in
/// [`GameSession`](crate::GameSession).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameBoard {
    state: BitBoard,
    score: u32,
}

impl GameBoard {
    /// Creates an empty board with zero score.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: BitBoard::EMPTY,
            score: 0,
        }
    }

    #[must_use]
    pub const fn from_state(state: BitBoard, score: u32) -> Self {
        Self { state, score }
    }

    #[must_use]
    pub const fn state(&self) -> BitBoard {
        self.state
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Overwrites the board and score (used to make independent copies).
    pub const fn set_state(&mut self, state: BitBoard, score: u32) {
        self.state = state;
        self.score = score;
    }

    /// Resets to an empty board with zero score.
    pub const fn clear(&mut self) {
        self.set_state(BitBoard::EMPTY, 0);
    }

    pub(crate) const fn place_tiles(&mut self, state: BitBoard) {
        self.state = state;
    }

    /// Slides all tiles in `direction` and adds the merge reward to the score.
    ///
    /// Returns `false` and leaves the board untouched when the move changes
    /// nothing.
    pub fn slide(&mut self, direction: Direction) -> bool {
        let Some((state, reward)) = self.preview(direction) else {
            return false;
        };
        self.state = state;
        self.score += reward;
        true
    }

    /// Returns `true` if sliding in `direction` would change the board.
    #[must_use]
    pub fn can_slide(&self, direction: Direction) -> bool {
        self.preview(direction).is_some()
    }

    /// Returns `true` when no direction changes the board.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        !Direction::ALL.into_iter().any(|d| self.can_slide(d))
    }

    /// Returns the tile values (not exponents) as a grid, row 0 first.
    #[must_use]
    pub fn grid(&self) -> [[u32; BOARD_SIZE]; BOARD_SIZE] {
        let mut grid = [[0; BOARD_SIZE]; BOARD_SIZE];
        for (row, cells) in grid.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = tile_value(self.state.tile(row, col));
            }
        }
        grid
    }

    /// Returns the value of the largest tile (`0` on an empty board).
    #[must_use]
    pub fn max_tile(&self) -> u32 {
        tile_value(self.state.max_exponent())
    }

    fn preview(&self, direction: Direction) -> Option<(BitBoard, u32)> {
        let table = RowTable::get();
        let lines = if direction.is_vertical() {
            self.state.transpose()
        } else {
            self.state
        };

        let mut moved_rows = [0; BOARD_SIZE];
        let mut reward = 0;
        for (moved, row) in moved_rows.iter_mut().zip(lines.rows()) {
            let (new_row, row_reward) = if direction.is_toward_start() {
                table.slide_left(row)
            } else {
                table.slide_right(row)
            };
            *moved = new_row;
            reward += row_reward;
        }

        let mut state = BitBoard::from_rows(moved_rows);
        if direction.is_vertical() {
            state = state.transpose();
        }
        (state != self.state).then_some((state, reward))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(art: &str) -> GameBoard {
        GameBoard::from_state(BitBoard::from_ascii(art), 0)
    }

    #[test]
    fn test_slide_left_merge() {
        let mut board = board(
            r"
            2 2 . .
            . . . .
            . . . .
            . . . .
            ",
        );
        assert!(board.slide(Direction::Left));
        assert_eq!(board.state().tile(0, 0), 2);
        assert_eq!(board.state().empty_count(), 15);
        assert_eq!(board.score(), 4);
    }

    #[test]
    fn test_no_double_merge() {
        let mut board = board(
            r"
            4 2 2 .
            . . . .
            . . . .
            . . . .
            ",
        );
        assert!(board.slide(Direction::Left));
        assert_eq!(board.grid()[0], [4, 4, 0, 0]);
        assert_eq!(board.score(), 4);
    }

    #[test]
    fn test_slide_up_uses_columns() {
        let mut board = board(
            r"
            . . . .
            . . . .
            2 . . .
            2 . . 8
            ",
        );
        assert!(board.slide(Direction::Up));
        assert_eq!(
            board.grid(),
            [[4, 0, 0, 8], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]
        );
        assert_eq!(board.score(), 4);
    }

    #[test]
    fn test_slide_down_and_right() {
        let mut board = board(
            r"
            2 . . .
            2 . . .
            . . . .
            . 4 4 .
            ",
        );
        assert!(board.slide(Direction::Down));
        assert_eq!(board.grid()[3], [4, 4, 4, 0]);
        assert!(board.slide(Direction::Right));
        assert_eq!(board.grid()[3], [0, 0, 4, 8]);
        assert_eq!(board.score(), 4 + 8);
    }

    #[test]
    fn test_unchanged_slide_is_rejected() {
        let mut board = board(
            r"
            2 4 . .
            . . . .
            . . . .
            . . . .
            ",
        );
        let before = board;
        assert!(!board.slide(Direction::Left));
        assert!(!board.slide(Direction::Up));
        assert_eq!(board, before);
        assert!(board.can_slide(Direction::Right));
        assert!(board.can_slide(Direction::Down));
    }

    #[test]
    fn test_game_over_check() {
        // checkerboard: nothing can move or merge
        let mut board = board(
            r"
            2 4 2 4
            4 2 4 2
            2 4 2 4
            4 2 4 2
            ",
        );
        assert!(board.is_game_over());

        let state = board.state().with_tile(0, 1, 1);
        board.set_state(state, board.score());
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_grid_and_max_tile() {
        let board = board(
            r"
            . . . .
            . 1024 . .
            . . . .
            . . . 2
            ",
        );
        assert_eq!(board.grid()[1][1], 1024);
        assert_eq!(board.max_tile(), 1024);
        assert_eq!(GameBoard::new().max_tile(), 0);
    }
}

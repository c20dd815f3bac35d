use crate::core::{bit_board::BitBoard, direction::Direction};

use super::{GameStats, game_board::GameBoard, tile_spawner::TileSpawner};

/// Number of tiles placed on the board at the start of a game.
pub const INITIAL_TILES: usize = 2;

/// A single game: board, tile spawning and statistics.
///
/// # Example
///
/// ```
/// use tdl2048_engine::{Direction, GameSession};
///
/// let mut session = GameSession::with_seed(0);
/// assert_eq!(session.board().state().empty_count(), 14);
///
/// if session.play(Direction::Left) {
///     assert_eq!(session.stats().moves(), 1);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: GameBoard,
    spawner: TileSpawner,
    stats: GameStats,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starts a new game seeded from the OS's random data source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_spawner(TileSpawner::new())
    }

    /// Starts a new game whose tile sequence is determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_spawner(TileSpawner::with_seed(seed))
    }

    fn with_spawner(spawner: TileSpawner) -> Self {
        let mut session = Self {
            board: GameBoard::new(),
            spawner,
            stats: GameStats::new(),
        };
        session.reset();
        session
    }

    /// Clears the board and score, then spawns the initial tiles.
    pub fn reset(&mut self) {
        self.board.clear();
        self.stats = GameStats::new();
        for _ in 0..INITIAL_TILES {
            self.spawn_tile();
        }
        self.stats.observe(&self.board);
    }

    #[must_use]
    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    #[must_use]
    pub fn state(&self) -> BitBoard {
        self.board.state()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.board.score()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    /// Plays one move.
    ///
    /// Slides the board and, if anything changed, spawns a new tile. Returns
    /// whether the board changed; an ineffective move leaves the session
    /// untouched.
    pub fn play(&mut self, direction: Direction) -> bool {
        if !self.board.slide(direction) {
            return false;
        }
        self.spawn_tile();
        self.stats.complete_move(&self.board);
        true
    }

    fn spawn_tile(&mut self) {
        if let Some(state) = self.spawner.spawn(self.board.state()) {
            self.board.place_tiles(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_spawns_two_tiles() {
        let mut session = GameSession::with_seed(5);
        assert_eq!(session.state().empty_count(), 14);
        assert_eq!(session.score(), 0);

        while !session.is_game_over() {
            Direction::ALL.into_iter().any(|d| session.play(d));
        }
        session.reset();
        assert_eq!(session.state().empty_count(), 14);
        assert_eq!(session.score(), 0);
        assert_eq!(session.stats().moves(), 0);
    }

    #[test]
    fn test_effective_move_spawns_tile() {
        let mut session = GameSession::with_seed(11);
        let direction = Direction::ALL
            .into_iter()
            .find(|d| session.board().can_slide(*d))
            .unwrap();
        let mut expected = *session.board();
        expected.slide(direction);

        assert!(session.play(direction));
        assert_eq!(
            session.state().empty_count(),
            expected.state().empty_count() - 1
        );
        assert_eq!(session.score(), expected.score());
        assert_eq!(session.stats().moves(), 1);
    }

    #[test]
    fn test_ineffective_move_changes_nothing() {
        let mut session = GameSession::with_seed(2);
        let blocked = Direction::ALL
            .into_iter()
            .find(|d| !session.board().can_slide(*d));
        // two fresh tiles can always move somewhere, but not always everywhere
        if let Some(direction) = blocked {
            let before = *session.board();
            assert!(!session.play(direction));
            assert_eq!(*session.board(), before);
            assert_eq!(session.stats().moves(), 0);
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let play = |seed| {
            let mut session = GameSession::with_seed(seed);
            while !session.is_game_over() {
                Direction::ALL.into_iter().any(|d| session.play(d));
            }
            (session.state(), *session.stats())
        };
        assert_eq!(play(21), play(21));
    }
}

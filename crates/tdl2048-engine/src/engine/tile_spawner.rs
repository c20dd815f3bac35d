use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64Mcg;

use crate::core::bit_board::BitBoard;

/// Probability that a spawned tile is a 4 instead of a 2.
pub const FOUR_TILE_PROBABILITY: f64 = 0.1;

/// Places new tiles on empty cells.
///
/// Uses a PCG generator so that a fixed seed reproduces a whole game.
#[derive(Debug, Clone)]
pub struct TileSpawner {
    rng: Pcg64Mcg,
}

impl Default for TileSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSpawner {
    /// Creates a new [`TileSpawner`].
    ///
    /// The random seed is initialized from the OS's random data source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Pcg64Mcg::from_os_rng(),
        }
    }

    /// Creates a spawner whose tile sequence is fully determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Returns `board` with one new tile on a uniformly chosen empty cell.
    ///
    /// The tile is a 2 with probability 0.9 and a 4 otherwise. Returns `None`
    /// if the board has no empty cell.
    pub fn spawn(&mut self, board: BitBoard) -> Option<BitBoard> {
        let empty_count = board.empty_count();
        if empty_count == 0 {
            return None;
        }
        let nth = self.rng.random_range(0..empty_count);
        let cell = board.empty_cells().nth(nth)?;
        let exponent = if self.rng.random_bool(FOUR_TILE_PROBABILITY) {
            2
        } else {
            1
        };
        Some(board.with_tile(cell / 4, cell % 4, exponent))
    }
}

//! Tile reach rates: the share of games whose largest tile was at least a
//! given value.
//!
//! This is the usual way 2048 agents are compared ("reaches 2048 in 95% of
//! games"), since the score alone hides how far games got.

use serde::{Deserialize, Serialize};

/// Smallest tile value listed in reach tables.
pub const MIN_REPORTED_TILE: u32 = 128;

/// Distribution of the largest tile over a batch of games.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileReach {
    games: usize,
    /// `(tile value, games whose max tile equals it)`, ascending by value.
    max_tile_counts: Vec<(u32, usize)>,
}

impl TileReach {
    /// Builds the distribution from each game's largest tile value.
    #[must_use]
    pub fn from_max_tiles<I>(max_tiles: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut reach = Self::default();
        for tile in max_tiles {
            reach.record(tile);
        }
        reach
    }

    /// Adds one finished game.
    pub fn record(&mut self, max_tile: u32) {
        self.games += 1;
        match self
            .max_tile_counts
            .binary_search_by_key(&max_tile, |&(tile, _)| tile)
        {
            Ok(i) => self.max_tile_counts[i].1 += 1,
            Err(i) => self.max_tile_counts.insert(i, (max_tile, 1)),
        }
    }

    #[must_use]
    pub fn games(&self) -> usize {
        self.games
    }

    /// Number of games whose largest tile was at least `tile`.
    #[must_use]
    pub fn reached(&self, tile: u32) -> usize {
        self.max_tile_counts
            .iter()
            .filter(|&&(t, _)| t >= tile)
            .map(|&(_, count)| count)
            .sum()
    }

    /// Fraction of games whose largest tile was at least `tile` (`0.0` when
    /// no games were recorded).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn rate(&self, tile: u32) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.reached(tile) as f64 / self.games as f64
    }

    /// Reach rates for every power of two from [`MIN_REPORTED_TILE`] up to
    /// the largest tile seen, ascending.
    #[must_use]
    pub fn rates(&self) -> Vec<(u32, f64)> {
        let Some(&(largest, _)) = self.max_tile_counts.last() else {
            return vec![];
        };
        std::iter::successors(Some(MIN_REPORTED_TILE), |t| t.checked_mul(2))
            .take_while(|&t| t <= largest)
            .map(|t| (t, self.rate(t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let reach = TileReach::default();
        assert_eq!(reach.games(), 0);
        assert_eq!(reach.rate(2048), 0.0);
        assert!(reach.rates().is_empty());
    }

    #[test]
    fn test_reach_is_cumulative() {
        let reach = TileReach::from_max_tiles([128, 256, 1024, 2048, 2048]);
        assert_eq!(reach.games(), 5);
        assert_eq!(reach.reached(128), 5);
        assert_eq!(reach.reached(512), 3);
        assert_eq!(reach.reached(2048), 2);
        assert_eq!(reach.reached(4096), 0);
        assert_eq!(reach.rate(1024), 0.6);
    }

    #[test]
    fn test_rates_table() {
        let reach = TileReach::from_max_tiles([64, 512, 256]);
        assert_eq!(
            reach.rates(),
            vec![(128, 2.0 / 3.0), (256, 2.0 / 3.0), (512, 1.0 / 3.0)]
        );

        let small = TileReach::from_max_tiles([32, 64]);
        assert!(small.rates().is_empty());
    }
}

//! Statistics over batches of played games.
//!
//! - [`descriptive`]: score summaries (min, max, mean, median, spread)
//! - [`percentiles`]: nearest-rank percentiles of a score sample
//! - [`tile_reach`]: how often games reached each tile value
//!
//! # Examples
//!
//! ```
//! use tdl2048_stats::{descriptive::DescriptiveStats, tile_reach::TileReach};
//!
//! let scores = [1200.0, 3400.0, 2800.0];
//! let stats = DescriptiveStats::new(scores).unwrap();
//! assert_eq!(stats.max, 3400.0);
//!
//! let reach = TileReach::from_max_tiles([256, 512, 512]);
//! assert_eq!(reach.rate(512), 2.0 / 3.0);
//! ```

pub mod descriptive;
pub mod percentiles;
pub mod tile_reach;

//! Game rules and session management.
//!
//! This module builds the playable game on top of the packed [`BitBoard`]
//! codec:
//!
//! - [`GameBoard`] - Board plus score; deterministic slides (afterstates)
//! - [`TileSpawner`] - Random tile placement after each effective move
//! - [`GameSession`] - One game from reset to game over, with statistics
//! - [`GameStats`] - Moves played, score and largest tile
//!
//! # Game Flow
//!
//! 1. [`GameSession::reset`] clears the board and spawns two tiles
//! 2. The player picks a [`Direction`]
//! 3. [`GameSession::play`] slides the board; if anything moved, a new tile
//!    (2 with probability 0.9, otherwise 4) appears on a random empty cell
//! 4. Repeat until no direction changes the board
//!
//! Searching agents work on [`GameBoard`] copies: [`GameBoard::slide`] never
//! spawns, so the board it leaves behind is exactly the afterstate of the move.
//!
//! # Example
//!
//! ```
//! use tdl2048_engine::{Direction, GameSession};
//!
//! let mut session = GameSession::with_seed(42);
//!
//! while !session.is_game_over() {
//!     let moved = Direction::ALL
//!         .into_iter()
//!         .any(|direction| session.play(direction));
//!     assert!(moved);
//! }
//!
//! println!("Final score: {}", session.stats().score());
//! ```
//!
//! [`BitBoard`]: crate::BitBoard
//! [`Direction`]: crate::Direction

pub use self::{game_board::*, game_session::*, game_stats::*, tile_spawner::*};

mod game_board;
mod game_session;
mod game_stats;
mod tile_spawner;

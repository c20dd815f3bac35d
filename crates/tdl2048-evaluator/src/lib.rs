//! Value-function engine and greedy agent for 2048.
//!
//! This crate implements a two-level evaluation architecture:
//!
//! 1. **State Evaluation** ([`state_evaluator`], [`tuple_network`]) - Scores a
//!    packed board with an n-tuple network: a sum of weight-table lookups, one
//!    per row, column and (optionally) 2x2 square of the board.
//!
//! 2. **Move Selection** ([`afterstate_agent`]) - Tries all four directions on a
//!    scratch board and picks the one maximizing `reward + value(afterstate)`.
//!
//! # Architecture
//!
//! ```text
//! Move Selection (greedy 1-ply afterstate search)
//!     ↓ uses
//! State Evaluation (tuple network)
//!     ↓ uses
//! Tuple Features (16-bit keys extracted from the packed board)
//! ```
//!
//! # Supporting Modules
//!
//! - [`tuple_feature`] - Which table entries a board touches
//! - [`binary_weights`] - Fixed little-endian export layout read by programs
//!   that only evaluate
//!
//! # Linear Evaluation Model
//!
//! The value is a plain sum of independent lookups, so its gradient with
//! respect to every active weight is exactly 1. Learning therefore reduces to
//! adding the same correction to each active entry
//! ([`TupleNetwork::update`](tuple_network::TupleNetwork::update)).
//!
//! # Example
//!
//! ```
//! use tdl2048_engine::GameSession;
//! use tdl2048_evaluator::{
//!     afterstate_agent::GreedyAgent, tuple_feature::FeatureSet, tuple_network::TupleNetwork,
//! };
//!
//! let network = TupleNetwork::new(FeatureSet::RowsAndSquares);
//! let mut agent = GreedyAgent::new();
//! let mut session = GameSession::with_seed(1);
//!
//! if let Some(choice) = agent.select_move(&network, session.board()) {
//!     assert!(session.play(choice.direction()));
//! }
//! ```
//!
//! # Current Limitations
//!
//! - **Greedy search**: only the immediate afterstate is scored; random tile
//!   placement is never searched.
//! - **Fixed tuples**: rows, columns and 2x2 squares only; no larger or
//!   symmetric-sampled tuples.

pub mod afterstate_agent;
pub mod binary_weights;
pub mod state_evaluator;
pub mod tuple_feature;
pub mod tuple_network;

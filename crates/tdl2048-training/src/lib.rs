//! Training system for the tuple-network value function.
//!
//! The network learns by playing against itself: the greedy agent chooses
//! moves with the current weights, and temporal-difference updates pull each
//! afterstate value toward the reward and value that followed it.
//!
//! # Architecture
//!
//! ```text
//! Snapshot (JSON, resumable)
//!     ↓ load_or_init
//! TupleNetwork (tdl2048-evaluator)
//!     ↓ played by GreedyAgent, corrected by
//! TdTrainer (TD(0) over afterstates)
//!     ↓ checkpoint every log interval
//! Snapshot
//!     ↓ export_binary
//! Fixed binary weights file
//! ```
//!
//! # Modules
//!
//! - [`td_learning`] - The episode loop and the TD update
//! - [`snapshot`] - Saving and resuming training state
//! - [`export`] - Snapshot to binary conversion
//!
//! # Example
//!
//! ```
//! use tdl2048_engine::GameSession;
//! use tdl2048_evaluator::{tuple_feature::FeatureSet, tuple_network::TupleNetwork};
//! use tdl2048_training::td_learning::TdTrainer;
//!
//! let mut network = TupleNetwork::new(FeatureSet::RowsAndSquares);
//! let mut session = GameSession::with_seed(0);
//! let mut trainer = TdTrainer::new(0.0025);
//!
//! let stats = trainer.train_episode(&mut network, &mut session);
//! assert!(session.is_game_over());
//! assert!(stats.moves() > 0);
//! ```
//!
//! # Current Limitations
//!
//! - **Single-threaded**: episodes run one after another on one network.
//! - **Fixed learning rate**: no decay schedule.
//! - **No exploration**: the agent is always greedy; random tile spawns are
//!   the only source of variety.

pub mod export;
mod replace_file;
pub mod snapshot;
pub mod td_learning;

//! State evaluation: estimating the future score of a board.
//!
//! [`StateEvaluator`] is the seam between move selection and the value model.
//! The agent only needs "how good is this afterstate?"; the main
//! implementation is [`TupleNetwork`](crate::tuple_network::TupleNetwork).

use std::fmt;

use tdl2048_engine::BitBoard;

/// Estimates the expected future score reachable from a board.
pub trait StateEvaluator: fmt::Debug {
    /// Returns the value estimate of `state` (higher is better).
    ///
    /// Must be a pure function of `state` and the evaluator's current
    /// parameters.
    fn evaluate_state(&self, state: BitBoard) -> f32;
}

/// Evaluator that scores every board as zero.
///
/// With it the greedy agent maximizes only the immediate merge reward.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroEvaluator;

impl StateEvaluator for ZeroEvaluator {
    fn evaluate_state(&self, _state: BitBoard) -> f32 {
        0.0
    }
}

//! Move selection: choosing the direction with the best afterstate.
//!
//! # How It Works
//!
//! For each direction in [`Direction::ALL`] (Up, Down, Left, Right):
//!
//! 1. **Simulate** - Copy the board into a private scratch board and slide it
//!    (no tile spawn, so the result is the afterstate).
//! 2. **Skip** - Directions that change nothing are illegal.
//! 3. **Score** - `total = merge reward + evaluator(afterstate)`.
//! 4. **Select** - Keep the direction with the highest total; on ties the
//!    earlier direction wins (strict `>` comparison).
//!
//! If no direction changes the board the agent returns `None`. That is the
//! terminal signal, not an error: callers stop the episode.
//!
//! # Design: Greedy One-Step Lookahead
//!
//! Only the immediate afterstate is scored. The random tile that follows is
//! never searched; the value function is expected to account for it on
//! average.
//!
//! # Usage
//!
//! ```
//! use tdl2048_engine::GameSession;
//! use tdl2048_evaluator::{
//!     afterstate_agent::GreedyAgent, tuple_feature::FeatureSet, tuple_network::TupleNetwork,
//! };
//!
//! let network = TupleNetwork::new(FeatureSet::Rows);
//! let mut agent = GreedyAgent::new();
//! let mut session = GameSession::with_seed(3);
//!
//! let stats = agent.play_session(&network, &mut session, Some(50));
//! assert!(stats.moves() <= 50);
//! ```

use tdl2048_engine::{Direction, GameBoard, GameSession, GameStats};

use crate::state_evaluator::StateEvaluator;

/// The move an agent picked, with the numbers that justified it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveChoice {
    direction: Direction,
    afterstate: GameBoard,
    reward: u32,
    value: f32,
}

impl MoveChoice {
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Board and score right after the slide, before any tile spawns.
    #[must_use]
    pub fn afterstate(&self) -> &GameBoard {
        &self.afterstate
    }

    /// Score gained by the merges of this move.
    #[must_use]
    pub fn reward(&self) -> u32 {
        self.reward
    }

    /// Evaluator estimate of the afterstate.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// `reward + value`, the quantity the agent maximizes.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn total_value(&self) -> f32 {
        self.reward as f32 + self.value
    }
}

/// Greedy one-ply afterstate agent.
///
/// Holds only a scratch board, reused across decisions. The evaluator is
/// passed per call so the caller keeps ownership (and can train it between
/// moves).
#[derive(Debug, Clone, Default)]
pub struct GreedyAgent {
    scratch: GameBoard,
}

impl GreedyAgent {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scratch: GameBoard::new(),
        }
    }

    /// Selects the best move for `board`.
    ///
    /// Returns `None` if no direction changes the board. `board` itself is
    /// never modified.
    ///
    /// A legal move is always returned when one exists, even if the evaluator
    /// yields non-finite values.
    pub fn select_move<E>(&mut self, evaluator: &E, board: &GameBoard) -> Option<MoveChoice>
    where
        E: StateEvaluator + ?Sized,
    {
        let mut best: Option<MoveChoice> = None;

        for direction in Direction::ALL {
            self.scratch.set_state(board.state(), board.score());
            if !self.scratch.slide(direction) {
                continue;
            }
            let choice = MoveChoice {
                direction,
                afterstate: self.scratch,
                reward: self.scratch.score() - board.score(),
                value: evaluator.evaluate_state(self.scratch.state()),
            };
            let improves = best
                .as_ref()
                .is_none_or(|b| choice.total_value() > b.total_value());
            if improves {
                best = Some(choice);
            }
        }

        best
    }

    /// Plays `session` greedily until the game ends or `move_limit` moves
    /// have been made, without learning.
    pub fn play_session<E>(
        &mut self,
        evaluator: &E,
        session: &mut GameSession,
        move_limit: Option<usize>,
    ) -> GameStats
    where
        E: StateEvaluator + ?Sized,
    {
        while move_limit.is_none_or(|limit| session.stats().moves() < limit) {
            if session.is_game_over() {
                break;
            }
            let Some(choice) = self.select_move(evaluator, session.board()) else {
                break;
            };
            let moved = session.play(choice.direction());
            debug_assert!(moved, "selected move must change the board");
        }
        *session.stats()
    }
}

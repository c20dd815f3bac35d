//! Temporal-difference learning over afterstates.
//!
//! # How It Works
//!
//! Each episode is one game played by the greedy agent with the network being
//! trained. After every move the agent picks, the value of the *previous*
//! afterstate is pulled toward what actually followed it:
//!
//! ```text
//! delta = (reward' + V(afterstate')) - V(afterstate)
//! V(afterstate) += learning_rate * delta       (every active lookup)
//! ```
//!
//! where `reward'` and `afterstate'` belong to the next move. When the game
//! ends, the last afterstate has no successor and its target is `0`.
//!
//! The target reuses the value the agent already computed while choosing the
//! move, so every decision costs four evaluations plus one for the update.
//!
//! # Checkpoints
//!
//! [`TdTrainer::run`] reports every `log_interval` episodes through a callback
//! that also receives the network, so the caller can log progress and save a
//! snapshot at the same cadence.

use std::{
    fmt,
    time::{Duration, Instant},
};

use tdl2048_engine::{BitBoard, GameSession, GameStats};
use tdl2048_evaluator::{afterstate_agent::GreedyAgent, tuple_network::TupleNetwork};
use tdl2048_stats::{descriptive::DescriptiveStats, tile_reach::TileReach};

pub const DEFAULT_EPISODES: usize = 10_000;
pub const DEFAULT_LEARNING_RATE: f32 = 0.0025;
pub const DEFAULT_LOG_INTERVAL: usize = 100;

/// Training loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingParams {
    /// Episodes to play in this run.
    pub episodes: usize,
    /// Report (and checkpoint) every this many episodes. `0` reports only
    /// at the end.
    pub log_interval: usize,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            episodes: DEFAULT_EPISODES,
            log_interval: DEFAULT_LOG_INTERVAL,
        }
    }
}

/// Progress over the episodes since the previous report.
#[derive(Debug, Clone)]
pub struct IntervalReport {
    /// Episodes finished in this run so far.
    pub episode: usize,
    pub total_episodes: usize,
    /// Scores of the episodes in this interval.
    pub interval_stats: DescriptiveStats,
    /// Best score of the run so far.
    pub max_score: u32,
    /// Score of the most recent episode.
    pub last_score: u32,
    /// Wall time spent on this interval.
    pub elapsed: Duration,
}

impl IntervalReport {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ms_per_game(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0 / self.interval_stats.count as f64
    }
}

impl fmt::Display for IntervalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Episode {}/{} | Mean: {:.1} | Max: {} | Last: {} | Speed: {:.2}ms/game",
            self.episode,
            self.total_episodes,
            self.interval_stats.mean,
            self.max_score,
            self.last_score,
            self.ms_per_game(),
        )
    }
}

/// Results of a whole training run.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub episodes: usize,
    /// `None` when no episode was played.
    pub score_stats: Option<DescriptiveStats>,
    pub tile_reach: TileReach,
    pub elapsed: Duration,
}

/// TD(0) afterstate learner.
#[derive(Debug, Clone)]
pub struct TdTrainer {
    agent: GreedyAgent,
    learning_rate: f32,
}

impl TdTrainer {
    #[must_use]
    pub fn new(learning_rate: f32) -> Self {
        Self {
            agent: GreedyAgent::new(),
            learning_rate,
        }
    }

    /// Plays one game from a fresh board, updating `network` after every move.
    pub fn train_episode(
        &mut self,
        network: &mut TupleNetwork,
        session: &mut GameSession,
    ) -> GameStats {
        session.reset();
        let mut previous: Option<BitBoard> = None;

        while let Some(choice) = self.agent.select_move(&*network, session.board()) {
            if let Some(afterstate) = previous {
                let delta = choice.total_value() - network.evaluate(afterstate);
                network.update(afterstate, delta, self.learning_rate);
            }
            let moved = session.play(choice.direction());
            debug_assert!(moved, "selected move must change the board");
            previous = Some(choice.afterstate().state());
        }

        if let Some(afterstate) = previous {
            let delta = -network.evaluate(afterstate);
            network.update(afterstate, delta, self.learning_rate);
        }

        *session.stats()
    }

    /// Trains for `params.episodes` episodes.
    ///
    /// `on_interval` runs every `params.log_interval` episodes and once more
    /// after the last episode if it did not fall on an interval boundary. An
    /// error from the callback stops training.
    pub fn run<F, E>(
        &mut self,
        network: &mut TupleNetwork,
        session: &mut GameSession,
        params: &TrainingParams,
        mut on_interval: F,
    ) -> Result<TrainingSummary, E>
    where
        F: FnMut(&IntervalReport, &TupleNetwork) -> Result<(), E>,
    {
        let run_start = Instant::now();
        let mut interval_start = run_start;
        let mut interval_scores = Vec::new();
        let mut all_scores = Vec::with_capacity(params.episodes);
        let mut tile_reach = TileReach::default();
        let mut max_score = 0;

        for episode in 1..=params.episodes {
            let stats = self.train_episode(network, session);
            max_score = max_score.max(stats.score());
            interval_scores.push(stats.score());
            all_scores.push(stats.score());
            tile_reach.record(stats.max_tile());

            let boundary = params.log_interval > 0 && episode % params.log_interval == 0;
            if boundary || episode == params.episodes {
                let Some(interval_stats) = DescriptiveStats::from_scores(interval_scores.drain(..))
                else {
                    continue;
                };
                let report = IntervalReport {
                    episode,
                    total_episodes: params.episodes,
                    interval_stats,
                    max_score,
                    last_score: stats.score(),
                    elapsed: interval_start.elapsed(),
                };
                on_interval(&report, &*network)?;
                interval_start = Instant::now();
            }
        }

        Ok(TrainingSummary {
            episodes: params.episodes,
            score_stats: DescriptiveStats::from_scores(all_scores),
            tile_reach,
            elapsed: run_start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use tdl2048_evaluator::tuple_feature::FeatureSet;

    use super::*;

    #[test]
    fn test_episode_changes_weights() {
        let mut network = TupleNetwork::new(FeatureSet::RowsAndSquares);
        let mut session = GameSession::with_seed(1);
        let mut trainer = TdTrainer::new(DEFAULT_LEARNING_RATE);

        let stats = trainer.train_episode(&mut network, &mut session);
        assert!(stats.moves() > 0);
        assert!(session.is_game_over());
        assert_ne!(network, TupleNetwork::new(FeatureSet::RowsAndSquares));
    }

    #[test]
    fn test_zero_learning_rate_keeps_weights() {
        let mut network = TupleNetwork::new(FeatureSet::Rows);
        let mut session = GameSession::with_seed(4);
        let mut trainer = TdTrainer::new(0.0);
        trainer.train_episode(&mut network, &mut session);
        assert_eq!(network, TupleNetwork::new(FeatureSet::Rows));
    }

    #[test]
    fn test_same_seed_same_training() {
        let train = || {
            let mut network = TupleNetwork::new(FeatureSet::RowsAndSquares);
            let mut session = GameSession::with_seed(99);
            let mut trainer = TdTrainer::new(0.01);
            for _ in 0..3 {
                trainer.train_episode(&mut network, &mut session);
            }
            network
        };
        assert_eq!(train(), train());
    }

    #[test]
    fn test_run_reports_each_interval() {
        let mut network = TupleNetwork::new(FeatureSet::Rows);
        let mut session = GameSession::with_seed(7);
        let mut trainer = TdTrainer::new(DEFAULT_LEARNING_RATE);
        let params = TrainingParams {
            episodes: 7,
            log_interval: 3,
        };

        let mut reports = Vec::new();
        let summary = trainer
            .run(&mut network, &mut session, &params, |report, _| {
                reports.push((report.episode, report.interval_stats.count));
                Ok::<_, Infallible>(())
            })
            .unwrap();

        assert_eq!(reports, vec![(3, 3), (6, 3), (7, 1)]);
        assert_eq!(summary.episodes, 7);
        assert_eq!(summary.tile_reach.games(), 7);
        let score_stats = summary.score_stats.unwrap();
        assert_eq!(score_stats.count, 7);
        assert!(score_stats.max >= score_stats.min);
    }

    #[test]
    fn test_run_stops_on_callback_error() {
        let mut network = TupleNetwork::new(FeatureSet::Rows);
        let mut session = GameSession::with_seed(7);
        let mut trainer = TdTrainer::new(DEFAULT_LEARNING_RATE);
        let params = TrainingParams {
            episodes: 10,
            log_interval: 2,
        };

        let mut calls = 0;
        let result = trainer.run(&mut network, &mut session, &params, |_, _| {
            calls += 1;
            Err("disk full")
        });
        assert_eq!(result.unwrap_err(), "disk full");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_report_line() {
        let report = IntervalReport {
            episode: 100,
            total_episodes: 10_000,
            interval_stats: DescriptiveStats::from_scores([1000, 3000]).unwrap(),
            max_score: 3000,
            last_score: 1000,
            elapsed: Duration::from_millis(50),
        };
        assert_eq!(
            report.to_string(),
            "Episode 100/10000 | Mean: 2000.0 | Max: 3000 | Last: 1000 | Speed: 25.00ms/game"
        );
    }
}

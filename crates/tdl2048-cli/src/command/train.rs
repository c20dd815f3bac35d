use std::path::PathBuf;

use anyhow::Context;
use tdl2048_engine::GameSession;
use tdl2048_evaluator::tuple_feature::FeatureSet;
use tdl2048_training::{
    snapshot::{self, Snapshot, TrainingOrigin},
    td_learning::{
        DEFAULT_EPISODES, DEFAULT_LEARNING_RATE, DEFAULT_LOG_INTERVAL, TdTrainer, TrainingParams,
    },
};

use crate::util::{DEFAULT_SNAPSHOT_PATH, FeatureSetArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Snapshot file to resume from and save to
    #[arg(long, default_value = DEFAULT_SNAPSHOT_PATH)]
    snapshot: PathBuf,
    /// Number of games to play
    #[arg(long, default_value_t = DEFAULT_EPISODES)]
    episodes: usize,
    /// TD learning rate (alpha)
    #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
    learning_rate: f32,
    /// Log progress and save the snapshot every this many games
    #[arg(long, default_value_t = DEFAULT_LOG_INTERVAL)]
    log_interval: usize,
    /// Tuple families to learn
    #[arg(long, value_enum, default_value_t = FeatureSetArg::default())]
    features: FeatureSetArg,
    /// Seed for tile spawns (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        snapshot: snapshot_path,
        episodes,
        learning_rate,
        log_interval,
        features,
        seed,
    } = arg;
    let feature_set = FeatureSet::from(*features);

    let (mut network, origin) = snapshot::load_or_init(snapshot_path, feature_set)
        .with_context(|| format!("Failed to load snapshot: {}", snapshot_path.display()))?;
    match &origin {
        TrainingOrigin::Resumed { episodes } => eprintln!(
            "Resuming from {} ({episodes} episodes trained)",
            snapshot_path.display()
        ),
        TrainingOrigin::ColdStart { reason } => {
            eprintln!("Starting from zero weights: {reason}");
        }
    }
    let previous_episodes = origin.previous_episodes();

    eprintln!("Start training {episodes} episodes...");
    eprintln!("  Features: {feature_set}");
    eprintln!("  Learning rate: {learning_rate}");

    let mut session = seed.map_or_else(GameSession::new, GameSession::with_seed);
    let mut trainer = TdTrainer::new(*learning_rate);
    let params = TrainingParams {
        episodes: *episodes,
        log_interval: *log_interval,
    };
    let summary = trainer.run(&mut network, &mut session, &params, |report, network| {
        eprintln!("{report}");
        Snapshot::from_network(network, previous_episodes + report.episode, *learning_rate)
            .write(snapshot_path)
            .with_context(|| format!("Failed to save snapshot: {}", snapshot_path.display()))
    })?;

    eprintln!();
    eprintln!("Training completed");
    eprintln!("  Snapshot: {}", snapshot_path.display());
    eprintln!(
        "  Episodes: {} (total {})",
        summary.episodes,
        previous_episodes + summary.episodes
    );
    if let Some(stats) = &summary.score_stats {
        eprintln!("  Mean score: {:.1}", stats.mean);
        eprintln!("  Max score:  {:.0}", stats.max);
    }
    for (tile, rate) in summary.tile_reach.rates() {
        eprintln!("  Reached {tile:>5}: {:5.1}%", rate * 100.0);
    }
    eprintln!("  Elapsed: {:.1}s", summary.elapsed.as_secs_f64());

    Ok(())
}

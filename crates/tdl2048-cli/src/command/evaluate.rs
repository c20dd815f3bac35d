use std::{path::PathBuf, time::Instant};

use serde::Serialize;
use tdl2048_engine::GameSession;
use tdl2048_evaluator::{afterstate_agent::GreedyAgent, tuple_feature::FeatureSet};
use tdl2048_stats::{
    descriptive::DescriptiveStats,
    percentiles::{Percentiles, SCORE_PERCENTILES},
    tile_reach::TileReach,
};

use crate::util::{Output, WeightSourceArg};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    #[clap(flatten)]
    source: WeightSourceArg,
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,
    /// Seed for tile spawns (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop each game after this many moves
    #[arg(long)]
    move_limit: Option<usize>,
    /// JSON report file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EvaluationReport {
    weights: String,
    feature_set: FeatureSet,
    games: usize,
    move_limit: Option<usize>,
    score: Option<DescriptiveStats>,
    score_percentiles: Percentiles,
    moves: Option<DescriptiveStats>,
    /// `(tile, share of games reaching it)`
    tile_reach: Vec<(u32, f64)>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        source,
        games,
        seed,
        move_limit,
        output,
    } = arg;

    let (network, weights) = source.load()?;
    eprintln!("Evaluating {weights}");
    eprintln!("  Features: {}", network.feature_set());
    eprintln!("  Games: {games}");

    let mut agent = GreedyAgent::new();
    let mut session = seed.map_or_else(GameSession::new, GameSession::with_seed);
    let mut scores = Vec::with_capacity(*games);
    let mut moves = Vec::with_capacity(*games);
    let mut tile_reach = TileReach::default();
    let start = Instant::now();

    for _ in 0..*games {
        session.reset();
        let stats = agent.play_session(&network, &mut session, *move_limit);
        scores.push(stats.score());
        moves.push(stats.moves());
        tile_reach.record(stats.max_tile());
    }

    #[expect(clippy::cast_precision_loss)]
    let score_values = scores.iter().map(|&s| s as f32).collect::<Vec<_>>();
    #[expect(clippy::cast_precision_loss)]
    let move_stats = DescriptiveStats::new(moves.iter().map(|&m| m as f32));
    let report = EvaluationReport {
        weights,
        feature_set: network.feature_set(),
        games: *games,
        move_limit: *move_limit,
        score: DescriptiveStats::from_scores(scores.iter().copied()),
        score_percentiles: Percentiles::new(&score_values, &SCORE_PERCENTILES),
        moves: move_stats,
        tile_reach: tile_reach.rates(),
    };

    eprintln!();
    eprintln!("Evaluation completed in {:.1}s", start.elapsed().as_secs_f64());
    if let Some(score) = &report.score {
        eprintln!("  Score: mean {:.1}, median {:.0}, max {:.0}", score.mean, score.median, score.max);
    }
    for (tile, rate) in &report.tile_reach {
        eprintln!("  Reached {tile:>5}: {:5.1}%", rate * 100.0);
    }

    Output::save_json(&report, output.clone())?;
    Ok(())
}

use std::{thread, time::Duration};

use tdl2048_engine::GameSession;
use tdl2048_evaluator::afterstate_agent::GreedyAgent;

use crate::util::WeightSourceArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    #[clap(flatten)]
    source: WeightSourceArg,
    /// Seed for tile spawns (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many moves
    #[arg(long)]
    move_limit: Option<usize>,
    /// Pause between moves in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        source,
        seed,
        move_limit,
        delay_ms,
    } = arg;

    let (network, weights) = source.load()?;
    eprintln!("Playing with {weights}");

    let mut agent = GreedyAgent::new();
    let mut session = seed.map_or_else(GameSession::new, GameSession::with_seed);
    println!("{}", session.state());

    while move_limit.is_none_or(|limit| session.stats().moves() < limit) {
        let Some(choice) = agent.select_move(&network, session.board()) else {
            break;
        };
        session.play(choice.direction());
        println!(
            "Move {}: {} (+{}, value {:.1}) Score: {}",
            session.stats().moves(),
            choice.direction(),
            choice.reward(),
            choice.value(),
            session.score()
        );
        println!("{}", session.state());
        if *delay_ms > 0 {
            thread::sleep(Duration::from_millis(*delay_ms));
        }
    }

    let stats = session.stats();
    eprintln!();
    eprintln!(
        "{}",
        if session.is_game_over() {
            "Game over"
        } else {
            "Move limit reached"
        }
    );
    eprintln!("  Moves: {}", stats.moves());
    eprintln!("  Score: {}", stats.score());
    eprintln!("  Max tile: {}", stats.max_tile());

    Ok(())
}

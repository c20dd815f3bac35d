use clap::{Parser, Subcommand};

use self::{
    auto_play::AutoPlayArg, evaluate::EvaluateArg, export::ExportArg, train::TrainArg,
};

mod auto_play;
mod evaluate;
mod export;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train the tuple network with TD learning, resuming from a snapshot
    Train(#[clap(flatten)] TrainArg),
    /// Convert a training snapshot to the binary weights format
    Export(#[clap(flatten)] ExportArg),
    /// Play many games greedily and report score statistics
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Play one game greedily, printing the board after every move
    AutoPlay(#[clap(flatten)] AutoPlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Export(arg) => export::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_train_defaults() {
        let args = CommandArgs::try_parse_from(["tdl2048", "train"]).unwrap();
        assert!(matches!(args.mode, Mode::Train(_)));

        let args =
            CommandArgs::try_parse_from(["tdl2048", "auto-play", "--binary", "w.bin"]).unwrap();
        assert!(matches!(args.mode, Mode::AutoPlay(_)));

        assert!(CommandArgs::try_parse_from(["tdl2048", "train", "--features", "tiles"]).is_err());
    }
}

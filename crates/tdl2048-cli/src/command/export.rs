use std::path::PathBuf;

use anyhow::Context;
use tdl2048_training::export;

use crate::util::{DEFAULT_BINARY_PATH, DEFAULT_SNAPSHOT_PATH};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ExportArg {
    /// Training snapshot to export
    #[arg(long, default_value = DEFAULT_SNAPSHOT_PATH)]
    snapshot: PathBuf,
    /// Binary weights file to write
    #[arg(long, default_value = DEFAULT_BINARY_PATH)]
    output: PathBuf,
}

pub(crate) fn run(arg: &ExportArg) -> anyhow::Result<()> {
    let ExportArg { snapshot, output } = arg;

    let summary = export::export_binary(snapshot, output).with_context(|| {
        format!(
            "Failed to export {} to {}",
            snapshot.display(),
            output.display()
        )
    })?;

    eprintln!("Weights exported successfully");
    eprintln!("  Source: {}", snapshot.display());
    eprintln!("  Path: {}", output.display());
    eprintln!("  Features: {}", summary.feature_set);
    eprintln!("  Episodes: {}", summary.episodes);
    eprintln!("  Size: {} bytes", summary.bytes);

    Ok(())
}

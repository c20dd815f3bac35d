//! Conversion of a training snapshot to the fixed binary layout
//! (see [`binary_weights`](tdl2048_evaluator::binary_weights)).

use std::{
    io,
    path::{Path, PathBuf},
};

use tdl2048_evaluator::{binary_weights, tuple_feature::FeatureSet};

use crate::{
    replace_file::replace_file,
    snapshot::{Snapshot, SnapshotError},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ExportError {
    #[display("source snapshot not found: {}", path.display())]
    SourceNotFound { path: PathBuf },
    #[display("{_0}")]
    Snapshot(SnapshotError),
    #[display("failed to write {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// What [`export_binary`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub feature_set: FeatureSet,
    pub bytes: usize,
    pub episodes: usize,
}

/// Reads the snapshot at `snapshot_path` and writes its tables to
/// `output_path`.
///
/// Nothing is created when the snapshot does not exist. Missing parent
/// directories of `output_path` are created, and an existing file there is
/// only replaced once the export is complete.
pub fn export_binary<P, Q>(snapshot_path: P, output_path: Q) -> Result<ExportSummary, ExportError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let snapshot = Snapshot::read(snapshot_path).map_err(|err| match err {
        SnapshotError::NotFound { path } => ExportError::SourceNotFound { path },
        err => ExportError::Snapshot(err),
    })?;
    let network = snapshot.to_network().map_err(ExportError::Snapshot)?;

    let output_path = output_path.as_ref();
    replace_file(output_path, |writer| binary_weights::write_binary(&network, writer)).map_err(
        |source| ExportError::Io {
            path: output_path.to_owned(),
            source,
        },
    )?;

    Ok(ExportSummary {
        feature_set: network.feature_set(),
        bytes: binary_weights::exported_len(network.feature_set()),
        episodes: snapshot.episodes,
    })
}

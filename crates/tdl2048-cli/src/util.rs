use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, StdoutLock, Write as _},
    path::PathBuf,
};

use anyhow::Context;
use tdl2048_evaluator::{binary_weights, tuple_feature::FeatureSet, tuple_network::TupleNetwork};
use tdl2048_training::snapshot::Snapshot;

pub const DEFAULT_SNAPSHOT_PATH: &str = "weights/snapshot.json";
pub const DEFAULT_BINARY_PATH: &str = "weights/tuple_weights.bin";

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Command line spelling of [`FeatureSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FeatureSetArg {
    /// Rows and columns only
    Rows,
    /// Rows, columns and 2x2 squares
    #[default]
    RowsAndSquares,
}

impl From<FeatureSetArg> for FeatureSet {
    fn from(arg: FeatureSetArg) -> Self {
        match arg {
            FeatureSetArg::Rows => FeatureSet::Rows,
            FeatureSetArg::RowsAndSquares => FeatureSet::RowsAndSquares,
        }
    }
}

/// Where a playing command loads its weights from.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct WeightSourceArg {
    /// Training snapshot to play with
    #[arg(long, default_value = DEFAULT_SNAPSHOT_PATH)]
    snapshot: PathBuf,
    /// Exported binary weights to play with instead of the snapshot
    #[arg(long)]
    binary: Option<PathBuf>,
    /// Table layout of the binary weights file
    #[arg(long, value_enum, default_value_t = FeatureSetArg::default())]
    features: FeatureSetArg,
}

impl WeightSourceArg {
    /// Loads the network, returning it with a description of its origin.
    pub(crate) fn load(&self) -> anyhow::Result<(TupleNetwork, String)> {
        if let Some(path) = &self.binary {
            let file = File::open(path)
                .with_context(|| format!("Failed to open binary weights: {}", path.display()))?;
            let network =
                binary_weights::read_binary(&mut BufReader::new(file), self.features.into())
                    .with_context(|| {
                        format!(
                            "Failed to read binary weights as {}: {}",
                            FeatureSet::from(self.features),
                            path.display()
                        )
                    })?;
            return Ok((network, path.display().to_string()));
        }

        let path = &self.snapshot;
        let snapshot = Snapshot::read(path)
            .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;
        let network = snapshot.to_network()?;
        let description = format!(
            "{} ({} episodes, trained at {})",
            path.display(),
            snapshot.episodes,
            snapshot.trained_at
        );
        Ok((network, description))
    }
}

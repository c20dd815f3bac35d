//! Training snapshots: JSON files holding the weight tables between runs.
//!
//! # Format
//!
//! ```json
//! {
//!   "trained_at": "2025-01-01T00:00:00Z",
//!   "episodes": 12000,
//!   "learning_rate": 0.0025,
//!   "tables": { "layout": "rows-and-squares", "row_table": [...], "square_table": [...] }
//! }
//! ```
//!
//! `tables.layout` names the table set explicitly: `rows` files hold only
//! `row_table`, `rows-and-squares` files hold both. Every table has exactly
//! 65536 entries in key order.
//!
//! Finite weights are stored as JSON numbers. Infinities and NaNs have no
//! JSON number form and are stored as their `f32` bit pattern in a hex
//! string (`"0x7f800000"`), so every table restores bit for bit.

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tdl2048_evaluator::{
    tuple_feature::{FeatureSet, TableKind},
    tuple_network::{TupleNetwork, WeightTable},
};

use crate::replace_file::replace_file;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SnapshotError {
    #[display("snapshot not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[display("I/O error on snapshot {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to parse snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("{table} table must have 65536 entries, got {len}")]
    TableLength { table: TableKind, len: usize },
    #[display("snapshot {} holds {found} tables, but {expected} was requested", path.display())]
    LayoutMismatch {
        path: PathBuf,
        found: FeatureSet,
        expected: FeatureSet,
    },
}

/// Weight tables tagged with their layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "kebab-case")]
pub enum SnapshotTables {
    Rows {
        #[serde(with = "stored_weights")]
        row_table: Vec<f32>,
    },
    RowsAndSquares {
        #[serde(with = "stored_weights")]
        row_table: Vec<f32>,
        #[serde(with = "stored_weights")]
        square_table: Vec<f32>,
    },
}

impl SnapshotTables {
    #[must_use]
    pub fn feature_set(&self) -> FeatureSet {
        match self {
            Self::Rows { .. } => FeatureSet::Rows,
            Self::RowsAndSquares { .. } => FeatureSet::RowsAndSquares,
        }
    }
}

/// A saved training state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub trained_at: DateTime<Utc>,
    /// Episodes trained in total, across all runs.
    pub episodes: usize,
    /// Learning rate of the most recent run.
    pub learning_rate: f32,
    pub tables: SnapshotTables,
}

impl Snapshot {
    /// Captures `network` with the current time.
    #[must_use]
    pub fn from_network(network: &TupleNetwork, episodes: usize, learning_rate: f32) -> Self {
        let row_table = network.row_table().as_slice().to_vec();
        let tables = match network.square_table() {
            Some(square) => SnapshotTables::RowsAndSquares {
                row_table,
                square_table: square.as_slice().to_vec(),
            },
            None => SnapshotTables::Rows { row_table },
        };
        Self {
            trained_at: Utc::now(),
            episodes,
            learning_rate,
            tables,
        }
    }

    #[must_use]
    pub fn feature_set(&self) -> FeatureSet {
        self.tables.feature_set()
    }

    /// Rebuilds the network, checking table sizes.
    pub fn to_network(&self) -> Result<TupleNetwork, SnapshotError> {
        let (row_table, square_table) = match &self.tables {
            SnapshotTables::Rows { row_table } => (row_table, None),
            SnapshotTables::RowsAndSquares {
                row_table,
                square_table,
            } => (row_table, Some(square_table)),
        };
        let row_table = to_table(TableKind::Row, row_table)?;
        let square_table = square_table
            .map(|weights| to_table(TableKind::Square, weights))
            .transpose()?;
        Ok(TupleNetwork::from_tables(row_table, square_table))
    }

    /// Reads and validates a snapshot file.
    pub fn read<P>(path: P) -> Result<Self, SnapshotError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                SnapshotError::NotFound {
                    path: path.to_owned(),
                }
            } else {
                SnapshotError::Io {
                    path: path.to_owned(),
                    source,
                }
            }
        })?;
        let snapshot: Self = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            SnapshotError::Parse {
                path: path.to_owned(),
                source,
            }
        })?;
        snapshot.to_network()?;
        Ok(snapshot)
    }

    /// Writes the snapshot, creating missing parent directories.
    ///
    /// The file at `path` is replaced only once the new snapshot is fully
    /// written; a failed write keeps the previous one.
    pub fn write<P>(&self, path: P) -> Result<(), SnapshotError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        replace_file(path, |writer| Ok(serde_json::to_writer(writer, self)?)).map_err(|source| {
            SnapshotError::Io {
                path: path.to_owned(),
                source,
            }
        })
    }
}

mod stored_weights {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum StoredWeight {
        Number(f32),
        Bits(String),
    }

    impl From<f32> for StoredWeight {
        fn from(weight: f32) -> Self {
            if weight.is_finite() {
                Self::Number(weight)
            } else {
                Self::Bits(format!("{:#010x}", weight.to_bits()))
            }
        }
    }

    impl TryFrom<StoredWeight> for f32 {
        type Error = String;

        fn try_from(weight: StoredWeight) -> Result<Self, Self::Error> {
            match weight {
                StoredWeight::Number(weight) => Ok(weight),
                StoredWeight::Bits(bits) => bits
                    .strip_prefix("0x")
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .map(f32::from_bits)
                    .ok_or_else(|| format!("invalid weight bit pattern: {bits:?}")),
            }
        }
    }

    pub(super) fn serialize<S>(weights: &[f32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(weights.iter().map(|&w| StoredWeight::from(w)))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<f32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<StoredWeight>::deserialize(deserializer)?
            .into_iter()
            .map(f32::try_from)
            .collect::<Result<_, _>>()
            .map_err(D::Error::custom)
    }
}

fn to_table(table: TableKind, weights: &[f32]) -> Result<WeightTable, SnapshotError> {
    WeightTable::from_vec(weights.to_vec())
        .map_err(|err| SnapshotError::TableLength { table, len: err.len })
}

/// Where the network of a training run came from.
#[derive(Debug)]
pub enum TrainingOrigin {
    /// Continued from a snapshot that had `episodes` episodes of training.
    Resumed { episodes: usize },
    /// Started from zero weights because the snapshot could not be used.
    ColdStart { reason: SnapshotError },
}

impl TrainingOrigin {
    /// Episodes trained before this run.
    #[must_use]
    pub fn previous_episodes(&self) -> usize {
        match self {
            Self::Resumed { episodes } => *episodes,
            Self::ColdStart { .. } => 0,
        }
    }
}

/// Loads the network to continue training from.
///
/// A missing, unreadable or corrupt snapshot is not an error: a zero-weight
/// network is returned together with the reason. A valid snapshot whose
/// layout differs from `feature_set` is an error, since continuing would drop
/// or invent a table.
pub fn load_or_init<P>(
    path: P,
    feature_set: FeatureSet,
) -> Result<(TupleNetwork, TrainingOrigin), SnapshotError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let snapshot = match Snapshot::read(path) {
        Ok(snapshot) => snapshot,
        Err(reason) => {
            return Ok((
                TupleNetwork::new(feature_set),
                TrainingOrigin::ColdStart { reason },
            ));
        }
    };

    if snapshot.feature_set() != feature_set {
        return Err(SnapshotError::LayoutMismatch {
            path: path.to_owned(),
            found: snapshot.feature_set(),
            expected: feature_set,
        });
    }
    let network = snapshot.to_network()?;
    Ok((
        network,
        TrainingOrigin::Resumed {
            episodes: snapshot.episodes,
        },
    ))
}

//! Tuple features: mapping a packed board to weight-table indices.
//!
//! A *tuple* is a fixed group of cells whose exponents, packed together, form
//! a 16-bit key into a weight table. Two tuple families are supported:
//!
//! - **Rows** - the four rows of the board, plus the four rows of its
//!   transpose (the columns). Rows and columns share one table since the game
//!   has no preferred axis.
//! - **Squares** - the nine overlapping 2x2 blocks, each packed as top-left,
//!   top-right, bottom-left, bottom-right.
//!
//! Keys come straight from masking and shifting the board, so every key is in
//! `0..65536` by construction.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tdl2048_engine::BitBoard;

/// Maximum number of lookups a single board can touch (8 lines + 9 squares).
pub const MAX_ACTIVE_FEATURES: usize = 17;

/// Which tuple families a network evaluates.
///
/// Stored alongside persisted weights so that the table layout is always
/// explicit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureSet {
    /// Rows and columns only (one table).
    #[display("rows")]
    Rows,
    /// Rows, columns and 2x2 squares (two tables).
    #[default]
    #[display("rows-and-squares")]
    RowsAndSquares,
}

impl FeatureSet {
    #[must_use]
    pub const fn has_squares(self) -> bool {
        matches!(self, Self::RowsAndSquares)
    }

    /// Number of weight tables this feature set needs.
    #[must_use]
    pub const fn table_count(self) -> usize {
        match self {
            Self::Rows => 1,
            Self::RowsAndSquares => 2,
        }
    }
}

/// Weight table a feature index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TableKind {
    #[display("row")]
    Row,
    #[display("square")]
    Square,
}

/// One weight-table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureIndex {
    pub table: TableKind,
    pub key: u16,
}

impl FeatureIndex {
    #[must_use]
    pub const fn row(key: u16) -> Self {
        Self {
            table: TableKind::Row,
            key,
        }
    }

    #[must_use]
    pub const fn square(key: u16) -> Self {
        Self {
            table: TableKind::Square,
            key,
        }
    }
}

/// Lookups touched by one evaluation, in evaluation order.
pub type ActiveFeatures = ArrayVec<FeatureIndex, MAX_ACTIVE_FEATURES>;

/// Returns every table lookup `board` touches under `feature_set`.
///
/// Order: the four rows, the four columns (rows of the transpose), then the
/// nine squares if enabled. The same index can appear more than once (e.g.
/// two empty rows); each occurrence is a separate lookup.
#[must_use]
pub fn active_features(board: BitBoard, feature_set: FeatureSet) -> ActiveFeatures {
    let mut features = ActiveFeatures::new();
    features.extend(board.rows().map(FeatureIndex::row));
    features.extend(board.transpose().rows().map(FeatureIndex::row));
    if feature_set.has_squares() {
        features.extend(board.squares().map(FeatureIndex::square));
    }
    features
}

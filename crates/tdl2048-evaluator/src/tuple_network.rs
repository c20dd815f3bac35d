//! N-tuple network: the learned value function.
//!
//! # How It Works
//!
//! Each tuple family owns one dense table of 65536 `f32` weights. Evaluating a
//! board looks up every active tuple (see [`tuple_feature`](crate::tuple_feature))
//! and sums the weights:
//!
//! ```text
//! V(s) = Σ rows  row_table[row_i(s)]
//!      + Σ cols  row_table[row_i(transpose(s))]
//!      + Σ 2x2   square_table[square_j(s)]        (if squares are enabled)
//! ```
//!
//! No normalization is applied; the value grows with game progress.
//!
//! # Learning
//!
//! [`TupleNetwork::update`] performs the linear TD correction: every active
//! lookup gets `learning_rate * delta` added. The correction is not divided by
//! the number of active features, and an index that occurs twice in one board
//! (e.g. two identical empty squares) is corrected twice. Repeated patterns
//! therefore move faster than unique ones; learning rates are tuned with that
//! in mind.

use std::fmt;

use tdl2048_engine::BitBoard;

use crate::{
    state_evaluator::StateEvaluator,
    tuple_feature::{self, FeatureIndex, FeatureSet, TableKind},
};

/// Number of entries in every weight table (all 16-bit keys).
pub const TABLE_SIZE: usize = 1 << 16;

/// Error returned when a weight vector does not have [`TABLE_SIZE`] entries.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("weight table must have {TABLE_SIZE} entries, got {len}")]
pub struct TableLengthError {
    pub len: usize,
}

/// Dense weight table indexed by a 16-bit tuple key.
#[derive(Clone, PartialEq)]
pub struct WeightTable {
    weights: Box<[f32]>,
}

impl fmt::Debug for WeightTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let non_zero = self.weights.iter().filter(|w| **w != 0.0).count();
        f.debug_struct("WeightTable")
            .field("len", &self.weights.len())
            .field("non_zero", &non_zero)
            .finish()
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl WeightTable {
    /// Allocates a table with every weight set to zero.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            weights: vec![0.0; TABLE_SIZE].into_boxed_slice(),
        }
    }

    /// Wraps restored weights, checking the table size.
    pub fn from_vec(weights: Vec<f32>) -> Result<Self, TableLengthError> {
        if weights.len() != TABLE_SIZE {
            return Err(TableLengthError { len: weights.len() });
        }
        Ok(Self {
            weights: weights.into_boxed_slice(),
        })
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: u16) -> f32 {
        self.weights[usize::from(key)]
    }

    #[inline]
    fn add(&mut self, key: u16, amount: f32) {
        self.weights[usize::from(key)] += amount;
    }

    /// Returns the weights in key order `0..65536`.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }
}

/// Tuple network value function.
///
/// Owns its tables; callers pass it by reference to the agent and mutably to
/// the trainer.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleNetwork {
    row_table: WeightTable,
    square_table: Option<WeightTable>,
}

impl TupleNetwork {
    /// Creates a network with all weights zero (cold start).
    #[must_use]
    pub fn new(feature_set: FeatureSet) -> Self {
        Self {
            row_table: WeightTable::zeroed(),
            square_table: feature_set.has_squares().then(WeightTable::zeroed),
        }
    }

    /// Rebuilds a network from restored tables.
    ///
    /// The feature set follows from the tables: a square table enables square
    /// features.
    #[must_use]
    pub fn from_tables(row_table: WeightTable, square_table: Option<WeightTable>) -> Self {
        Self {
            row_table,
            square_table,
        }
    }

    #[must_use]
    pub fn feature_set(&self) -> FeatureSet {
        if self.square_table.is_some() {
            FeatureSet::RowsAndSquares
        } else {
            FeatureSet::Rows
        }
    }

    #[must_use]
    pub fn row_table(&self) -> &WeightTable {
        &self.row_table
    }

    #[must_use]
    pub fn square_table(&self) -> Option<&WeightTable> {
        self.square_table.as_ref()
    }

    /// Returns the weight stored for one lookup.
    ///
    /// Square lookups on a rows-only network read as zero.
    #[must_use]
    pub fn weight(&self, index: FeatureIndex) -> f32 {
        match index.table {
            TableKind::Row => self.row_table.get(index.key),
            TableKind::Square => self
                .square_table
                .as_ref()
                .map_or(0.0, |table| table.get(index.key)),
        }
    }

    /// Estimates the value of `board`.
    ///
    /// Pure: never mutates the tables.
    #[must_use]
    pub fn evaluate(&self, board: BitBoard) -> f32 {
        tuple_feature::active_features(board, self.feature_set())
            .iter()
            .map(|&index| self.weight(index))
            .sum()
    }

    /// Moves the value of `board` toward a target.
    ///
    /// Adds `learning_rate * delta` to every lookup [`evaluate`](Self::evaluate)
    /// performs on `board`, once per occurrence.
    pub fn update(&mut self, board: BitBoard, delta: f32, learning_rate: f32) {
        let amount = learning_rate * delta;
        for index in tuple_feature::active_features(board, self.feature_set()) {
            match index.table {
                TableKind::Row => self.row_table.add(index.key, amount),
                TableKind::Square => {
                    if let Some(table) = &mut self.square_table {
                        table.add(index.key, amount);
                    }
                }
            }
        }
    }
}

impl StateEvaluator for TupleNetwork {
    #[inline]
    fn evaluate_state(&self, state: BitBoard) -> f32 {
        self.evaluate(state)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn single_two() -> BitBoard {
        BitBoard::from_ascii(
            r"
            2 . . .
            . . . .
            . . . .
            . . . .
            ",
        )
    }

    fn sample_boards() -> impl Iterator<Item = BitBoard> {
        let mut bits = 0x2545_F491_4F6C_DD1D_u64;
        std::iter::repeat_with(move || {
            bits ^= bits << 13;
            bits ^= bits >> 7;
            bits ^= bits << 17;
            BitBoard::from_bits(bits)
        })
    }

    fn trained_network(feature_set: FeatureSet) -> TupleNetwork {
        let mut network = TupleNetwork::new(feature_set);
        for (i, board) in sample_boards().take(50).enumerate() {
            #[expect(clippy::cast_precision_loss)]
            let delta = (i as f32) - 20.0;
            network.update(board, delta, 0.01);
        }
        network
    }

    #[test]
    fn test_zero_network_evaluates_to_zero() {
        for feature_set in [FeatureSet::Rows, FeatureSet::RowsAndSquares] {
            let network = TupleNetwork::new(feature_set);
            assert_eq!(network.feature_set(), feature_set);
            assert_eq!(network.evaluate(single_two()), 0.0);
        }
    }

    #[test]
    fn test_single_update_rows_only() {
        let mut network = TupleNetwork::new(FeatureSet::Rows);
        network.update(single_two(), 10.0, 0.1);

        // row key 1 fires for row 0 and column 0; key 0 fires six times
        assert_eq!(network.row_table().get(0x0001), 2.0);
        assert_eq!(network.row_table().get(0x0000), 6.0);
        assert_eq!(network.evaluate(single_two()), 2.0 * 2.0 + 6.0 * 6.0);
    }

    #[test]
    fn test_single_update_with_squares() {
        let mut network = TupleNetwork::new(FeatureSet::RowsAndSquares);
        network.update(single_two(), 10.0, 0.1);

        let squares = network.square_table().unwrap();
        assert_eq!(squares.get(0x0001), 1.0);
        assert_eq!(squares.get(0x0000), 8.0);
        assert_eq!(network.evaluate(single_two()), 40.0 + 1.0 + 64.0);
    }

    #[test]
    fn test_update_adds_to_active_entries_only() {
        let board = BitBoard::from_bits(0x0123_4567_89AB_CDEF);
        let mut network = trained_network(FeatureSet::RowsAndSquares);
        let before = network.clone();

        let (delta, learning_rate) = (3.0, 0.5);
        network.update(board, delta, learning_rate);

        let mut occurrences: HashMap<FeatureIndex, f32> = HashMap::new();
        for index in tuple_feature::active_features(board, FeatureSet::RowsAndSquares) {
            *occurrences.entry(index).or_default() += 1.0;
        }
        for (index, count) in &occurrences {
            let expected = before.weight(*index) + count * learning_rate * delta;
            assert!(
                (network.weight(*index) - expected).abs() < 1e-4,
                "{index:?}: {} != {expected}",
                network.weight(*index)
            );
        }

        for key in 0..=u16::MAX {
            for index in [FeatureIndex::row(key), FeatureIndex::square(key)] {
                if !occurrences.contains_key(&index) {
                    assert_eq!(network.weight(index), before.weight(index));
                }
            }
        }
    }

    #[test]
    fn test_distinct_indices_move_by_exactly_one_step() {
        // all 17 lookups of this board are distinct
        let board = BitBoard::from_bits(0x0123_4567_89AB_CDEF);
        let features = tuple_feature::active_features(board, FeatureSet::RowsAndSquares);
        let mut seen = features.to_vec();
        seen.sort_by_key(|f| (f.table.to_string(), f.key));
        seen.dedup();
        assert_eq!(seen.len(), features.len());

        let mut network = TupleNetwork::new(FeatureSet::RowsAndSquares);
        network.update(board, 4.0, 0.25);
        for index in features {
            assert_eq!(network.weight(index), 1.0);
        }
    }

    #[test]
    fn test_evaluate_is_pure() {
        let network = trained_network(FeatureSet::RowsAndSquares);
        let snapshot = network.clone();
        for board in sample_boards().take(100) {
            let first = network.evaluate(board);
            let second = network.evaluate(board);
            assert_eq!(first.to_bits(), second.to_bits());
        }
        assert_eq!(network, snapshot);
    }

    #[test]
    fn test_rows_network_ignores_squares() {
        let mut network = TupleNetwork::new(FeatureSet::Rows);
        network.update(single_two(), 1.0, 1.0);
        assert!(network.square_table().is_none());
        assert_eq!(network.weight(FeatureIndex::square(0)), 0.0);
    }

    #[test]
    fn test_from_tables_length_check() {
        assert_eq!(
            WeightTable::from_vec(vec![0.0; 3]),
            Err(TableLengthError { len: 3 })
        );
        let table = WeightTable::from_vec(vec![0.5; TABLE_SIZE]).unwrap();
        let network = TupleNetwork::from_tables(table, None);
        assert_eq!(network.feature_set(), FeatureSet::Rows);
        assert_eq!(network.evaluate(BitBoard::EMPTY), 8.0 * 0.5);
    }
}

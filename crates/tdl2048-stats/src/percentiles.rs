use serde::{Deserialize, Serialize};

/// Percentile points reported for score samples.
pub const SCORE_PERCENTILES: [f32; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

/// Precomputed `(percentile, value)` pairs.
///
/// # Examples
///
/// ```
/// use tdl2048_stats::percentiles::Percentiles;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0]);
/// assert_eq!(percentiles.get(50.0), Some(6.0));
/// assert_eq!(percentiles.get(75.0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    values: Vec<(f32, f32)>,
}

impl Percentiles {
    /// Computes percentiles from unsorted values.
    #[must_use]
    pub fn new(values: &[f32], percentile_points: &[f32]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f32::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Computes percentiles from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f32], percentile_points: &[f32]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        let values = percentile_points
            .iter()
            .map(|&p| (p, compute_percentile(sorted_values, p)))
            .collect();
        Self { values }
    }

    /// Returns the value at a precomputed percentile.
    #[must_use]
    pub fn get(&self, percentile: f32) -> Option<f32> {
        self.values
            .iter()
            .find_map(|&(p, value)| ((p - percentile).abs() < f32::EPSILON).then_some(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.values.iter().copied()
    }
}

/// Nearest-rank percentile: the value at index `floor(n * p / 100)`.
///
/// Returns `NaN` for an empty sample.
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f32], percentile: f32) -> f32 {
    if sorted_values.is_empty() {
        return f32::NAN;
    }
    let idx = ((sorted_values.len() as f32 * percentile) / 100.0) as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_rank() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(compute_percentile(&sorted, 0.0), 10.0);
        assert_eq!(compute_percentile(&sorted, 50.0), 30.0);
        assert_eq!(compute_percentile(&sorted, 100.0), 40.0);
        assert!(compute_percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_unsorted_input() {
        let percentiles = Percentiles::new(&[9.0, 1.0, 5.0], &SCORE_PERCENTILES);
        assert_eq!(percentiles.get(10.0), Some(1.0));
        assert_eq!(percentiles.get(50.0), Some(5.0));
        assert_eq!(percentiles.get(90.0), Some(9.0));
        assert_eq!(percentiles.iter().count(), SCORE_PERCENTILES.len());
    }
}

use serde::{Deserialize, Serialize};

/// Summary of a sample of game scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    /// Number of values summarized.
    pub count: usize,
    /// The smallest value.
    pub min: f32,
    /// The largest value.
    pub max: f32,
    /// The arithmetic mean.
    pub mean: f32,
    /// The median (upper median for even counts).
    pub median: f32,
    /// The population standard deviation.
    pub std_dev: f32,
}

impl DescriptiveStats {
    /// Computes statistics from unsorted values.
    ///
    /// Returns `None` if `values` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tdl2048_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([4.0, 16.0, 8.0]).unwrap();
    /// assert_eq!(stats.min, 4.0);
    /// assert_eq!(stats.median, 8.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes statistics from values sorted in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f32]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f32;
        let mean = sorted_values.iter().sum::<f32>() / n;
        let median = sorted_values[count / 2];
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f32>()
            / n;

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }

    /// Converts integer game scores and summarizes them.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_scores<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        Self::new(scores.into_iter().map(|s| s as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        assert!(DescriptiveStats::new([]).is_none());
        assert!(DescriptiveStats::from_scores([]).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::from_scores([2048]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 2048.0);
        assert_eq!(stats.max, 2048.0);
        assert_eq!(stats.mean, 2048.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_summary() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    #[should_panic(expected = "sorted")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = DescriptiveStats::from_sorted(&[3.0, 1.0]);
    }
}

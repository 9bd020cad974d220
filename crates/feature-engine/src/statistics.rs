//! Column Statistics Computation

/// Summary statistics over the present cells of a numeric column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnStatistics {
    /// Number of present values
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl ColumnStatistics {
    /// Compute statistics, ignoring missing cells
    pub fn compute(values: &[Option<f64>]) -> Self {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            return Self::default();
        }

        let n = present.len() as f64;
        let mean = present.iter().sum::<f64>() / n;
        let min = present.iter().cloned().fold(f64::MAX, f64::min);
        let max = present.iter().cloned().fold(f64::MIN, f64::max);

        let m2: f64 = present.iter().map(|v| (v - mean) * (v - mean)).sum();
        let std_dev = (m2 / n).sqrt();

        Self {
            count: present.len(),
            mean,
            std_dev,
            min,
            max,
        }
    }

    /// Spread between the extremes
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Whether any value was present
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let values = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
        let stats = ColumnStatistics::compute(&values);
        assert!((stats.mean - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_std_dev_computation() {
        let values: Vec<_> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
            .iter()
            .map(|v| Some(*v))
            .collect();
        let stats = ColumnStatistics::compute(&values);
        // Population std dev of this dataset is exactly 2.0
        assert!((stats.std_dev - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_values_ignored() {
        let stats = ColumnStatistics::compute(&[Some(10.0), None, Some(20.0)]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 20.0);
        assert!((stats.mean - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_values() {
        let stats = ColumnStatistics::compute(&[None, None]);
        assert!(stats.is_empty());
        assert_eq!(stats.mean, 0.0);
    }
}

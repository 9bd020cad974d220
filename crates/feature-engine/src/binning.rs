//! Equal-Width Discretization

use crate::statistics::ColumnStatistics;

/// Equal-width bins fitted to the range of a column.
///
/// Bins are right-closed. The lowest edge is pushed down by 0.1% of the range
/// so the minimum lands in the first bin; a constant column is widened by
/// 0.1% of its magnitude on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualWidthBins {
    edges: Vec<f64>,
}

impl EqualWidthBins {
    /// Fit `bins` equal-width bins to the present values; `None` if nothing is present
    pub fn fit(values: &[Option<f64>], bins: usize) -> Option<Self> {
        if bins == 0 {
            return None;
        }
        let stats = ColumnStatistics::compute(values);
        if stats.is_empty() {
            return None;
        }

        let (mut lo, mut hi) = (stats.min, stats.max);
        let edges = if lo == hi {
            lo -= if lo != 0.0 { 0.001 * lo.abs() } else { 0.001 };
            hi += if hi != 0.0 { 0.001 * hi.abs() } else { 0.001 };
            linspace(lo, hi, bins)
        } else {
            let mut edges = linspace(lo, hi, bins);
            edges[0] -= (hi - lo) * 0.001;
            edges
        };

        Some(Self { edges })
    }

    /// Bin edges, `bins + 1` values ascending
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins
    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    /// Bin code for a value; `None` outside the fitted edges
    pub fn assign(&self, value: f64) -> Option<usize> {
        let first = *self.edges.first()?;
        let last = *self.edges.last()?;
        if value.is_nan() || value < first || value > last {
            return None;
        }
        self.edges[1..].iter().position(|&edge| value <= edge)
    }
}

fn linspace(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let step = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + step * i as f64).collect();
    // Pin the top edge so the maximum is never lost to rounding
    edges[bins] = hi;
    edges
}

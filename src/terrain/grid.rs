//! Reduced, repaired elevation grid.

use std::fmt;

use crate::error::{EngineError, Result};
use crate::types::Extent2D;

/// Working-resolution elevation grid.
///
/// Every cell holds a finite value. The grid is immutable once built and
/// owns its storage, so it can be shared between readers behind an `Arc`.
/// Layout is row-major, row 0 at the northern edge.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationGrid {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
    extent: Extent2D,
}

impl ElevationGrid {
    /// Build a grid from row-major values that are already clean.
    ///
    /// Fails with [`EngineError::InvalidRaster`] if the grid has zero area,
    /// the value count does not match the shape, or any value is not finite.
    pub fn new(values: Vec<f64>, rows: usize, cols: usize, extent: Extent2D) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::InvalidRaster(format!(
                "grid has zero area ({}x{})",
                rows, cols
            )));
        }
        if values.len() != rows * cols {
            return Err(EngineError::InvalidRaster(format!(
                "{} values do not fill a {}x{} grid",
                values.len(),
                rows,
                cols
            )));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(EngineError::InvalidRaster(format!(
                "non-finite value at row {}, col {}",
                i / cols,
                i % cols
            )));
        }

        Ok(Self::from_clean(values, rows, cols, extent))
    }

    /// Assemble a grid whose values the caller has already validated.
    pub(crate) fn from_clean(values: Vec<f64>, rows: usize, cols: usize, extent: Extent2D) -> Self {
        debug_assert_eq!(values.len(), rows * cols);
        debug_assert!(values.iter().all(|v| v.is_finite()));
        Self {
            values,
            rows,
            cols,
            extent,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Physical extent.
    pub fn extent(&self) -> &Extent2D {
        &self.extent
    }

    /// Row-major elevation values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Elevation at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    /// All values of one row.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.values[start..start + self.cols]
    }

    /// Copy of the grid as a vector of rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    /// Minimum and maximum elevation.
    pub fn elevation_range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Mean elevation.
    pub fn mean(&self) -> f64 {
        mean_of(&self.values, |_| true).unwrap_or(0.0)
    }

    /// Summary statistics.
    pub fn statistics(&self) -> GridStatistics {
        let (min_elevation, max_elevation) = self.elevation_range();
        GridStatistics {
            rows: self.rows,
            cols: self.cols,
            min_elevation,
            max_elevation,
            mean_elevation: self.mean(),
            extent: self.extent,
        }
    }
}

/// Mean of the values accepted by `keep`, or `None` if there are none.
///
/// Switches to an incremental update when the plain sum overflows, so the
/// mean of finite values is finite even near `f64::MAX`.
pub(crate) fn mean_of(values: &[f64], keep: impl Fn(f64) -> bool) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .copied()
        .filter(|&v| keep(v))
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        return None;
    }
    if sum.is_finite() {
        return Some(sum / count as f64);
    }

    let mut mean = 0.0;
    for (i, v) in values.iter().copied().filter(|&v| keep(v)).enumerate() {
        let n = (i + 1) as f64;
        mean += v / n - mean / n;
    }
    Some(mean)
}

/// Statistics about an elevation grid.
#[derive(Debug, Clone)]
pub struct GridStatistics {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Lowest elevation
    pub min_elevation: f64,
    /// Highest elevation
    pub max_elevation: f64,
    /// Mean elevation
    pub mean_elevation: f64,
    /// Physical extent
    pub extent: Extent2D,
}

impl fmt::Display for GridStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Elevation Grid Statistics:")?;
        writeln!(f, "  Dimensions: {}x{} cells", self.rows, self.cols)?;
        writeln!(
            f,
            "  Elevation range: {:.1} to {:.1}",
            self.min_elevation, self.max_elevation
        )?;
        writeln!(f, "  Mean elevation: {:.1}", self.mean_elevation)?;
        write!(f, "  Extent: {}", self.extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent() -> Extent2D {
        Extent2D::new(0.0, 3.0, 0.0, 2.0)
    }

    #[test]
    fn test_new_accepts_clean_values() {
        let grid = ElevationGrid::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3, extent()).unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.get(1, 2), 6.0);
        assert_eq!(grid.row(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_new_rejects_nan() {
        let result = ElevationGrid::new(vec![1.0, f64::NAN], 1, 2, extent());
        assert!(matches!(result, Err(EngineError::InvalidRaster(_))));
    }

    #[test]
    fn test_new_rejects_zero_area() {
        let result = ElevationGrid::new(vec![], 0, 3, extent());
        assert!(matches!(result, Err(EngineError::InvalidRaster(_))));
    }

    #[test]
    fn test_mean_near_f64_max_stays_finite() {
        let grid = ElevationGrid::new(vec![1.7e308, 1.7e308, 1.7e308, 1.0], 2, 2, extent()).unwrap();
        let mean = grid.mean();
        assert!(mean.is_finite(), "mean overflowed: {}", mean);
        assert!((mean / 1.275e308 - 1.0).abs() < 1e-9, "mean {}", mean);
        assert_eq!(mean_of(&[1.0, 3.0], |_| true), Some(2.0));
        assert_eq!(mean_of(&[1.0, 3.0], |v| v > 5.0), None);
    }

    #[test]
    fn test_statistics() {
        let grid = ElevationGrid::new(vec![-2.0, 0.0, 2.0, 4.0], 2, 2, extent()).unwrap();
        let stats = grid.statistics();
        assert_eq!(stats.min_elevation, -2.0);
        assert_eq!(stats.max_elevation, 4.0);
        assert!((stats.mean_elevation - 1.0).abs() < 1e-12);
        assert!(stats.to_string().contains("2x2 cells"));
    }

    #[test]
    fn test_to_rows() {
        let grid = ElevationGrid::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2, extent()).unwrap();
        assert_eq!(grid.to_rows(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }
}

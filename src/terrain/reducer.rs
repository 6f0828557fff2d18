//! Raster reduction and NoData repair.
//!
//! Shrinks an oversized elevation raster to a working grid by stride
//! sampling (every Nth row and column, remainder dropped) and replaces every
//! invalid cell so that nothing non-finite reaches the rendering path.
//!
//! A cell is invalid when it is NaN or infinite, equals the NoData sentinel,
//! or has a magnitude above [`ReducerConfig::outlier_magnitude`] (decoders
//! sometimes leave float-max fill values that are not declared as NoData).
//! Invalid cells take the mean of the valid cells of the reduced grid.
//!
//! # Example
//!
//! ```
//! use seisterra::terrain::{GridReducer, RawRaster};
//! use seisterra::types::Extent2D;
//!
//! let raster = RawRaster::new(
//!     vec![1.0, 2.0, 3.0, 4.0, -9999.0, 6.0, 7.0, 8.0, 9.0],
//!     3,
//!     3,
//!     Extent2D::new(0.0, 3.0, 0.0, 3.0),
//! )?
//! .with_nodata(-9999.0);
//!
//! let grid = GridReducer::default().reduce(&raster, 1)?;
//! assert_eq!(grid.shape(), (3, 3));
//! assert_eq!(grid.get(1, 1), 5.0);
//! # Ok::<(), seisterra::EngineError>(())
//! ```

use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{ElevationGrid, RawRaster, mean_of};
use crate::error::{EngineError, Result};

/// Magnitude above which a sample is treated as a fill value.
pub const DEFAULT_OUTLIER_MAGNITUDE: f64 = 1e10;

/// NoData handling options for [`GridReducer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReducerConfig {
    /// Sentinel used instead of the raster's own NoData value.
    pub nodata_override: Option<f64>,
    /// Values with a larger magnitude are treated as invalid.
    pub outlier_magnitude: f64,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            nodata_override: None,
            outlier_magnitude: DEFAULT_OUTLIER_MAGNITUDE,
        }
    }
}

impl ReducerConfig {
    /// Treat `nodata` as the sentinel regardless of what the raster declares.
    pub fn with_nodata_override(mut self, nodata: f64) -> Self {
        self.nodata_override = Some(nodata);
        self
    }

    /// Set the outlier magnitude threshold.
    ///
    /// Fails with [`EngineError::InvalidParameter`] unless `magnitude` is
    /// positive and finite.
    pub fn with_outlier_magnitude(mut self, magnitude: f64) -> Result<Self> {
        self.outlier_magnitude = magnitude;
        self.validate()?;
        Ok(self)
    }

    /// Check the outlier magnitude.
    pub fn validate(&self) -> Result<()> {
        if !self.outlier_magnitude.is_finite() || self.outlier_magnitude <= 0.0 {
            return Err(EngineError::invalid_parameter(
                "outlier_magnitude",
                format!("must be positive and finite, got {}", self.outlier_magnitude),
            ));
        }
        Ok(())
    }
}

/// Outcome of a reduction, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionReport {
    /// Shape of the input raster
    pub source_shape: (usize, usize),
    /// Shape of the produced grid
    pub reduced_shape: (usize, usize),
    /// Stride used
    pub factor: usize,
    /// Number of cells replaced by the fill value
    pub repaired_cells: usize,
    /// Value written into repaired cells, if any were repaired
    pub fill_value: Option<f64>,
}

impl fmt::Display for ReductionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} -> {}x{} (factor {}), {} cells repaired",
            self.source_shape.0,
            self.source_shape.1,
            self.reduced_shape.0,
            self.reduced_shape.1,
            self.factor,
            self.repaired_cells
        )?;
        if let Some(fill) = self.fill_value {
            write!(f, " with {:.3}", fill)?;
        }
        Ok(())
    }
}

/// Downsamples rasters and repairs invalid cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridReducer {
    config: ReducerConfig,
}

impl GridReducer {
    /// Create a reducer with the given NoData handling.
    pub fn new(config: ReducerConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ReducerConfig {
        &self.config
    }

    /// Reduce `raster` by keeping every `factor`-th row and column.
    ///
    /// The result is a new grid that shares no storage with `raster`.
    pub fn reduce(&self, raster: &RawRaster, factor: usize) -> Result<ElevationGrid> {
        self.reduce_with_report(raster, factor).map(|(grid, _)| grid)
    }

    /// Like [`GridReducer::reduce`], also returning what was done.
    pub fn reduce_with_report(
        &self,
        raster: &RawRaster,
        factor: usize,
    ) -> Result<(ElevationGrid, ReductionReport)> {
        self.config.validate()?;
        if factor == 0 {
            return Err(EngineError::invalid_parameter(
                "downsample_factor",
                "must be a positive integer",
            ));
        }

        let (src_rows, src_cols) = raster.shape();
        if src_rows == 0 || src_cols == 0 {
            return Err(EngineError::InvalidRaster(format!(
                "raster has zero area ({}x{})",
                src_rows, src_cols
            )));
        }

        let rows = src_rows / factor;
        let cols = src_cols / factor;
        if rows == 0 || cols == 0 {
            return Err(EngineError::InvalidRaster(format!(
                "downsample factor {} leaves nothing of a {}x{} raster",
                factor, src_rows, src_cols
            )));
        }

        let mut values = stride_sample(raster, factor, rows, cols);

        let nodata = self.config.nodata_override.or(raster.nodata());
        let is_valid = |v: f64| {
            v.is_finite() && Some(v) != nodata && v.abs() <= self.config.outlier_magnitude
        };

        let count = values.iter().filter(|&&v| is_valid(v)).count();
        let repaired_cells = values.len() - count;

        let fill_value = if repaired_cells == 0 {
            None
        } else if let Some(mean) = mean_of(&values, is_valid) {
            Some(mean)
        } else {
            // Every kept cell is invalid; fall back to the full raster.
            let mean = mean_of(raster.data(), is_valid).ok_or_else(|| {
                EngineError::InvalidRaster(
                    "raster contains no finite values to repair from".to_string(),
                )
            })?;
            log::warn!(
                "No valid cell survived stride sampling by {}; filling from the full-raster mean",
                factor
            );
            Some(mean)
        };

        if let Some(fill) = fill_value.filter(|v| !v.is_finite()) {
            return Err(EngineError::InvalidRaster(format!(
                "NoData fill value {} is not finite",
                fill
            )));
        }

        if let Some(fill) = fill_value {
            for v in values.iter_mut().filter(|v| !is_valid(**v)) {
                *v = fill;
            }
        }

        let report = ReductionReport {
            source_shape: (src_rows, src_cols),
            reduced_shape: (rows, cols),
            factor,
            repaired_cells,
            fill_value,
        };
        log::debug!("Reduced raster: {}", report);

        let grid = ElevationGrid::from_clean(values, rows, cols, *raster.extent());
        Ok((grid, report))
    }
}

/// Copy every `factor`-th cell of `raster` into a new row-major buffer.
fn stride_sample(raster: &RawRaster, factor: usize, rows: usize, cols: usize) -> Vec<f64> {
    let mut values = vec![0.0; rows * cols];
    let fill_row = |(i, out): (usize, &mut [f64])| {
        let src_row = i * factor;
        for (j, v) in out.iter_mut().enumerate() {
            *v = raster.get(src_row, j * factor);
        }
    };

    #[cfg(feature = "parallel")]
    values.par_chunks_mut(cols).enumerate().for_each(fill_row);

    #[cfg(not(feature = "parallel"))]
    values.chunks_mut(cols).enumerate().for_each(fill_row);

    values
}

//! Decoded raster input handed to the engine by a raster decoder.

use crate::error::{EngineError, Result};
use crate::types::Extent2D;

/// A decoded single-band elevation raster, before reduction and repair.
///
/// Values are stored row-major: `data[row * cols + col]`, with row 0 at the
/// northern edge (`y_max`) as rasters are conventionally laid out. Cells may
/// hold the NoData sentinel, NaN or infinities.
#[derive(Clone, Debug)]
pub struct RawRaster {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
    nodata: Option<f64>,
    extent: Extent2D,
}

impl RawRaster {
    /// Create a raster from row-major values.
    ///
    /// Zero-area rasters are accepted here; the reducer rejects them.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize, extent: Extent2D) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(EngineError::InvalidRaster(format!(
                "{} values do not fill a {}x{} raster",
                data.len(),
                rows,
                cols
            )));
        }

        Ok(Self {
            data,
            rows,
            cols,
            nodata: None,
            extent,
        })
    }

    /// Create a raster from a vector of rows.
    ///
    /// All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>, extent: Extent2D) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
            return Err(EngineError::InvalidRaster(format!(
                "row {} has {} columns, expected {}",
                i,
                row.len(),
                n_cols
            )));
        }

        let data = rows.into_iter().flatten().collect();
        Self::new(data, n_rows, n_cols, extent)
    }

    /// Set the NoData sentinel value.
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    /// NoData sentinel declared by the decoder, if any.
    pub fn nodata(&self) -> Option<f64> {
        self.nodata
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

    /// Physical extent of the raster.
    pub fn extent(&self) -> &Extent2D {
        &self.extent
    }

    /// Raw row-major values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Mutable access to the raw values.
    ///
    /// Grids already produced from this raster are unaffected by later edits.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

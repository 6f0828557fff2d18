//! GeoTIFF elevation raster reader.
//!
//! Decodes the first band of a GeoTIFF into a [`RawRaster`]. Uses the pure
//! Rust `tiff` crate, no GDAL required.
//!
//! - Extent comes from ModelPixelScale (tag 33550) and ModelTiepoint
//!   (tag 33922). Without them the raster is placed in pixel units,
//!   `[0, cols] × [0, rows]`.
//! - Negative pixel scales (south-up or east-to-west rasters) are flipped so
//!   row 0 is the northern edge and column 0 the western edge.
//! - NoData comes from the GDAL_NODATA ASCII tag (42113) when present.
//!
//! NoData cells are left in place; repair happens in
//! [`GridReducer`](crate::terrain::GridReducer).
//!
//! # Example
//!
//! ```ignore
//! use seisterra::io::read_geotiff_raster;
//! use seisterra::terrain::GridReducer;
//!
//! let raster = read_geotiff_raster("data/dem.tif")?;
//! let grid = GridReducer::default().reduce(&raster, 4)?;
//! println!("{}", grid.statistics());
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use thiserror::Error;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use crate::error::EngineError;
use crate::terrain::RawRaster;
use crate::types::Extent2D;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GDAL_NODATA: u16 = 42113;

/// Error type for GeoTIFF operations.
#[derive(Debug, Error)]
pub enum GeoTiffError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error
    #[error("TIFF error: {0}")]
    Tiff(String),

    /// Georeferencing tags are present but unusable
    #[error("Invalid geotransform: {0}")]
    InvalidGeotransform(String),

    /// Decoded data does not form a single-band raster
    #[error("Unsupported layout: {0}")]
    UnsupportedLayout(String),

    /// Decoded values were rejected by the engine
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<tiff::TiffError> for GeoTiffError {
    fn from(e: tiff::TiffError) -> Self {
        GeoTiffError::Tiff(e.to_string())
    }
}

/// Read a single-band GeoTIFF from disk.
pub fn read_geotiff_raster<P: AsRef<Path>>(path: P) -> Result<RawRaster, GeoTiffError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let raster = decode_geotiff(BufReader::new(file))?;
    log::info!(
        "Read {}x{} raster from {}",
        raster.rows(),
        raster.cols(),
        path.display()
    );
    Ok(raster)
}

/// Decode a single-band GeoTIFF from any seekable reader.
pub fn decode_geotiff<R: Read + Seek>(reader: R) -> Result<RawRaster, GeoTiffError> {
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;
    let (cols, rows) = (width as usize, height as usize);

    let pixel_scale = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE))
        .ok();
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TIEPOINT))
        .ok();
    let nodata = decoder
        .get_tag_ascii_string(Tag::from_u16_exhaustive(GDAL_NODATA))
        .ok()
        .and_then(|s| parse_nodata(&s));

    let georef = match (pixel_scale, tiepoint) {
        (Some(scale), Some(tiepoint)) => georeference(&scale, &tiepoint, cols, rows)?,
        _ => {
            log::warn!("No GeoTIFF geotransform found; using pixel coordinates");
            Georeference {
                extent: Extent2D::try_new(0.0, cols.max(1) as f64, 0.0, rows.max(1) as f64)?,
                south_up: false,
                east_to_west: false,
            }
        }
    };

    let values: Vec<f64> = match decoder.read_image()? {
        DecodingResult::U8(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::U16(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::U32(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::U64(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F32(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::F64(data) => data,
        DecodingResult::I8(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::I16(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::I32(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::I64(data) => data.into_iter().map(|v| v as f64).collect(),
    };

    // Multi-band images decode interleaved; keep the first band.
    let n_cells = rows * cols;
    let mut values = if n_cells > 0 && values.len() > n_cells && values.len() % n_cells == 0 {
        let bands = values.len() / n_cells;
        values.into_iter().step_by(bands).collect()
    } else if values.len() == n_cells {
        values
    } else {
        return Err(GeoTiffError::UnsupportedLayout(format!(
            "{} samples for a {}x{} image",
            values.len(),
            rows,
            cols
        )));
    };

    if georef.south_up || georef.east_to_west {
        log::debug!(
            "Reorienting raster to north-up (south_up={}, east_to_west={})",
            georef.south_up,
            georef.east_to_west
        );
        reorient(&mut values, rows, cols, georef.south_up, georef.east_to_west);
    }

    let mut raster = RawRaster::new(values, rows, cols, georef.extent)?;
    if let Some(nodata) = nodata {
        raster = raster.with_nodata(nodata);
    }
    Ok(raster)
}

/// Footprint and pixel orientation taken from the GeoTIFF tags.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Georeference {
    extent: Extent2D,
    /// Row 0 is the southern edge (negative Y pixel scale)
    south_up: bool,
    /// Column 0 is the eastern edge (negative X pixel scale)
    east_to_west: bool,
}

/// Georeference from ModelPixelScale `[sx, sy, sz]` and ModelTiepoint `[i, j, k, x, y, z]`.
fn georeference(
    scale: &[f64],
    tiepoint: &[f64],
    cols: usize,
    rows: usize,
) -> Result<Georeference, GeoTiffError> {
    if tiepoint.len() < 6 || scale.len() < 2 {
        return Err(GeoTiffError::InvalidGeotransform(format!(
            "expected 6 tiepoint and 2 scale values, got {} and {}",
            tiepoint.len(),
            scale.len()
        )));
    }
    let (sx, sy) = (scale[0], scale[1]);

    // Tiepoint may anchor a pixel other than (0, 0).
    let x0 = tiepoint[3] - tiepoint[0] * sx;
    let y0 = tiepoint[4] + tiepoint[1] * sy;
    let x1 = x0 + cols as f64 * sx;
    let y1 = y0 - rows as f64 * sy;

    let extent = Extent2D::try_new(x0.min(x1), x0.max(x1), y0.min(y1), y0.max(y1))
        .map_err(|e| GeoTiffError::InvalidGeotransform(e.to_string()))?;
    Ok(Georeference {
        extent,
        south_up: sy < 0.0,
        east_to_west: sx < 0.0,
    })
}

/// Flip a row-major buffer in place so row 0 is north and column 0 is west.
fn reorient(values: &mut [f64], rows: usize, cols: usize, flip_rows: bool, flip_cols: bool) {
    if flip_rows {
        for i in 0..rows / 2 {
            let (top, bottom) = values.split_at_mut((rows - 1 - i) * cols);
            top[i * cols..(i + 1) * cols].swap_with_slice(&mut bottom[..cols]);
        }
    }
    if flip_cols {
        for row in values.chunks_mut(cols) {
            row.reverse();
        }
    }
}

/// GDAL writes NoData as ASCII, sometimes NUL-terminated or padded.
fn parse_nodata(raw: &str) -> Option<f64> {
    raw.trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .parse::<f64>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nodata() {
        assert_eq!(parse_nodata("-9999\0"), Some(-9999.0));
        assert_eq!(parse_nodata(" -3.4028234663852886e+38 "), Some(-3.4028234663852886e38));
        assert!(parse_nodata("nan").is_some_and(f64::is_nan));
        assert_eq!(parse_nodata("abc"), None);
    }

    #[test]
    fn test_georeference() {
        let scale = [30.0, 30.0, 0.0];
        let tiepoint = [0.0, 0.0, 0.0, 500_000.0, 6_700_000.0, 0.0];
        let georef = georeference(&scale, &tiepoint, 100, 50).unwrap();
        let extent = georef.extent;
        assert_eq!(extent.x_min, 500_000.0);
        assert_eq!(extent.x_max, 503_000.0);
        assert_eq!(extent.y_max, 6_700_000.0);
        assert_eq!(extent.y_min, 6_698_500.0);
        assert!(!georef.south_up && !georef.east_to_west);
    }

    #[test]
    fn test_georeference_south_up() {
        let scale = [30.0, -30.0, 0.0];
        let tiepoint = [0.0, 0.0, 0.0, 500_000.0, 6_700_000.0, 0.0];
        let georef = georeference(&scale, &tiepoint, 100, 50).unwrap();
        assert_eq!(georef.extent.y_min, 6_700_000.0);
        assert_eq!(georef.extent.y_max, 6_701_500.0);
        assert!(georef.south_up);
        assert!(!georef.east_to_west);
    }

    #[test]
    fn test_georeference_rejects_bad_tags() {
        assert!(matches!(
            georeference(&[1.0], &[0.0; 6], 10, 10),
            Err(GeoTiffError::InvalidGeotransform(_))
        ));
        assert!(matches!(
            georeference(&[1.0, 0.0], &[0.0; 6], 10, 10),
            Err(GeoTiffError::InvalidGeotransform(_))
        ));
    }

    #[test]
    fn test_reorient() {
        let mut values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        reorient(&mut values, 3, 3, true, false);
        assert_eq!(values, vec![7.0, 8.0, 9.0, 4.0, 5.0, 6.0, 1.0, 2.0, 3.0]);

        let mut values = vec![1.0, 2.0, 3.0, 4.0];
        reorient(&mut values, 2, 2, true, true);
        assert_eq!(values, vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_geotiff_raster("/nonexistent/dem.tif"),
            Err(GeoTiffError::Io(_))
        ));
    }
}

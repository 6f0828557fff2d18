//! Raster decoding at the edge of the engine.
//!
//! The engine consumes already-decoded arrays. This module is the one place
//! that touches files: it turns a single-band GeoTIFF into a
//! [`RawRaster`](crate::terrain::RawRaster), leaving NoData repair to the
//! reducer.

mod geotiff;

pub use geotiff::{GeoTiffError, decode_geotiff, read_geotiff_raster};

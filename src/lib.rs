//! # seisterra
//!
//! Volumetric alignment and slicing engine for overlaying a 3D seismic
//! reflection volume on a terrain elevation surface.
//!
//! This crate provides the numeric core behind such a viewer:
//! - Raster reduction (stride downsampling) with NoData repair
//! - Densification of seismic traces into an indexed 3D volume
//! - Inline, crossline and depth/time slicing with nearest-line snapping
//! - A shared render extent stretching seismic index space onto the terrain
//!   footprint, with vertical exaggeration and depth offset
//! - A session object with memoized loading
//!
//! Decoding seismic files and drawing the scene are left to the caller; the
//! engine takes decoded arrays in and hands plain arrays and extents out.
//!
//! # Example
//!
//! ```
//! use seisterra::{
//!     Extent2D, ExtentMapper, GridReducer, RawRaster, SeismicTrace, SliceExtractor,
//!     SliceRequest, VolumeIndexer,
//! };
//!
//! let raster = RawRaster::new(
//!     vec![10.0, 12.0, -9999.0, 14.0],
//!     2,
//!     2,
//!     Extent2D::new(0.0, 1000.0, 0.0, 1000.0),
//! )?
//! .with_nodata(-9999.0);
//! let grid = GridReducer::default().reduce(&raster, 1)?;
//!
//! let traces = vec![
//!     SeismicTrace::new(1, 10, vec![0.1, 0.2, 0.3], 4.0),
//!     SeismicTrace::new(3, 20, vec![0.4, 0.5, 0.6], 4.0),
//! ];
//! let volume = VolumeIndexer::index(&traces)?;
//!
//! let slice = SliceExtractor::extract(&volume, &SliceRequest::inline(2))?;
//! assert_eq!(slice.selected_value(), 1.0);
//!
//! let mapper = ExtentMapper::default();
//! let extent = mapper.map_extent(&grid, &volume, 2.0, -100.0)?;
//! let coords = mapper.map_slice_coordinates(&slice, &volume, &grid, &extent)?;
//! assert_eq!(coords.x[0], 0.0);
//! # Ok::<(), seisterra::EngineError>(())
//! ```

pub mod error;
pub mod io;
pub mod render;
pub mod seismic;
pub mod session;
pub mod terrain;
pub mod types;

// Re-export main types for convenience
pub use error::{EngineError, Result};
pub use render::{ExtentMapper, RenderExtent, SliceCoordinates, TerrainSurface, VerticalAnchor};
pub use seismic::{
    SeismicTrace, SeismicVolume, SliceExtractor, SliceKind, SliceRequest, SliceResult,
    SliceTarget, VolumeIndexer, VolumeStatistics,
};
pub use session::{
    CacheStats, Fingerprint, LoadCache, LoadError, SceneFrame, SeismicLayer, Session,
    VisualizationConfig,
};
pub use terrain::{
    ElevationGrid, GridReducer, GridStatistics, RawRaster, ReducerConfig, ReductionReport,
};
pub use types::{CrosslineRank, Extent2D, InlineRank, SampleIndex};

// I/O types
pub use io::{GeoTiffError, decode_geotiff, read_geotiff_raster};

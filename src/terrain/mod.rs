//! Terrain side of the engine: decoded rasters, reduction and repair.
//!
//! - [`RawRaster`]: decoded raster as handed over by a decoder
//! - [`GridReducer`]: stride downsampling plus NoData repair
//! - [`ElevationGrid`]: the clean working grid used for rendering

mod grid;
mod raster;
mod reducer;

pub use grid::{ElevationGrid, GridStatistics};
pub(crate) use grid::mean_of;
pub use raster::RawRaster;
pub use reducer::{DEFAULT_OUTLIER_MAGNITUDE, GridReducer, ReducerConfig, ReductionReport};

//! Session orchestration, configuration and memoized loading.
//!
//! # Example
//!
//! ```
//! use seisterra::session::{Session, VisualizationConfig};
//! use seisterra::seismic::{SeismicTrace, SliceRequest};
//! use seisterra::terrain::RawRaster;
//! use seisterra::types::Extent2D;
//!
//! let mut session = Session::new(VisualizationConfig::default().with_downsample_factor(1))?;
//!
//! let raster = RawRaster::new(vec![100.0, 120.0, 110.0, 90.0], 2, 2, Extent2D::new(0.0, 1.0, 0.0, 1.0))?;
//! session.load_terrain(&raster)?;
//!
//! let traces = vec![
//!     SeismicTrace::new(1, 1, vec![0.0, 1.0, -1.0], 4.0),
//!     SeismicTrace::new(2, 1, vec![0.5, -0.5, 0.0], 4.0),
//! ];
//! session.load_seismic(&traces)?;
//!
//! let frame = session.render(Some(&SliceRequest::depth(4.0)))?;
//! assert!(frame.seismic.is_some());
//! # Ok::<(), seisterra::EngineError>(())
//! ```

mod cache;
mod config;
mod context;

pub use cache::{CacheStats, Fingerprint, LoadCache};
pub use config::VisualizationConfig;
pub use context::{
    DEFAULT_CACHE_CAPACITY, LoadError, SceneFrame, SeismicLayer, Session,
};

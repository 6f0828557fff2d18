//! Seismic side of the engine: traces, the indexed volume and slicing.
//!
//! - [`SeismicTrace`]: one decoded trace with its (inline, crossline) position
//! - [`VolumeIndexer`]: densifies traces into a [`SeismicVolume`]
//! - [`SliceExtractor`]: cuts inline, crossline and depth slices

mod indexer;
mod slice;
mod trace;
mod volume;

pub use indexer::VolumeIndexer;
pub use slice::{SliceExtractor, SliceKind, SliceRequest, SliceResult, SliceTarget};
pub use trace::SeismicTrace;
pub use volume::{SeismicVolume, VolumeStatistics};

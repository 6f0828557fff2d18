//! Coordinate mapping into a shared render space.
//!
//! The renderer itself is external; this module produces the numeric arrays
//! and extents it consumes.

mod extent;

pub use extent::{
    ExtentMapper, RenderExtent, SliceCoordinates, TerrainSurface, VerticalAnchor,
};

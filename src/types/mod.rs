//! Strongly-typed domain types for safer APIs.
//!
//! - **Extents**: [`Extent2D`] describes the physical footprint of the terrain grid
//! - **Ranks**: [`InlineRank`], [`CrosslineRank`] and [`SampleIndex`] address
//!   positions inside a seismic volume, as opposed to survey coordinates
//!
//! # Example
//!
//! ```
//! use seisterra::types::{Extent2D, InlineRank, SampleIndex};
//!
//! let extent = Extent2D::new(0.0, 1000.0, 0.0, 500.0);
//! assert_eq!(extent.center(), (500.0, 250.0));
//!
//! let il = InlineRank::new(0);
//! let s = SampleIndex::new(10);
//! assert_ne!(il.get(), s.get());
//! ```

mod extent;
mod ranks;

pub use extent::Extent2D;
pub use ranks::{CrosslineRank, InlineRank, SampleIndex};

//! Error types for the alignment and slicing engine.
//!
//! Every engine operation reports failure through [`EngineError`]. Each
//! variant is a distinct, recoverable condition: the caller decides whether
//! to surface it to the user or retry with different inputs.

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Raster has zero area or no finite value to repair from.
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    /// No traces were supplied.
    #[error("Empty dataset: no seismic traces supplied")]
    EmptyDataset,

    /// Traces disagree on sample count or sample interval.
    #[error(
        "Inconsistent sampling at trace {trace}: expected {expected}, got {actual}"
    )]
    InconsistentSampling {
        /// Position of the offending trace in the input sequence
        trace: usize,
        /// Sampling of the first trace
        expected: String,
        /// Sampling of the offending trace
        actual: String,
    },

    /// Slice request lies entirely outside the volume's coverage.
    #[error("{axis} {requested} is outside the covered range [{min}, {max}]")]
    OutOfRange {
        /// Axis that was queried
        axis: &'static str,
        /// Requested coordinate or depth
        requested: f64,
        /// Smallest covered value
        min: f64,
        /// Largest covered value
        max: f64,
    },

    /// The session has no dataset of this kind loaded yet.
    #[error("No {0} loaded")]
    NotLoaded(&'static str),

    /// A numeric parameter is outside its accepted domain.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl EngineError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Create an inconsistent sampling error.
    pub fn inconsistent_sampling(
        trace: usize,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InconsistentSampling {
            trace,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

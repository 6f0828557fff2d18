//! Physical 2D extent of a raster.

use std::fmt;

use crate::error::{EngineError, Result};

/// Rectangular physical extent in source units.
///
/// Holds the min/max X and Y of a terrain raster. The seismic volume's
/// inline/crossline ranks are stretched onto this extent for rendering.
///
/// # Example
///
/// ```
/// use seisterra::types::Extent2D;
///
/// let extent = Extent2D::new(500_000.0, 510_000.0, 6_700_000.0, 6_705_000.0);
/// assert_eq!(extent.width(), 10_000.0);
/// assert_eq!(extent.height(), 5_000.0);
/// assert_eq!(extent.lerp_x(0.5), 505_000.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent2D {
    /// Minimum x-coordinate (western edge)
    pub x_min: f64,
    /// Maximum x-coordinate (eastern edge)
    pub x_max: f64,
    /// Minimum y-coordinate (southern edge)
    pub y_min: f64,
    /// Maximum y-coordinate (northern edge)
    pub y_max: f64,
}

impl Extent2D {
    /// Create a new extent.
    ///
    /// # Panics
    ///
    /// Panics if `x_max <= x_min`, `y_max <= y_min`, or any bound is not finite.
    /// Use [`Extent2D::try_new`] for externally supplied bounds.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        match Self::try_new(x_min, x_max, y_min, y_max) {
            Ok(extent) => extent,
            Err(e) => panic!("{}", e),
        }
    }

    /// Create a new extent, rejecting empty or non-finite bounds.
    pub fn try_new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        if ![x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite()) {
            return Err(EngineError::invalid_parameter(
                "extent",
                format!(
                    "bounds must be finite, got x [{}, {}], y [{}, {}]",
                    x_min, x_max, y_min, y_max
                ),
            ));
        }
        if x_max <= x_min {
            return Err(EngineError::invalid_parameter(
                "extent",
                format!("x_max ({}) must be greater than x_min ({})", x_max, x_min),
            ));
        }
        if y_max <= y_min {
            return Err(EngineError::invalid_parameter(
                "extent",
                format!("y_max ({}) must be greater than y_min ({})", y_max, y_min),
            ));
        }

        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Extent width (x_max - x_min).
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent height (y_max - y_min).
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Check if a point is inside the extent (inclusive).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Linear position along X: t=0 gives x_min, t=1 gives x_max.
    #[inline]
    pub fn lerp_x(&self, t: f64) -> f64 {
        self.x_min + t * self.width()
    }

    /// Linear position along Y: t=0 gives y_min, t=1 gives y_max.
    #[inline]
    pub fn lerp_y(&self, t: f64) -> f64 {
        self.y_min + t * self.height()
    }
}

impl fmt::Display for Extent2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2}, {:.2}] × [{:.2}, {:.2}]",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}

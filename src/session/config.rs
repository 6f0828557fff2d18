//! Visualization controls consumed by the engine.

use crate::error::{EngineError, Result};
use crate::render::VerticalAnchor;
use crate::terrain::{DEFAULT_OUTLIER_MAGNITUDE, ReducerConfig};

/// Values driving one visualization session.
///
/// Only numbers live here; widget layout and colour maps belong to the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualizationConfig {
    /// Keep every Nth raster row and column (1 = full resolution).
    pub downsample_factor: usize,
    /// Scale applied to elevations and depths.
    pub vertical_exaggeration: f64,
    /// Offset added to mapped seismic depths.
    pub depth_offset: f64,
    /// Terrain surface opacity in [0, 1]; passed to the renderer untouched.
    pub terrain_opacity: f64,
    /// Percentile of |amplitude| used as the symmetric display limit.
    pub contrast_percentile: f64,
    /// Reference level for depth zero.
    pub vertical_anchor: VerticalAnchor,
    /// NoData sentinel overriding the one declared by the raster.
    pub nodata_override: Option<f64>,
    /// Raster values with a larger magnitude are treated as NoData.
    pub outlier_magnitude: f64,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            downsample_factor: 4,
            vertical_exaggeration: 2.0,
            depth_offset: -500.0,
            terrain_opacity: 0.5,
            contrast_percentile: 98.0,
            vertical_anchor: VerticalAnchor::Datum,
            nodata_override: None,
            outlier_magnitude: DEFAULT_OUTLIER_MAGNITUDE,
        }
    }
}

impl VisualizationConfig {
    /// Full-resolution terrain with no exaggeration or offset.
    pub fn true_scale() -> Self {
        Self {
            downsample_factor: 1,
            vertical_exaggeration: 1.0,
            depth_offset: 0.0,
            ..Self::default()
        }
    }

    /// Set the downsample factor.
    pub fn with_downsample_factor(mut self, factor: usize) -> Self {
        self.downsample_factor = factor;
        self
    }

    /// Set the vertical exaggeration.
    pub fn with_vertical_exaggeration(mut self, exaggeration: f64) -> Self {
        self.vertical_exaggeration = exaggeration;
        self
    }

    /// Set the depth offset.
    pub fn with_depth_offset(mut self, offset: f64) -> Self {
        self.depth_offset = offset;
        self
    }

    /// Set the terrain opacity.
    pub fn with_terrain_opacity(mut self, opacity: f64) -> Self {
        self.terrain_opacity = opacity;
        self
    }

    /// Set the contrast percentile.
    pub fn with_contrast_percentile(mut self, percentile: f64) -> Self {
        self.contrast_percentile = percentile;
        self
    }

    /// Set the vertical anchor.
    pub fn with_vertical_anchor(mut self, anchor: VerticalAnchor) -> Self {
        self.vertical_anchor = anchor;
        self
    }

    /// Set a NoData sentinel override.
    pub fn with_nodata_override(mut self, nodata: f64) -> Self {
        self.nodata_override = Some(nodata);
        self
    }

    /// Reducer settings derived from this configuration.
    pub fn reducer_config(&self) -> ReducerConfig {
        ReducerConfig {
            nodata_override: self.nodata_override,
            outlier_magnitude: self.outlier_magnitude,
        }
    }

    /// Check every value against its accepted domain.
    pub fn validate(&self) -> Result<()> {
        if self.downsample_factor == 0 {
            return Err(EngineError::invalid_parameter(
                "downsample_factor",
                "must be a positive integer",
            ));
        }
        if !self.vertical_exaggeration.is_finite() || self.vertical_exaggeration <= 0.0 {
            return Err(EngineError::invalid_parameter(
                "vertical_exaggeration",
                format!("must be a positive number, got {}", self.vertical_exaggeration),
            ));
        }
        if !self.depth_offset.is_finite() {
            return Err(EngineError::invalid_parameter(
                "depth_offset",
                format!("must be finite, got {}", self.depth_offset),
            ));
        }
        if !(0.0..=1.0).contains(&self.terrain_opacity) {
            return Err(EngineError::invalid_parameter(
                "terrain_opacity",
                format!("must be within [0, 1], got {}", self.terrain_opacity),
            ));
        }
        if !(0.0..=100.0).contains(&self.contrast_percentile) {
            return Err(EngineError::invalid_parameter(
                "contrast_percentile",
                format!("must be within [0, 100], got {}", self.contrast_percentile),
            ));
        }
        self.reducer_config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(VisualizationConfig::default().validate().is_ok());
        assert!(VisualizationConfig::true_scale().validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = VisualizationConfig::default()
            .with_downsample_factor(8)
            .with_vertical_exaggeration(5.0)
            .with_terrain_opacity(0.2)
            .with_nodata_override(-32768.0);
        assert_eq!(config.downsample_factor, 8);
        assert_eq!(config.vertical_exaggeration, 5.0);
        assert_eq!(config.reducer_config().nodata_override, Some(-32768.0));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = VisualizationConfig::default();
        let cases = [
            (base.with_downsample_factor(0), "downsample_factor"),
            (base.with_vertical_exaggeration(0.0), "vertical_exaggeration"),
            (base.with_depth_offset(f64::INFINITY), "depth_offset"),
            (base.with_terrain_opacity(1.5), "terrain_opacity"),
            (base.with_contrast_percentile(-1.0), "contrast_percentile"),
            (
                VisualizationConfig {
                    outlier_magnitude: f64::INFINITY,
                    ..base
                },
                "outlier_magnitude",
            ),
        ];
        for (config, expected) in cases {
            match config.validate() {
                Err(EngineError::InvalidParameter { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected {} to be rejected, got {:?}", expected, other),
            }
        }
    }
}

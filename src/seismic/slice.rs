//! Slice extraction from an indexed volume.
//!
//! Three slice kinds are supported:
//!
//! | Kind        | Fixed axis | Result rows  | Result columns |
//! |-------------|------------|--------------|----------------|
//! | `Inline`    | inline     | crosslines   | depth samples  |
//! | `Crossline` | crossline  | inlines      | depth samples  |
//! | `Depth`     | depth/time | inlines      | crosslines     |
//!
//! Coordinate requests snap to the nearest available inline, crossline or
//! sample (ties go to the lower one). Inline and crossline numbers identify
//! distinct acquisition lines, so the extractor never interpolates between
//! them. A request outside the covered range fails instead of snapping to
//! the edge. Rank requests address positions directly and are clamped.

use std::fmt;

use super::SeismicVolume;
use crate::error::{EngineError, Result};
use crate::types::{CrosslineRank, InlineRank, SampleIndex};

/// Orientation of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceKind {
    /// Constant inline, spans (crossline, depth)
    Inline,
    /// Constant crossline, spans (inline, depth)
    Crossline,
    /// Constant depth/time, spans (inline, crossline)
    Depth,
}

impl SliceKind {
    fn axis_name(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Crossline => "crossline",
            Self::Depth => "depth",
        }
    }
}

impl fmt::Display for SliceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.axis_name())
    }
}

/// Where along the fixed axis the slice is taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliceTarget {
    /// Survey coordinate (inline/crossline number) or physical depth/time.
    Coordinate(f64),
    /// Position in the sorted axis, clamped to the valid range.
    Rank(i64),
}

/// A slice query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceRequest {
    /// Slice orientation
    pub kind: SliceKind,
    /// Position along the fixed axis
    pub target: SliceTarget,
}

impl SliceRequest {
    /// Request a slice at a coordinate or depth value.
    pub fn new(kind: SliceKind, value: f64) -> Self {
        Self {
            kind,
            target: SliceTarget::Coordinate(value),
        }
    }

    /// Constant-inline slice at an inline number.
    pub fn inline(inline: i32) -> Self {
        Self::new(SliceKind::Inline, inline as f64)
    }

    /// Constant-crossline slice at a crossline number.
    pub fn crossline(crossline: i32) -> Self {
        Self::new(SliceKind::Crossline, crossline as f64)
    }

    /// Constant-depth slice at a physical depth/time.
    pub fn depth(depth: f64) -> Self {
        Self::new(SliceKind::Depth, depth)
    }

    /// Slice at an axis position; out-of-range ranks are clamped.
    pub fn at_rank(kind: SliceKind, rank: i64) -> Self {
        Self {
            kind,
            target: SliceTarget::Rank(rank),
        }
    }
}

/// A 2D amplitude slice with the axis values it spans.
///
/// `data` is row-major with `rows * cols` values; see the module docs for
/// which axis runs along rows and columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceResult {
    kind: SliceKind,
    rows: usize,
    cols: usize,
    data: Vec<f32>,
    row_axis: Vec<f64>,
    col_axis: Vec<f64>,
    selected_rank: usize,
    selected_value: f64,
}

impl SliceResult {
    /// Slice orientation.
    pub fn kind(&self) -> SliceKind {
        self.kind
    }

    /// Shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major amplitudes.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Amplitude at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    /// Coordinates along the rows (crosslines or inlines).
    pub fn row_axis(&self) -> &[f64] {
        &self.row_axis
    }

    /// Coordinates along the columns (depths or crosslines).
    pub fn col_axis(&self) -> &[f64] {
        &self.col_axis
    }

    /// Rank (or sample index) of the fixed axis that was used.
    pub fn selected_rank(&self) -> usize {
        self.selected_rank
    }

    /// Coordinate or depth actually used, after snapping.
    pub fn selected_value(&self) -> f64 {
        self.selected_value
    }

    /// Symmetric amplitude limit for display contrast.
    ///
    /// Returns the `percentile`-th percentile of absolute amplitudes, using
    /// linear interpolation between order statistics. Display limits are
    /// then `(-limit, limit)`, which keeps zero at the centre of a diverging
    /// colour scale.
    pub fn symmetric_limit(&self, percentile: f64) -> Result<f32> {
        if !(0.0..=100.0).contains(&percentile) {
            return Err(EngineError::invalid_parameter(
                "contrast_percentile",
                format!("must be within [0, 100], got {}", percentile),
            ));
        }

        let mut magnitudes: Vec<f32> = self
            .data
            .iter()
            .filter(|v| v.is_finite())
            .map(|v| v.abs())
            .collect();
        if magnitudes.is_empty() {
            return Ok(0.0);
        }
        magnitudes.sort_unstable_by(f32::total_cmp);

        let pos = percentile / 100.0 * (magnitudes.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let t = (pos - lo as f64) as f32;
        Ok(magnitudes[lo] + t * (magnitudes[hi] - magnitudes[lo]))
    }
}

/// Extracts slices from a [`SeismicVolume`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceExtractor;

impl SliceExtractor {
    /// Extract the slice described by `request`.
    ///
    /// The volume is only read; calling twice with the same request yields
    /// identical results.
    pub fn extract(volume: &SeismicVolume, request: &SliceRequest) -> Result<SliceResult> {
        let axis: Vec<f64> = match request.kind {
            SliceKind::Inline => volume.inlines().iter().map(|&v| v as f64).collect(),
            SliceKind::Crossline => volume.crosslines().iter().map(|&v| v as f64).collect(),
            SliceKind::Depth => volume.depths().to_vec(),
        };

        let rank = match request.target {
            SliceTarget::Coordinate(value) => nearest_rank(&axis, value, request.kind)?,
            SliceTarget::Rank(rank) => rank.clamp(0, axis.len() as i64 - 1) as usize,
        };

        log::debug!(
            "Extracting {} slice at rank {} ({})",
            request.kind,
            rank,
            axis[rank]
        );

        let (n_il, n_xl, n_s) = volume.shape();
        let inline_axis = || volume.inlines().iter().map(|&v| v as f64).collect::<Vec<_>>();
        let crossline_axis = || {
            volume
                .crosslines()
                .iter()
                .map(|&v| v as f64)
                .collect::<Vec<_>>()
        };

        let (rows, cols, data, row_axis, col_axis) = match request.kind {
            SliceKind::Inline => (
                n_xl,
                n_s,
                volume.inline_plane(InlineRank::new(rank)).to_vec(),
                crossline_axis(),
                volume.depths().to_vec(),
            ),
            SliceKind::Crossline => {
                let xl = CrosslineRank::new(rank);
                let mut data = Vec::with_capacity(n_il * n_s);
                for il in InlineRank::iter(n_il) {
                    data.extend_from_slice(volume.trace(il, xl));
                }
                (n_il, n_s, data, inline_axis(), volume.depths().to_vec())
            }
            SliceKind::Depth => {
                let s = SampleIndex::new(rank);
                let mut data = Vec::with_capacity(n_il * n_xl);
                for il in InlineRank::iter(n_il) {
                    for xl in CrosslineRank::iter(n_xl) {
                        data.push(volume.amplitude(il, xl, s));
                    }
                }
                (n_il, n_xl, data, inline_axis(), crossline_axis())
            }
        };

        Ok(SliceResult {
            kind: request.kind,
            rows,
            cols,
            data,
            row_axis,
            col_axis,
            selected_rank: rank,
            selected_value: axis[rank],
        })
    }
}

/// Position of the value in sorted `axis` closest to `target`.
///
/// Ties go to the lower position. Targets outside `[axis[0], axis[last]]`
/// are rejected.
fn nearest_rank(axis: &[f64], target: f64, kind: SliceKind) -> Result<usize> {
    if !target.is_finite() {
        return Err(EngineError::invalid_parameter(
            "slice_request",
            format!("{} must be finite, got {}", kind, target),
        ));
    }

    let min = axis[0];
    let max = axis[axis.len() - 1];
    if target < min || target > max {
        return Err(EngineError::OutOfRange {
            axis: kind.axis_name(),
            requested: target,
            min,
            max,
        });
    }

    // First position with axis[i] >= target
    let upper = axis.partition_point(|&v| v < target);
    if upper == 0 {
        return Ok(0);
    }
    let lower = upper - 1;
    if upper == axis.len() || target - axis[lower] <= axis[upper] - target {
        Ok(lower)
    } else {
        Ok(upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seismic::{SeismicTrace, VolumeIndexer};

    /// 2 inlines {1, 3} x 3 crosslines {10, 20, 30} x 5 samples at 4 ms.
    /// Amplitude encodes position: il_rank * 100 + xl_rank * 10 + sample.
    fn volume() -> SeismicVolume {
        let mut traces = Vec::new();
        for (i, il) in [1, 3].into_iter().enumerate() {
            for (j, xl) in [10, 20, 30].into_iter().enumerate() {
                let samples = (0..5).map(|s| (i * 100 + j * 10 + s) as f32).collect();
                traces.push(SeismicTrace::new(il, xl, samples, 4.0));
            }
        }
        VolumeIndexer::index(&traces).unwrap()
    }

    #[test]
    fn test_nearest_rank_ties_go_lower() {
        let axis = [1.0, 3.0];
        assert_eq!(nearest_rank(&axis, 2.0, SliceKind::Inline).unwrap(), 0);
        assert_eq!(nearest_rank(&axis, 2.1, SliceKind::Inline).unwrap(), 1);
        assert_eq!(nearest_rank(&axis, 3.0, SliceKind::Inline).unwrap(), 1);
        assert_eq!(nearest_rank(&axis, 1.0, SliceKind::Inline).unwrap(), 0);
    }

    #[test]
    fn test_nearest_rank_out_of_range() {
        let axis = [1.0, 3.0];
        assert!(matches!(
            nearest_rank(&axis, 0.5, SliceKind::Inline),
            Err(EngineError::OutOfRange { axis: "inline", .. })
        ));
        assert!(matches!(
            nearest_rank(&axis, f64::NAN, SliceKind::Inline),
            Err(EngineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_inline_slice() {
        let v = volume();
        let slice = SliceExtractor::extract(&v, &SliceRequest::inline(3)).unwrap();
        assert_eq!(slice.kind(), SliceKind::Inline);
        assert_eq!(slice.shape(), (3, 5));
        assert_eq!(slice.row_axis(), &[10.0, 20.0, 30.0]);
        assert_eq!(slice.col_axis(), &[0.0, 4.0, 8.0, 12.0, 16.0]);
        assert_eq!(slice.get(2, 4), 124.0);
        assert_eq!(slice.selected_value(), 3.0);
    }

    #[test]
    fn test_inline_between_lines_snaps_lower() {
        let v = volume();
        let slice = SliceExtractor::extract(&v, &SliceRequest::inline(2)).unwrap();
        assert_eq!(slice.selected_rank(), 0);
        assert_eq!(slice.selected_value(), 1.0);
        assert_eq!(slice.get(0, 0), 0.0);
    }

    #[test]
    fn test_crossline_slice() {
        let v = volume();
        let slice = SliceExtractor::extract(&v, &SliceRequest::crossline(26)).unwrap();
        assert_eq!(slice.shape(), (2, 5));
        assert_eq!(slice.selected_value(), 30.0);
        assert_eq!(slice.row_axis(), &[1.0, 3.0]);
        assert_eq!(slice.get(1, 3), 123.0);
    }

    #[test]
    fn test_depth_slice() {
        let v = volume();
        let slice = SliceExtractor::extract(&v, &SliceRequest::depth(6.0)).unwrap();
        // 6 ms is halfway between samples 1 and 2
        assert_eq!(slice.selected_rank(), 1);
        assert_eq!(slice.shape(), (2, 3));
        assert_eq!(slice.col_axis(), &[10.0, 20.0, 30.0]);
        assert_eq!(slice.get(1, 2), 121.0);
    }

    #[test]
    fn test_depth_at_max_selects_last_sample() {
        let v = volume();
        let slice = SliceExtractor::extract(&v, &SliceRequest::depth(16.0)).unwrap();
        assert_eq!(slice.selected_rank(), 4);
    }

    #[test]
    fn test_depth_beyond_range() {
        let v = volume();
        let err = SliceExtractor::extract(&v, &SliceRequest::depth(16.5)).unwrap_err();
        assert!(matches!(err, EngineError::OutOfRange { axis: "depth", .. }));
    }

    #[test]
    fn test_rank_requests_clamp() {
        let v = volume();
        let high = SliceExtractor::extract(&v, &SliceRequest::at_rank(SliceKind::Depth, 99)).unwrap();
        assert_eq!(high.selected_rank(), 4);
        let low =
            SliceExtractor::extract(&v, &SliceRequest::at_rank(SliceKind::Crossline, -3)).unwrap();
        assert_eq!(low.selected_rank(), 0);
        assert_eq!(low.selected_value(), 10.0);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let v = volume();
        let request = SliceRequest::crossline(20);
        let a = SliceExtractor::extract(&v, &request).unwrap();
        let b = SliceExtractor::extract(&v, &request).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_symmetric_limit() {
        let v = volume();
        let slice = SliceExtractor::extract(&v, &SliceRequest::inline(1)).unwrap();
        // |amplitudes| of inline 1 are 0..=24 without 5..=9 and 15..=19
        assert_eq!(slice.symmetric_limit(100.0).unwrap(), 24.0);
        assert_eq!(slice.symmetric_limit(0.0).unwrap(), 0.0);
        assert!(slice.symmetric_limit(101.0).is_err());
    }

    #[test]
    fn test_symmetric_limit_interpolates() {
        let traces = vec![SeismicTrace::new(1, 1, vec![-4.0, 1.0, 2.0, 3.0], 1.0)];
        let v = VolumeIndexer::index(&traces).unwrap();
        let slice = SliceExtractor::extract(&v, &SliceRequest::inline(1)).unwrap();
        // sorted magnitudes [1, 2, 3, 4]; 50th percentile sits at 2.5
        assert!((slice.symmetric_limit(50.0).unwrap() - 2.5).abs() < 1e-6);
    }
}

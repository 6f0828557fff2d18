//! Shared rendering extent for terrain and seismic data.
//!
//! The seismic volume lives in index space (inline rank, crossline rank,
//! depth) while the terrain lives in the raster's physical units. Both are
//! brought into one render space:
//!
//! - inline rank `0..n_il-1` stretches linearly onto `x_min..x_max`
//! - crossline rank `0..n_xl-1` stretches linearly onto `y_min..y_max`
//! - depth maps to `z = datum - depth * exaggeration + offset`
//! - terrain elevation maps to `z = elevation * exaggeration`
//!
//! The stretch is a normalized-extent fit, not a geographic reprojection.
//! The datum is zero by default; [`VerticalAnchor::TerrainMean`] moves it to
//! the mean exaggerated terrain elevation.

use std::fmt;

use crate::error::{EngineError, Result};
use crate::seismic::{SeismicVolume, SliceKind, SliceResult};
use crate::terrain::ElevationGrid;
use crate::types::Extent2D;

/// Reference level for depth zero in render space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAnchor {
    /// Depth zero at render z = 0 (before the offset).
    #[default]
    Datum,
    /// Depth zero at the mean exaggerated terrain elevation.
    TerrainMean,
}

/// Bounding box and scale factors of the shared render space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderExtent {
    /// Horizontal footprint (the terrain grid's extent)
    pub horizontal: Extent2D,
    /// Lowest render z of terrain or seismic
    pub z_min: f64,
    /// Highest render z of terrain or seismic
    pub z_max: f64,
    /// Vertical exaggeration applied to depth and elevation
    pub vertical_exaggeration: f64,
    /// Offset added to mapped depths
    pub depth_offset: f64,
    /// Render z of depth zero before the offset
    pub datum_z: f64,
    /// Render x distance between adjacent inline ranks
    pub x_per_inline: f64,
    /// Render y distance between adjacent crossline ranks
    pub y_per_crossline: f64,
    /// Exaggerated terrain elevation range
    pub terrain_z_range: (f64, f64),
    /// Render z of the first and last seismic sample
    pub seismic_z_range: Option<(f64, f64)>,
    n_inlines: usize,
    n_crosslines: usize,
}

impl RenderExtent {
    /// Render x of an inline rank.
    pub fn inline_rank_to_x(&self, rank: usize) -> f64 {
        self.horizontal.lerp_x(rank_fraction(rank, self.n_inlines))
    }

    /// Render y of a crossline rank.
    pub fn crossline_rank_to_y(&self, rank: usize) -> f64 {
        self.horizontal.lerp_y(rank_fraction(rank, self.n_crosslines))
    }

    /// Render z of a seismic depth/time.
    #[inline]
    pub fn depth_to_z(&self, depth: f64) -> f64 {
        self.datum_z - depth * self.vertical_exaggeration + self.depth_offset
    }

    /// Render z of a terrain elevation.
    #[inline]
    pub fn elevation_to_z(&self, elevation: f64) -> f64 {
        elevation * self.vertical_exaggeration
    }

    /// Number of inline ranks stretched over the extent.
    pub fn n_inlines(&self) -> usize {
        self.n_inlines
    }

    /// Number of crossline ranks stretched over the extent.
    pub fn n_crosslines(&self) -> usize {
        self.n_crosslines
    }
}

impl fmt::Display for RenderExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} × [{:.2}, {:.2}] (exaggeration {}, offset {})",
            self.horizontal,
            self.z_min,
            self.z_max,
            self.vertical_exaggeration,
            self.depth_offset
        )
    }
}

/// Position of `rank` in `0..n` as a fraction of the axis; a single rank sits mid-way.
fn rank_fraction(rank: usize, n: usize) -> f64 {
    if n <= 1 {
        return 0.5;
    }
    rank as f64 / (n - 1) as f64
}

/// Render coordinates for every cell of a slice.
///
/// `x`, `y` and `z` are row-major with the same shape as the slice data.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceCoordinates {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Render x per cell
    pub x: Vec<f64>,
    /// Render y per cell
    pub y: Vec<f64>,
    /// Render z per cell
    pub z: Vec<f64>,
}

/// Terrain surface in render space.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainSurface {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Render x of each column
    pub x: Vec<f64>,
    /// Render y of each row (row 0 is the northern edge)
    pub y: Vec<f64>,
    /// Exaggerated elevation, row-major
    pub z: Vec<f64>,
}

/// Computes the shared render space.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtentMapper {
    anchor: VerticalAnchor,
}

impl ExtentMapper {
    /// Create a mapper with the given vertical anchor.
    pub fn new(anchor: VerticalAnchor) -> Self {
        Self { anchor }
    }

    /// Active vertical anchor.
    pub fn anchor(&self) -> VerticalAnchor {
        self.anchor
    }

    /// Shared extent for a terrain grid and a seismic volume.
    ///
    /// Fails with [`EngineError::InvalidParameter`] if the exaggeration is
    /// not a positive finite number or the offset is not finite.
    pub fn map_extent(
        &self,
        grid: &ElevationGrid,
        volume: &SeismicVolume,
        vertical_exaggeration: f64,
        depth_offset: f64,
    ) -> Result<RenderExtent> {
        let mut extent = self.map_terrain_extent(grid, vertical_exaggeration, depth_offset)?;

        let (top, bottom) = volume.depth_range();
        let z_top = extent.depth_to_z(top);
        let z_bottom = extent.depth_to_z(bottom);
        extent.seismic_z_range = Some((z_top, z_bottom));
        extent.z_min = extent.z_min.min(z_bottom);
        extent.z_max = extent.z_max.max(z_top);

        extent.n_inlines = volume.n_inlines();
        extent.n_crosslines = volume.n_crosslines();
        if extent.n_inlines == 1 || extent.n_crosslines == 1 {
            log::warn!(
                "Volume has a single inline or crossline ({}x{}); it maps to the extent centre",
                extent.n_inlines,
                extent.n_crosslines
            );
        }
        extent.x_per_inline = rank_spacing(extent.horizontal.width(), extent.n_inlines);
        extent.y_per_crossline = rank_spacing(extent.horizontal.height(), extent.n_crosslines);

        log::debug!("Render extent: {}", extent);
        Ok(extent)
    }

    /// Render extent for terrain alone, with no seismic axes.
    pub fn map_terrain_extent(
        &self,
        grid: &ElevationGrid,
        vertical_exaggeration: f64,
        depth_offset: f64,
    ) -> Result<RenderExtent> {
        if !vertical_exaggeration.is_finite() || vertical_exaggeration <= 0.0 {
            return Err(EngineError::invalid_parameter(
                "vertical_exaggeration",
                format!("must be a positive number, got {}", vertical_exaggeration),
            ));
        }
        if !depth_offset.is_finite() {
            return Err(EngineError::invalid_parameter(
                "depth_offset",
                format!("must be finite, got {}", depth_offset),
            ));
        }

        let (lo, hi) = grid.elevation_range();
        let terrain_z_range = (lo * vertical_exaggeration, hi * vertical_exaggeration);
        let datum_z = match self.anchor {
            VerticalAnchor::Datum => 0.0,
            VerticalAnchor::TerrainMean => grid.mean() * vertical_exaggeration,
        };

        Ok(RenderExtent {
            horizontal: *grid.extent(),
            z_min: terrain_z_range.0,
            z_max: terrain_z_range.1,
            vertical_exaggeration,
            depth_offset,
            datum_z,
            x_per_inline: 0.0,
            y_per_crossline: 0.0,
            terrain_z_range,
            seismic_z_range: None,
            n_inlines: 0,
            n_crosslines: 0,
        })
    }

    /// Render coordinates for every cell of `slice`.
    ///
    /// `extent` must have been computed for `volume` and `grid`.
    pub fn map_slice_coordinates(
        &self,
        slice: &SliceResult,
        volume: &SeismicVolume,
        grid: &ElevationGrid,
        extent: &RenderExtent,
    ) -> Result<SliceCoordinates> {
        if extent.n_inlines != volume.n_inlines()
            || extent.n_crosslines != volume.n_crosslines()
            || extent.horizontal != *grid.extent()
        {
            return Err(EngineError::invalid_parameter(
                "extent",
                "render extent was computed for a different grid or volume",
            ));
        }

        let (rows, cols) = slice.shape();
        let n = rows * cols;
        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);
        let mut z = Vec::with_capacity(n);
        let fixed = slice.selected_rank();

        match slice.kind() {
            SliceKind::Inline => {
                let x0 = extent.inline_rank_to_x(fixed);
                for xl in 0..rows {
                    let y0 = extent.crossline_rank_to_y(xl);
                    for &depth in slice.col_axis() {
                        x.push(x0);
                        y.push(y0);
                        z.push(extent.depth_to_z(depth));
                    }
                }
            }
            SliceKind::Crossline => {
                let y0 = extent.crossline_rank_to_y(fixed);
                for il in 0..rows {
                    let x0 = extent.inline_rank_to_x(il);
                    for &depth in slice.col_axis() {
                        x.push(x0);
                        y.push(y0);
                        z.push(extent.depth_to_z(depth));
                    }
                }
            }
            SliceKind::Depth => {
                let z0 = extent.depth_to_z(slice.selected_value());
                for il in 0..rows {
                    let x0 = extent.inline_rank_to_x(il);
                    for xl in 0..cols {
                        x.push(x0);
                        y.push(extent.crossline_rank_to_y(xl));
                        z.push(z0);
                    }
                }
            }
        }

        Ok(SliceCoordinates { rows, cols, x, y, z })
    }

    /// Terrain surface in render space.
    ///
    /// Columns spread evenly over `x_min..x_max`; rows run from `y_max`
    /// (row 0) down to `y_min`.
    pub fn map_terrain(&self, grid: &ElevationGrid, extent: &RenderExtent) -> TerrainSurface {
        let (rows, cols) = grid.shape();
        let h = &extent.horizontal;
        let x = (0..cols).map(|j| h.lerp_x(rank_fraction(j, cols))).collect();
        let y = (0..rows)
            .map(|i| h.lerp_y(1.0 - rank_fraction(i, rows)))
            .collect();
        let z = grid
            .values()
            .iter()
            .map(|&e| extent.elevation_to_z(e))
            .collect();

        TerrainSurface { rows, cols, x, y, z }
    }
}

fn rank_spacing(span: f64, n: usize) -> f64 {
    if n <= 1 { 0.0 } else { span / (n - 1) as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seismic::{SeismicTrace, SliceExtractor, SliceRequest, VolumeIndexer};

    fn grid() -> ElevationGrid {
        ElevationGrid::new(
            vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0],
            2,
            3,
            Extent2D::new(0.0, 200.0, 0.0, 100.0),
        )
        .unwrap()
    }

    /// Inlines {1, 2, 3}, crosslines {10, 20}, samples at 0, 10, 20, 30.
    fn volume() -> SeismicVolume {
        let mut traces = Vec::new();
        for il in 1..=3 {
            for xl in [10, 20] {
                traces.push(SeismicTrace::new(il, xl, vec![1.0; 4], 10.0));
            }
        }
        VolumeIndexer::index(&traces).unwrap()
    }

    #[test]
    fn test_rank_stretch() {
        let e = ExtentMapper::default()
            .map_extent(&grid(), &volume(), 1.0, 0.0)
            .unwrap();
        assert_eq!(e.inline_rank_to_x(0), 0.0);
        assert_eq!(e.inline_rank_to_x(1), 100.0);
        assert_eq!(e.inline_rank_to_x(2), 200.0);
        assert_eq!(e.crossline_rank_to_y(0), 0.0);
        assert_eq!(e.crossline_rank_to_y(1), 100.0);
        assert_eq!(e.x_per_inline, 100.0);
        assert_eq!(e.y_per_crossline, 100.0);
    }

    #[test]
    fn test_depth_mapping() {
        let e = ExtentMapper::default()
            .map_extent(&grid(), &volume(), 2.0, -500.0)
            .unwrap();
        assert_eq!(e.depth_to_z(0.0), -500.0);
        assert_eq!(e.depth_to_z(30.0), -560.0);
        assert_eq!(e.seismic_z_range, Some((-500.0, -560.0)));
        assert_eq!(e.z_min, -560.0);
        assert_eq!(e.z_max, 120.0);
    }

    #[test]
    fn test_terrain_mean_anchor() {
        let e = ExtentMapper::new(VerticalAnchor::TerrainMean)
            .map_extent(&grid(), &volume(), 2.0, 0.0)
            .unwrap();
        // mean elevation 35, exaggerated 70
        assert_eq!(e.datum_z, 70.0);
        assert_eq!(e.depth_to_z(10.0), 50.0);
    }

    #[test]
    fn test_exaggeration_doubles_terrain_spread() {
        let mapper = ExtentMapper::default();
        let e1 = mapper.map_extent(&grid(), &volume(), 1.0, 0.0).unwrap();
        let e2 = mapper.map_extent(&grid(), &volume(), 2.0, 0.0).unwrap();
        let spread = |e: &RenderExtent| e.terrain_z_range.1 - e.terrain_z_range.0;
        assert_eq!(spread(&e2), 2.0 * spread(&e1));
        assert_eq!(e1.horizontal, e2.horizontal);
    }

    #[test]
    fn test_invalid_exaggeration() {
        let mapper = ExtentMapper::default();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                mapper.map_extent(&grid(), &volume(), bad, 0.0),
                Err(EngineError::InvalidParameter {
                    name: "vertical_exaggeration",
                    ..
                })
            ));
        }
        assert!(mapper.map_extent(&grid(), &volume(), 1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_inline_slice_coordinates() {
        let (g, v) = (grid(), volume());
        let mapper = ExtentMapper::default();
        let e = mapper.map_extent(&g, &v, 1.0, 0.0).unwrap();
        let slice = SliceExtractor::extract(&v, &SliceRequest::inline(2)).unwrap();
        let c = mapper.map_slice_coordinates(&slice, &v, &g, &e).unwrap();

        assert_eq!((c.rows, c.cols), (2, 4));
        assert!(c.x.iter().all(|&x| x == 100.0));
        assert_eq!(c.y[0], 0.0);
        assert_eq!(c.y[4], 100.0);
        assert_eq!(&c.z[..4], &[0.0, -10.0, -20.0, -30.0]);
    }

    #[test]
    fn test_depth_slice_coordinates() {
        let (g, v) = (grid(), volume());
        let mapper = ExtentMapper::default();
        let e = mapper.map_extent(&g, &v, 3.0, 100.0).unwrap();
        let slice = SliceExtractor::extract(&v, &SliceRequest::depth(20.0)).unwrap();
        let c = mapper.map_slice_coordinates(&slice, &v, &g, &e).unwrap();

        assert_eq!((c.rows, c.cols), (3, 2));
        assert!(c.z.iter().all(|&z| z == 40.0));
        assert_eq!(c.x, vec![0.0, 0.0, 100.0, 100.0, 200.0, 200.0]);
        assert_eq!(c.y, vec![0.0, 100.0, 0.0, 100.0, 0.0, 100.0]);
    }

    #[test]
    fn test_crossline_slice_coordinates() {
        let (g, v) = (grid(), volume());
        let mapper = ExtentMapper::default();
        let e = mapper.map_extent(&g, &v, 1.0, 0.0).unwrap();
        let slice = SliceExtractor::extract(&v, &SliceRequest::crossline(20)).unwrap();
        let c = mapper.map_slice_coordinates(&slice, &v, &g, &e).unwrap();

        assert_eq!((c.rows, c.cols), (3, 4));
        assert!(c.y.iter().all(|&y| y == 100.0));
        assert_eq!(c.x[4], 100.0);
    }

    #[test]
    fn test_mismatched_extent_rejected() {
        let (g, v) = (grid(), volume());
        let mapper = ExtentMapper::default();
        let terrain_only = mapper.map_terrain_extent(&g, 1.0, 0.0).unwrap();
        let slice = SliceExtractor::extract(&v, &SliceRequest::inline(1)).unwrap();
        assert!(
            mapper
                .map_slice_coordinates(&slice, &v, &g, &terrain_only)
                .is_err()
        );
    }

    #[test]
    fn test_terrain_surface() {
        let g = grid();
        let mapper = ExtentMapper::default();
        let e = mapper.map_terrain_extent(&g, 2.0, 0.0).unwrap();
        let s = mapper.map_terrain(&g, &e);

        assert_eq!(s.x, vec![0.0, 100.0, 200.0]);
        assert_eq!(s.y, vec![100.0, 0.0]);
        assert_eq!(s.z, vec![20.0, 40.0, 60.0, 80.0, 100.0, 120.0]);
    }

    #[test]
    fn test_single_rank_sits_in_middle() {
        let v = VolumeIndexer::index(&[SeismicTrace::new(7, 7, vec![0.0; 2], 1.0)]).unwrap();
        let e = ExtentMapper::default()
            .map_extent(&grid(), &v, 1.0, 0.0)
            .unwrap();
        assert_eq!(e.inline_rank_to_x(0), 100.0);
        assert_eq!(e.crossline_rank_to_y(0), 50.0);
        assert_eq!(e.x_per_inline, 0.0);
    }

    #[test]
    fn test_rank_mapping_follows_offset_extent() {
        let g = ElevationGrid::new(
            vec![0.0; 6],
            2,
            3,
            Extent2D::new(500_000.0, 500_400.0, 6_000_000.0, 6_000_200.0),
        )
        .unwrap();
        let mapper = ExtentMapper::default();
        let e = mapper.map_extent(&g, &volume(), 1.0, 0.0).unwrap();

        assert_eq!(e.inline_rank_to_x(1), g.extent().lerp_x(0.5));
        assert_eq!(e.inline_rank_to_x(2), 500_400.0);
        assert_eq!(e.crossline_rank_to_y(1), 6_000_200.0);

        let s = mapper.map_terrain(&g, &e);
        assert_eq!(s.x, vec![500_000.0, 500_200.0, 500_400.0]);
        assert_eq!(s.y, vec![6_000_200.0, 6_000_000.0]);
    }
}

//! Per-session orchestration.
//!
//! A [`Session`] owns the currently loaded terrain grid and seismic volume
//! and sequences reduction, indexing, slicing and extent mapping for each
//! visualization request.
//!
//! Loaded datasets are published as `Arc`s only after construction has
//! fully succeeded, so readers never see a partial dataset and a failed
//! reload leaves the previous one in place. Both dataset types are
//! immutable, so clones of the `Arc`s can be read from other threads while
//! the session moves on.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use super::{CacheStats, Fingerprint, LoadCache, VisualizationConfig};
use crate::error::{EngineError, Result};
use crate::io::{GeoTiffError, read_geotiff_raster};
use crate::render::{ExtentMapper, RenderExtent, SliceCoordinates, TerrainSurface};
use crate::seismic::{SeismicTrace, SeismicVolume, SliceExtractor, SliceRequest, SliceResult, VolumeIndexer};
use crate::terrain::{ElevationGrid, GridReducer, RawRaster};

/// Default number of entries kept per cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

/// Error returned when loading from a file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Engine rejected the decoded data
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The file could not be decoded
    #[error(transparent)]
    GeoTiff(#[from] GeoTiffError),
}

/// Seismic part of a rendered scene.
#[derive(Debug, Clone)]
pub struct SeismicLayer {
    /// Extracted amplitudes
    pub slice: SliceResult,
    /// Render coordinates of every slice cell
    pub coordinates: SliceCoordinates,
    /// Symmetric display limits (-v, v) from the contrast percentile
    pub amplitude_limits: (f32, f32),
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct SceneFrame {
    /// Shared render extent
    pub extent: RenderExtent,
    /// Exaggerated terrain surface
    pub terrain: TerrainSurface,
    /// Terrain opacity, passed through from the configuration
    pub terrain_opacity: f64,
    /// Seismic slice, when one was requested
    pub seismic: Option<SeismicLayer>,
}

/// Session state: configuration, loaded datasets and load caches.
#[derive(Debug)]
pub struct Session {
    config: VisualizationConfig,
    terrain: Option<Arc<ElevationGrid>>,
    volume: Option<Arc<SeismicVolume>>,
    terrain_cache: LoadCache<ElevationGrid>,
    volume_cache: LoadCache<SeismicVolume>,
}

impl Session {
    /// Create an empty session.
    pub fn new(config: VisualizationConfig) -> Result<Self> {
        Self::with_cache_capacity(config, DEFAULT_CACHE_CAPACITY)
    }

    /// Create an empty session with a custom cache size per dataset kind.
    pub fn with_cache_capacity(config: VisualizationConfig, capacity: usize) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            terrain: None,
            volume: None,
            terrain_cache: LoadCache::new(capacity),
            volume_cache: LoadCache::new(capacity),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &VisualizationConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// Loaded datasets are kept; a changed downsample factor or NoData
    /// setting takes effect on the next terrain load.
    pub fn set_config(&mut self, config: VisualizationConfig) -> Result<()> {
        config.validate()?;
        if config.reducer_config() != self.config.reducer_config()
            || config.downsample_factor != self.config.downsample_factor
        {
            log::info!("Terrain reduction settings changed; reload terrain to apply them");
        }
        self.config = config;
        Ok(())
    }

    /// Currently loaded terrain grid.
    pub fn terrain(&self) -> Option<Arc<ElevationGrid>> {
        self.terrain.clone()
    }

    /// Currently loaded seismic volume.
    pub fn volume(&self) -> Option<Arc<SeismicVolume>> {
        self.volume.clone()
    }

    /// Reduce a decoded raster and make it the session's terrain.
    ///
    /// The load cache is keyed on the full raster content, so a repeat
    /// returns an equal but independent grid rather than saving work.
    pub fn load_terrain(&mut self, raster: &RawRaster) -> Result<Arc<ElevationGrid>> {
        let factor = self.config.downsample_factor;
        let reducer_config = self.config.reducer_config();
        let key = Fingerprint::of_raster(raster, factor, &reducer_config);

        let grid = self.terrain_cache.get_or_try_insert_with(key, || {
            GridReducer::new(reducer_config).reduce(raster, factor)
        })?;
        Ok(self.publish_terrain(grid))
    }

    /// Decode, reduce and load a GeoTIFF.
    ///
    /// Keyed by path, file metadata and reduction settings, so repeating a
    /// load skips decoding entirely.
    pub fn load_terrain_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> std::result::Result<Arc<ElevationGrid>, LoadError> {
        let path = path.as_ref();
        let factor = self.config.downsample_factor;
        let reducer_config = self.config.reducer_config();
        let key = Fingerprint::of_raster_file(path, factor, &reducer_config);

        let grid = match self.terrain_cache.get(&key) {
            Some(grid) => grid,
            None => {
                let raster = read_geotiff_raster(path)?;
                let grid = GridReducer::new(reducer_config).reduce(&raster, factor)?;
                self.terrain_cache.insert(key, &grid);
                grid
            }
        };
        Ok(self.publish_terrain(grid))
    }

    /// Index traces and make the result the session's seismic volume.
    ///
    /// Like [`Session::load_terrain`], the cache lookup hashes every sample
    /// and a hit copies the volume.
    pub fn load_seismic(&mut self, traces: &[SeismicTrace]) -> Result<Arc<SeismicVolume>> {
        let key = Fingerprint::of_traces(traces);
        let volume = self
            .volume_cache
            .get_or_try_insert_with(key, || VolumeIndexer::index(traces))?;

        let volume = Arc::new(volume);
        log::info!(
            "Loaded seismic volume {:?} ({} live traces)",
            volume.shape(),
            volume.live_trace_count()
        );
        self.volume = Some(Arc::clone(&volume));
        Ok(volume)
    }

    fn publish_terrain(&mut self, grid: ElevationGrid) -> Arc<ElevationGrid> {
        let grid = Arc::new(grid);
        log::info!("Loaded terrain grid {:?}", grid.shape());
        self.terrain = Some(Arc::clone(&grid));
        grid
    }

    /// Drop both datasets. Caches are kept.
    pub fn unload(&mut self) {
        self.terrain = None;
        self.volume = None;
    }

    /// Drop all cached load results.
    pub fn clear_caches(&mut self) {
        self.terrain_cache.clear();
        self.volume_cache.clear();
    }

    /// Cache counters for (terrain, seismic).
    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        (self.terrain_cache.stats(), self.volume_cache.stats())
    }

    fn require_terrain(&self) -> Result<&Arc<ElevationGrid>> {
        self.terrain.as_ref().ok_or(EngineError::NotLoaded("terrain grid"))
    }

    fn require_volume(&self) -> Result<&Arc<SeismicVolume>> {
        self.volume.as_ref().ok_or(EngineError::NotLoaded("seismic volume"))
    }

    /// Slice the loaded volume.
    pub fn extract(&self, request: &SliceRequest) -> Result<SliceResult> {
        SliceExtractor::extract(self.require_volume()?, request)
    }

    /// Render extent for the loaded datasets and current configuration.
    ///
    /// Covers the terrain alone when no volume is loaded.
    pub fn render_extent(&self) -> Result<RenderExtent> {
        let grid = self.require_terrain()?;
        let mapper = self.mapper();
        match &self.volume {
            Some(volume) => mapper.map_extent(
                grid,
                volume,
                self.config.vertical_exaggeration,
                self.config.depth_offset,
            ),
            None => mapper.map_terrain_extent(
                grid,
                self.config.vertical_exaggeration,
                self.config.depth_offset,
            ),
        }
    }

    /// Assemble a frame: terrain, plus a seismic slice if `request` is given.
    pub fn render(&self, request: Option<&SliceRequest>) -> Result<SceneFrame> {
        let grid = self.require_terrain()?;
        let mapper = self.mapper();

        let (extent, seismic) = match request {
            Some(request) => {
                let volume = self.require_volume()?;
                let extent = mapper.map_extent(
                    grid,
                    volume,
                    self.config.vertical_exaggeration,
                    self.config.depth_offset,
                )?;
                let slice = SliceExtractor::extract(volume, request)?;
                let coordinates = mapper.map_slice_coordinates(&slice, volume, grid, &extent)?;
                let limit = slice.symmetric_limit(self.config.contrast_percentile)?;
                let layer = SeismicLayer {
                    slice,
                    coordinates,
                    amplitude_limits: (-limit, limit),
                };
                (extent, Some(layer))
            }
            None => (self.render_extent()?, None),
        };

        let terrain = mapper.map_terrain(grid, &extent);
        Ok(SceneFrame {
            extent,
            terrain,
            terrain_opacity: self.config.terrain_opacity,
            seismic,
        })
    }

    fn mapper(&self) -> ExtentMapper {
        ExtentMapper::new(self.config.vertical_anchor)
    }
}

//! Indexed 3D seismic volume.

use std::fmt;

use crate::types::{CrosslineRank, InlineRank, SampleIndex};

/// Dense 3D amplitude volume addressed by (inline rank, crossline rank, sample).
///
/// Built by [`VolumeIndexer`](super::VolumeIndexer) and immutable afterwards.
/// Amplitudes are stored so that each trace is contiguous:
/// `data[(il * n_crosslines + xl) * n_samples + s]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SeismicVolume {
    pub(crate) inlines: Vec<i32>,
    pub(crate) crosslines: Vec<i32>,
    pub(crate) depths: Vec<f64>,
    pub(crate) sample_interval: f64,
    pub(crate) data: Vec<f32>,
    /// True where an input trace exists
    pub(crate) live: Vec<bool>,
}

impl SeismicVolume {
    /// Shape as (#inlines, #crosslines, #samples).
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.inlines.len(), self.crosslines.len(), self.depths.len())
    }

    /// Number of distinct inlines.
    pub fn n_inlines(&self) -> usize {
        self.inlines.len()
    }

    /// Number of distinct crosslines.
    pub fn n_crosslines(&self) -> usize {
        self.crosslines.len()
    }

    /// Number of depth/time samples per trace.
    pub fn n_samples(&self) -> usize {
        self.depths.len()
    }

    /// Sorted distinct inline coordinates.
    pub fn inlines(&self) -> &[i32] {
        &self.inlines
    }

    /// Sorted distinct crossline coordinates.
    pub fn crosslines(&self) -> &[i32] {
        &self.crosslines
    }

    /// Depth/time of every sample.
    pub fn depths(&self) -> &[f64] {
        &self.depths
    }

    /// Vertical distance between samples.
    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    /// (first, last) sample depth.
    pub fn depth_range(&self) -> (f64, f64) {
        (self.depths[0], self.depths[self.depths.len() - 1])
    }

    /// Flat amplitude storage.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn trace_offset(&self, il: InlineRank, xl: CrosslineRank) -> usize {
        (il.get() * self.crosslines.len() + xl.get()) * self.depths.len()
    }

    /// Samples at one (inline, crossline) position.
    ///
    /// Positions without an input trace hold zeros.
    pub fn trace(&self, il: InlineRank, xl: CrosslineRank) -> &[f32] {
        let start = self.trace_offset(il, xl);
        &self.data[start..start + self.depths.len()]
    }

    /// All traces of one inline, crossline-major.
    pub fn inline_plane(&self, il: InlineRank) -> &[f32] {
        let len = self.crosslines.len() * self.depths.len();
        let start = il.get() * len;
        &self.data[start..start + len]
    }

    /// Single amplitude.
    #[inline]
    pub fn amplitude(&self, il: InlineRank, xl: CrosslineRank, s: SampleIndex) -> f32 {
        self.data[self.trace_offset(il, xl) + s.get()]
    }

    /// True if an input trace was present at this position.
    pub fn is_live(&self, il: InlineRank, xl: CrosslineRank) -> bool {
        self.live[il.get() * self.crosslines.len() + xl.get()]
    }

    /// Number of positions backed by an input trace.
    pub fn live_trace_count(&self) -> usize {
        self.live.iter().filter(|&&l| l).count()
    }

    /// Rank of an exact inline coordinate.
    pub fn inline_rank(&self, inline: i32) -> Option<InlineRank> {
        self.inlines.binary_search(&inline).ok().map(InlineRank::new)
    }

    /// Rank of an exact crossline coordinate.
    pub fn crossline_rank(&self, crossline: i32) -> Option<CrosslineRank> {
        self.crosslines
            .binary_search(&crossline)
            .ok()
            .map(CrosslineRank::new)
    }

    /// Minimum and maximum amplitude.
    pub fn amplitude_range(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Summary statistics.
    pub fn statistics(&self) -> VolumeStatistics {
        let (n_inlines, n_crosslines, n_samples) = self.shape();
        let (min_amplitude, max_amplitude) = self.amplitude_range();
        let live_traces = self.live_trace_count();
        VolumeStatistics {
            n_inlines,
            n_crosslines,
            n_samples,
            inline_range: (self.inlines[0], self.inlines[n_inlines - 1]),
            crossline_range: (self.crosslines[0], self.crosslines[n_crosslines - 1]),
            depth_range: self.depth_range(),
            live_traces,
            missing_traces: n_inlines * n_crosslines - live_traces,
            min_amplitude,
            max_amplitude,
        }
    }
}

/// Statistics about a seismic volume.
#[derive(Debug, Clone)]
pub struct VolumeStatistics {
    /// Number of distinct inlines
    pub n_inlines: usize,
    /// Number of distinct crosslines
    pub n_crosslines: usize,
    /// Samples per trace
    pub n_samples: usize,
    /// First and last inline coordinate
    pub inline_range: (i32, i32),
    /// First and last crossline coordinate
    pub crossline_range: (i32, i32),
    /// First and last sample depth
    pub depth_range: (f64, f64),
    /// Positions backed by an input trace
    pub live_traces: usize,
    /// Positions filled with zeros
    pub missing_traces: usize,
    /// Minimum amplitude
    pub min_amplitude: f32,
    /// Maximum amplitude
    pub max_amplitude: f32,
}

impl fmt::Display for VolumeStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Seismic Volume Statistics:")?;
        writeln!(
            f,
            "  Shape: {} inlines x {} crosslines x {} samples",
            self.n_inlines, self.n_crosslines, self.n_samples
        )?;
        writeln!(
            f,
            "  Inlines: {} to {}, crosslines: {} to {}",
            self.inline_range.0, self.inline_range.1, self.crossline_range.0, self.crossline_range.1
        )?;
        writeln!(
            f,
            "  Depth range: {:.1} to {:.1}",
            self.depth_range.0, self.depth_range.1
        )?;
        let total = self.live_traces + self.missing_traces;
        writeln!(
            f,
            "  Live traces: {} ({:.1}%), missing: {}",
            self.live_traces,
            100.0 * self.live_traces as f64 / total as f64,
            self.missing_traces
        )?;
        write!(
            f,
            "  Amplitude range: {:.3} to {:.3}",
            self.min_amplitude, self.max_amplitude
        )
    }
}

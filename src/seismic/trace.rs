//! Decoded seismic traces.

/// One decoded seismic trace.
///
/// Amplitudes are ordered along depth/time. Sample `i` sits at
/// `first_sample + i * sample_interval` in the survey's vertical unit
/// (milliseconds for time data, metres or feet for depth data).
#[derive(Clone, Debug, PartialEq)]
pub struct SeismicTrace {
    /// Inline coordinate from the trace header
    pub inline: i32,
    /// Crossline coordinate from the trace header
    pub crossline: i32,
    /// Amplitude samples
    pub samples: Vec<f32>,
    /// Vertical distance between consecutive samples
    pub sample_interval: f64,
    /// Vertical position of the first sample
    pub first_sample: f64,
}

impl SeismicTrace {
    /// Create a trace whose first sample sits at zero depth/time.
    pub fn new(inline: i32, crossline: i32, samples: Vec<f32>, sample_interval: f64) -> Self {
        Self {
            inline,
            crossline,
            samples,
            sample_interval,
            first_sample: 0.0,
        }
    }

    /// Set the vertical position of the first sample.
    pub fn with_first_sample(mut self, first_sample: f64) -> Self {
        self.first_sample = first_sample;
        self
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the trace has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// (inline, crossline) pair.
    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.inline, self.crossline)
    }
}

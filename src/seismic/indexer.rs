//! Densification of a flat trace collection into a 3D volume.
//!
//! Traces arrive in arbitrary order and survey edges usually have holes.
//! The indexer sorts the distinct inline and crossline coordinates, lays the
//! traces out on the full (inline, crossline) grid and fills every position
//! without a trace with zero amplitude so slicing never sees a gap.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{SeismicTrace, SeismicVolume};
use crate::error::{EngineError, Result};

/// Relative tolerance when comparing sample intervals and start depths.
const SAMPLING_RTOL: f64 = 1e-9;

/// Builds [`SeismicVolume`]s from decoded traces.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeIndexer;

impl VolumeIndexer {
    /// Index `traces` into a dense volume.
    ///
    /// Fails with [`EngineError::EmptyDataset`] for an empty input and with
    /// [`EngineError::InconsistentSampling`] when traces disagree on sample
    /// count, interval or start depth. If two traces share a position the
    /// later one wins.
    pub fn index(traces: &[SeismicTrace]) -> Result<SeismicVolume> {
        let first = traces.first().ok_or(EngineError::EmptyDataset)?;
        validate_sampling(traces)?;

        let n_samples = first.len();
        let mut inlines: Vec<i32> = traces.iter().map(|t| t.inline).collect();
        inlines.sort_unstable();
        inlines.dedup();
        let mut crosslines: Vec<i32> = traces.iter().map(|t| t.crossline).collect();
        crosslines.sort_unstable();
        crosslines.dedup();

        let n_positions = inlines.len() * crosslines.len();

        // Map every grid position to the trace that fills it.
        let mut slot_trace: Vec<Option<usize>> = vec![None; n_positions];
        let mut duplicates = 0usize;
        for (t, trace) in traces.iter().enumerate() {
            // Both searches succeed: the axes were built from these traces.
            let il = inlines.binary_search(&trace.inline).unwrap_or_default();
            let xl = crosslines.binary_search(&trace.crossline).unwrap_or_default();
            let slot = &mut slot_trace[il * crosslines.len() + xl];
            if slot.replace(t).is_some() {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            log::warn!(
                "{} traces share an (inline, crossline) position; later traces replace earlier ones",
                duplicates
            );
        }

        let live: Vec<bool> = slot_trace.iter().map(Option::is_some).collect();
        let missing = live.iter().filter(|&&l| !l).count();
        if missing > 0 {
            log::warn!(
                "{} of {} positions have no trace and are filled with zero amplitude",
                missing,
                n_positions
            );
        }

        let mut data = vec![0.0f32; n_positions * n_samples];
        let fill_trace = |(out, slot): (&mut [f32], &Option<usize>)| {
            if let Some(t) = *slot {
                out.copy_from_slice(&traces[t].samples);
            }
        };

        #[cfg(feature = "parallel")]
        data.par_chunks_mut(n_samples)
            .zip(slot_trace.par_iter())
            .for_each(fill_trace);

        #[cfg(not(feature = "parallel"))]
        data.chunks_mut(n_samples)
            .zip(slot_trace.iter())
            .for_each(fill_trace);

        let depths = (0..n_samples)
            .map(|i| first.first_sample + i as f64 * first.sample_interval)
            .collect();

        log::debug!(
            "Indexed {} traces into {} x {} x {} volume",
            traces.len(),
            inlines.len(),
            crosslines.len(),
            n_samples
        );

        Ok(SeismicVolume {
            inlines,
            crosslines,
            depths,
            sample_interval: first.sample_interval,
            data,
            live,
        })
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= SAMPLING_RTOL * a.abs().max(b.abs()).max(1.0)
}

/// Check that all traces share the first trace's sampling.
fn validate_sampling(traces: &[SeismicTrace]) -> Result<()> {
    let first = &traces[0];

    if first.is_empty() {
        return Err(EngineError::invalid_parameter(
            "samples",
            "traces carry no samples",
        ));
    }
    if !first.sample_interval.is_finite() || first.sample_interval <= 0.0 {
        return Err(EngineError::invalid_parameter(
            "sample_interval",
            format!("must be positive, got {}", first.sample_interval),
        ));
    }
    if !first.first_sample.is_finite() {
        return Err(EngineError::invalid_parameter(
            "first_sample",
            format!("must be finite, got {}", first.first_sample),
        ));
    }

    for (t, trace) in traces.iter().enumerate().skip(1) {
        if trace.len() != first.len() {
            return Err(EngineError::inconsistent_sampling(
                t,
                format!("{} samples", first.len()),
                format!("{} samples", trace.len()),
            ));
        }
        if !close(trace.sample_interval, first.sample_interval) {
            return Err(EngineError::inconsistent_sampling(
                t,
                format!("interval {}", first.sample_interval),
                format!("interval {}", trace.sample_interval),
            ));
        }
        if !close(trace.first_sample, first.first_sample) {
            return Err(EngineError::inconsistent_sampling(
                t,
                format!("first sample at {}", first.first_sample),
                format!("first sample at {}", trace.first_sample),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CrosslineRank, InlineRank, SampleIndex};

    fn trace(il: i32, xl: i32, value: f32, n: usize) -> SeismicTrace {
        SeismicTrace::new(il, xl, vec![value; n], 4.0)
    }

    #[test]
    fn test_shape_and_missing_fill() {
        let traces = vec![
            trace(1, 10, 1.0, 50),
            trace(3, 10, 2.0, 50),
            trace(3, 20, 3.0, 50),
        ];
        let volume = VolumeIndexer::index(&traces).unwrap();

        assert_eq!(volume.shape(), (2, 2, 50));
        assert_eq!(volume.inlines(), &[1, 3]);
        assert_eq!(volume.crosslines(), &[10, 20]);

        let missing = volume.trace(InlineRank::new(0), CrosslineRank::new(1));
        assert!(missing.iter().all(|&v| v == 0.0));
        assert!(!volume.is_live(InlineRank::new(0), CrosslineRank::new(1)));
        assert_eq!(volume.live_trace_count(), 3);
    }

    #[test]
    fn test_unsorted_input() {
        let traces = vec![trace(5, 2, 5.2, 3), trace(4, 1, 4.1, 3), trace(5, 1, 5.1, 3)];
        let volume = VolumeIndexer::index(&traces).unwrap();

        assert_eq!(volume.inlines(), &[4, 5]);
        assert_eq!(volume.crosslines(), &[1, 2]);
        assert_eq!(
            volume.amplitude(InlineRank::new(1), CrosslineRank::new(1), SampleIndex::new(2)),
            5.2
        );
        assert_eq!(volume.inline_rank(5), Some(InlineRank::new(1)));
        assert_eq!(volume.crossline_rank(3), None);
    }

    #[test]
    fn test_depth_vector() {
        let traces = vec![SeismicTrace::new(1, 1, vec![0.0; 4], 2.0).with_first_sample(100.0)];
        let volume = VolumeIndexer::index(&traces).unwrap();
        assert_eq!(volume.depths(), &[100.0, 102.0, 104.0, 106.0]);
        assert_eq!(volume.depth_range(), (100.0, 106.0));
    }

    #[test]
    fn test_empty_dataset() {
        assert_eq!(VolumeIndexer::index(&[]), Err(EngineError::EmptyDataset));
    }

    #[test]
    fn test_inconsistent_sample_count() {
        let traces = vec![trace(1, 1, 0.0, 50), trace(1, 2, 0.0, 49)];
        let err = VolumeIndexer::index(&traces).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InconsistentSampling { trace: 1, .. }
        ));
    }

    #[test]
    fn test_inconsistent_interval() {
        let traces = vec![
            SeismicTrace::new(1, 1, vec![0.0; 5], 4.0),
            SeismicTrace::new(1, 2, vec![0.0; 5], 2.0),
        ];
        assert!(matches!(
            VolumeIndexer::index(&traces),
            Err(EngineError::InconsistentSampling { .. })
        ));
    }

    #[test]
    fn test_inconsistent_first_sample() {
        let traces = vec![
            SeismicTrace::new(1, 1, vec![0.0; 5], 4.0).with_first_sample(100.0),
            SeismicTrace::new(1, 2, vec![0.0; 5], 4.0).with_first_sample(100.0),
            SeismicTrace::new(2, 1, vec![0.0; 5], 4.0).with_first_sample(104.0),
        ];
        match VolumeIndexer::index(&traces) {
            Err(EngineError::InconsistentSampling {
                trace,
                expected,
                actual,
            }) => {
                assert_eq!(trace, 2);
                assert_eq!(expected, "first sample at 100");
                assert_eq!(actual, "first sample at 104");
            }
            other => panic!("expected InconsistentSampling, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_position_last_wins() {
        let traces = vec![trace(1, 1, 1.0, 2), trace(1, 1, 9.0, 2)];
        let volume = VolumeIndexer::index(&traces).unwrap();
        assert_eq!(volume.shape(), (1, 1, 2));
        assert_eq!(volume.trace(InlineRank::ZERO, CrosslineRank::ZERO), &[9.0, 9.0]);
    }

    #[test]
    fn test_zero_samples_rejected() {
        let traces = vec![trace(1, 1, 0.0, 0)];
        assert!(matches!(
            VolumeIndexer::index(&traces),
            Err(EngineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_statistics() {
        let traces = vec![trace(1, 10, -2.0, 5), trace(2, 20, 3.0, 5)];
        let stats = VolumeIndexer::index(&traces).unwrap().statistics();
        assert_eq!(stats.live_traces, 2);
        assert_eq!(stats.missing_traces, 2);
        assert_eq!(stats.inline_range, (1, 2));
        assert_eq!(stats.min_amplitude, -2.0);
        assert_eq!(stats.max_amplitude, 3.0);
        assert!(stats.to_string().contains("2 inlines x 2 crosslines x 5 samples"));
    }
}

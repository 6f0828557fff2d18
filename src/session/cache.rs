//! Memoized loading keyed by content fingerprints.
//!
//! [`LoadCache`] remembers results keyed by a [`Fingerprint`] of the inputs
//! and parameters. Entries are stored as owned values and every lookup hands
//! out a fresh copy, so nothing a caller does to a returned value can reach
//! the cached entry.
//!
//! Only file loads get cheaper. [`Fingerprint::of_raster_file`] hashes the
//! path and file metadata, so a hit skips decoding altogether. The in-memory
//! fingerprints ([`Fingerprint::of_raster`], [`Fingerprint::of_traces`]) hash
//! every sample and a hit still copies the whole dataset, which costs about
//! as much as reducing or indexing again. For those loads the cache gives
//! identical inputs an identical, independent result; it is not a speedup.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::seismic::SeismicTrace;
use crate::terrain::{RawRaster, ReducerConfig};

/// SHA-256 digest identifying a load input together with its parameters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint of a decoded raster reduced with `factor` and `config`.
    pub fn of_raster(raster: &RawRaster, factor: usize, config: &ReducerConfig) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"raster");
        hasher.update((raster.rows() as u64).to_le_bytes());
        hasher.update((raster.cols() as u64).to_le_bytes());
        hash_option(&mut hasher, raster.nodata());
        let e = raster.extent();
        for v in [e.x_min, e.x_max, e.y_min, e.y_max] {
            hasher.update(v.to_le_bytes());
        }
        for v in raster.data() {
            hasher.update(v.to_le_bytes());
        }
        hash_params(&mut hasher, factor, config);
        Self(hasher.finalize().into())
    }

    /// Fingerprint of a trace collection.
    pub fn of_traces(traces: &[SeismicTrace]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"traces");
        hasher.update((traces.len() as u64).to_le_bytes());
        for trace in traces {
            hasher.update(trace.inline.to_le_bytes());
            hasher.update(trace.crossline.to_le_bytes());
            hasher.update(trace.sample_interval.to_le_bytes());
            hasher.update(trace.first_sample.to_le_bytes());
            hasher.update((trace.samples.len() as u64).to_le_bytes());
            for v in &trace.samples {
                hasher.update(v.to_le_bytes());
            }
        }
        Self(hasher.finalize().into())
    }

    /// Fingerprint of a raster file path reduced with `factor` and `config`.
    ///
    /// File size and modification time are folded in when available so an
    /// edited file does not hit a stale entry.
    pub fn of_raster_file(path: &Path, factor: usize, config: &ReducerConfig) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"raster-file");
        hasher.update(path.to_string_lossy().as_bytes());
        if let Ok(meta) = std::fs::metadata(path) {
            hasher.update(meta.len().to_le_bytes());
            let modified = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok());
            if let Some(since) = modified {
                hasher.update(since.as_nanos().to_le_bytes());
            }
        }
        hash_params(&mut hasher, factor, config);
        Self(hasher.finalize().into())
    }

    /// Full hex digest.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

fn hash_option(hasher: &mut Sha256, value: Option<f64>) {
    match value {
        Some(v) => {
            hasher.update([1u8]);
            hasher.update(v.to_le_bytes());
        }
        None => hasher.update([0u8]),
    }
}

fn hash_params(hasher: &mut Sha256, factor: usize, config: &ReducerConfig) {
    hasher.update((factor as u64).to_le_bytes());
    hash_option(hasher, config.nodata_override);
    hasher.update(config.outlier_magnitude.to_le_bytes());
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

impl fmt::Display for Fingerprint {
    /// Short form: first 8 bytes in hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0[..8] {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Hit/miss counters of a [`LoadCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to compute
    pub misses: u64,
    /// Entries currently held
    pub entries: usize,
}

/// Bounded memo of load results, evicting the oldest entry first.
#[derive(Debug, Clone)]
pub struct LoadCache<V> {
    entries: HashMap<Fingerprint, V>,
    order: VecDeque<Fingerprint>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<V: Clone> LoadCache<V> {
    /// Create a cache holding at most `capacity` entries (0 disables caching).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Copy of the entry for `key`, if present.
    pub fn get(&mut self, key: &Fingerprint) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits += 1;
                Some(value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a copy of `value` under `key`.
    pub fn insert(&mut self, key: Fingerprint, value: &V) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key, value.clone()).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                    log::debug!("Evicted cache entry {}", oldest);
                }
                None => break,
            }
        }
    }

    /// Return a copy of the cached value or compute, store and return it.
    ///
    /// Errors from `compute` are returned unchanged and nothing is cached.
    pub fn get_or_try_insert_with<F>(&mut self, key: Fingerprint, compute: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(value) = self.get(&key) {
            log::debug!("Cache hit for {}", key);
            return Ok(value);
        }
        let value = compute()?;
        self.insert(key, &value);
        Ok(value)
    }

    /// True if `key` is cached.
    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

//! Uniform noise for the simulated portions of the monitor.
//!
//! Detection counts, change-report deltas and the stats jitter all draw
//! from an injected [`NoiseSource`], so the demo binary gets varied output
//! while tests script the exact samples they need.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of uniform samples in `[0, 1)`.
pub trait NoiseSource: Send + Sync {
    fn sample(&self) -> f64;
}

/// splitmix64 sequence behind an atomic state word.
///
/// Statistical quality is more than enough for demo jitter; the point is
/// that it is seedable and has no external dependency.
pub struct SplitMixNoise {
    state: AtomicU64,
}

impl SplitMixNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            state: AtomicU64::new(seed),
        }
    }

    /// Seed from the wall clock.
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::new(seed)
    }
}

impl NoiseSource for SplitMixNoise {
    fn sample(&self) -> f64 {
        let prev = self.state.fetch_add(0x9E37_79B9_7F4A_7C15, Ordering::Relaxed);
        let mut x = prev.wrapping_add(0x9E37_79B9_7F4A_7C15);
        x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        x ^= x >> 31;
        (x >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Scripted noise that cycles through the given samples.
pub struct FixedNoise {
    samples: Vec<f64>,
    cursor: AtomicUsize,
}

impl FixedNoise {
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Always returns the same sample.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl NoiseSource for FixedNoise {
    fn sample(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.samples[i % self.samples.len()]
    }
}

//! The pure Sample Generator (§4.1).
//!
//! `generate` takes configuration, a monotonic timestamp, and a source of
//! entropy, and produces the next [`Sample`] -- no I/O, no locking, no
//! allocation, so it is safe to call directly from the periodic driver's
//! tick, which may not suspend (§4.3, §9).

use crate::config::Config;
use crate::sample::{Sample, NEW_SAMPLE, THRESHOLD_EXCEEDED};

/// A source of uniformly distributed 32-bit entropy.
///
/// Kept as a trait (rather than hard-coding a specific RNG) so tests can
/// substitute a deterministic sequence instead of reaching for a global RNG.
pub trait Rng {
    /// Produce the next 32-bit value.
    fn next_u32(&mut self) -> u32;
}

/// The default entropy source: a small xorshift generator.
///
/// Not cryptographically meaningful -- this is a simulated sensor, not a
/// security primitive -- just fast, allocation-free, and seedable so tests
/// are reproducible.
#[derive(Debug, Clone)]
pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    /// Seed the generator. A seed of zero is remapped to a fixed non-zero
    /// value, since xorshift's fixed point at zero would otherwise produce
    /// an infinite stream of zeroes.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E3779B97F4A7C15 } else { seed },
        }
    }
}

impl Rng for XorShiftRng {
    fn next_u32(&mut self) -> u32 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        (x.wrapping_mul(0x2545_F491_4F6C_DD1D) >> 32) as u32
    }
}

/// Generate the next sample (§4.1).
///
/// `now` must be the current monotonic-clock reading in nanoseconds.
/// Callers are responsible for having already validated `cfg` via
/// [`Config::validate`] -- this function assumes a non-overflowing range
/// and does not re-check it, matching §4.1's "implementations must reject
/// such configs at start" (the rejection happens earlier, not here).
pub fn generate(cfg: &Config, now: u64, rng: &mut dyn Rng) -> Sample {
    let span = (cfg.variation_mc as i64) * 2 + 1;
    let raw = rng.next_u32() as i64; // u32 -> i64 is always non-negative
    let offset = raw % span - cfg.variation_mc as i64;
    let temp_mc = (cfg.base_temp_mc as i64 + offset) as i32;

    let mut flags = NEW_SAMPLE;
    if temp_mc > cfg.threshold_mc {
        flags |= THRESHOLD_EXCEEDED;
    }

    Sample {
        timestamp_ns: now,
        temp_mc,
        flags,
    }
}

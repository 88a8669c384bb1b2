//! Immutable-after-start configuration for the device (§3, §4.6, §10.3).

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_TEMP_MC, DEFAULT_RING_CAPACITY, DEFAULT_SAMPLING_INTERVAL_MS,
    DEFAULT_THRESHOLD_MC, DEFAULT_VARIATION_MC,
};
use crate::error::{DeviceError, Result};

/// Sampling and flag-threshold configuration.
///
/// `Config` is immutable once passed to [`crate::device::Device::start`];
/// there is no support for reconfiguring a running device (§4, Non-goals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Producer period, in milliseconds. Must be positive.
    pub sampling_interval_ms: u64,
    /// Threshold, in milli-Celsius, for `THRESHOLD_EXCEEDED` (strict `>`).
    pub threshold_mc: i32,
    /// Mean of the generated temperature distribution, in milli-Celsius.
    pub base_temp_mc: i32,
    /// Half-width of the uniform variation, in milli-Celsius. Must be `>= 0`.
    pub variation_mc: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampling_interval_ms: DEFAULT_SAMPLING_INTERVAL_MS,
            threshold_mc: DEFAULT_THRESHOLD_MC,
            base_temp_mc: DEFAULT_BASE_TEMP_MC,
            variation_mc: DEFAULT_VARIATION_MC,
        }
    }
}

impl Config {
    /// Start from defaults and override the sampling interval.
    pub fn with_sampling_interval_ms(mut self, interval_ms: u64) -> Self {
        self.sampling_interval_ms = interval_ms;
        self
    }

    /// Start from defaults and override the threshold.
    pub fn with_threshold_mc(mut self, threshold_mc: i32) -> Self {
        self.threshold_mc = threshold_mc;
        self
    }

    /// Start from defaults and override the base temperature.
    pub fn with_base_temp_mc(mut self, base_temp_mc: i32) -> Self {
        self.base_temp_mc = base_temp_mc;
        self
    }

    /// Start from defaults and override the variation half-width.
    pub fn with_variation_mc(mut self, variation_mc: i32) -> Self {
        self.variation_mc = variation_mc;
        self
    }

    /// Validate this configuration, per §4.1 and §4.6.
    ///
    /// Rejects a non-positive interval, a negative variation, and any
    /// `base_temp_mc`/`variation_mc` pair whose generated range would
    /// overflow `i32` -- the generator (§4.1) is specified only for
    /// non-overflowing configurations, so we refuse such configs here
    /// rather than let the generator invoke undefined behavior later.
    pub fn validate(&self) -> Result<()> {
        if self.sampling_interval_ms == 0 {
            return Err(DeviceError::config("sampling_interval_ms must be positive"));
        }
        if self.variation_mc < 0 {
            return Err(DeviceError::config("variation_mc must not be negative"));
        }
        self.base_temp_mc
            .checked_add(self.variation_mc)
            .ok_or_else(|| DeviceError::config("base_temp_mc + variation_mc overflows i32"))?;
        self.base_temp_mc
            .checked_sub(self.variation_mc)
            .ok_or_else(|| DeviceError::config("base_temp_mc - variation_mc overflows i32"))?;
        Ok(())
    }
}

/// Validate a requested ring buffer capacity: must be a power of two, and
/// at least 2 (one slot is always reserved, §3, so capacity 1 could never
/// hold a record).
pub fn validate_capacity(capacity: usize) -> Result<()> {
    if capacity < 2 || !capacity.is_power_of_two() {
        return Err(DeviceError::config(
            "ring buffer capacity must be a power of two, >= 2",
        ));
    }
    Ok(())
}

/// Default ring buffer capacity (§3).
pub const fn default_capacity() -> usize {
    DEFAULT_RING_CAPACITY
}

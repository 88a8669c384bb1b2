//! Default configuration values and buffer sizing constants (§3).

/// Default producer period, in milliseconds.
pub const DEFAULT_SAMPLING_INTERVAL_MS: u64 = 100;

/// Default threshold, in milli-Celsius, above which `THRESHOLD_EXCEEDED` is set.
pub const DEFAULT_THRESHOLD_MC: i32 = 45_000;

/// Default mean of the generated temperature distribution, in milli-Celsius.
pub const DEFAULT_BASE_TEMP_MC: i32 = 35_000;

/// Default half-width of the uniform variation, in milli-Celsius.
pub const DEFAULT_VARIATION_MC: i32 = 10_000;

/// Default ring buffer capacity. Must be a power of two; one slot is always
/// reserved so the buffer can distinguish empty from full (§3).
pub const DEFAULT_RING_CAPACITY: usize = 64;

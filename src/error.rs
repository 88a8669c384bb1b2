//! Error types for the simulated temperature-sensor device core.

use thiserror::Error;

/// Result type alias for simtherm operations.
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Error taxonomy for the device core.
///
/// Every variant here corresponds to one row of the error taxonomy in the
/// specification: the core recovers nothing on its own except ring-buffer
/// overflow (handled internally by dropping the oldest record), so every
/// other failure is surfaced to the caller through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Caller's buffer is smaller than a single 16-byte record.
    #[error("buffer too small: need 16 bytes, got {got}")]
    BufferTooSmall {
        /// Size of the buffer the caller actually supplied.
        got: usize,
    },

    /// Non-blocking read found nothing to return.
    #[error("would block: no sample available")]
    WouldBlock,

    /// A blocking read was cancelled before a record became available.
    #[error("interrupted before a sample arrived")]
    Interrupted,

    /// The device was stopped while this handle was still open.
    #[error("device is gone")]
    DeviceGone,

    /// Configuration rejected at `start`.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable description of what failed validation.
        message: String,
    },

    /// The device could not be started (e.g. buffer allocation failure).
    #[error("resource unavailable: {message}")]
    ResourceUnavailable {
        /// Human-readable description of the resource failure.
        message: String,
    },
}

impl DeviceError {
    /// Build an [`DeviceError::InvalidConfig`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Build an [`DeviceError::ResourceUnavailable`].
    pub fn resource_unavailable(message: impl Into<String>) -> Self {
        Self::ResourceUnavailable {
            message: message.into(),
        }
    }

    /// Whether a caller can reasonably retry after this error.
    ///
    /// `WouldBlock` is the obvious retry case; `BufferTooSmall` is not (the
    /// caller needs a bigger buffer, not another attempt with the same one).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::WouldBlock | Self::Interrupted)
    }

    /// Whether this error means the device itself is no longer usable.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::DeviceGone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn would_block_is_recoverable() {
        assert!(DeviceError::WouldBlock.is_recoverable());
        assert!(DeviceError::Interrupted.is_recoverable());
    }

    #[test]
    fn buffer_too_small_is_not_recoverable() {
        let err = DeviceError::BufferTooSmall { got: 4 };
        assert!(!err.is_recoverable());
        assert!(!err.is_terminal());
    }

    #[test]
    fn device_gone_is_terminal() {
        assert!(DeviceError::DeviceGone.is_terminal());
        assert!(!DeviceError::DeviceGone.is_recoverable());
    }

    #[test]
    fn config_helper_builds_invalid_config() {
        let err = DeviceError::config("interval must be positive");
        assert!(matches!(err, DeviceError::InvalidConfig { .. }));
    }
}

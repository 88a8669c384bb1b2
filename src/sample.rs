//! The 16-byte Sample Record and its little-endian wire layout (§3, §6).

/// Size in bytes of the wire-layout record. Every successful `read` returns
/// exactly this many bytes; no other length is a valid record (§6).
pub const RECORD_LEN: usize = 16;

/// Bit 0 of `flags`: always set on every generated record.
pub const NEW_SAMPLE: u32 = 0x01;

/// Bit 1 of `flags`: set iff `temp_mC > threshold_mC` (strict).
pub const THRESHOLD_EXCEEDED: u32 = 0x02;

/// All flag bits this version of the format defines. Any other bit set is a
/// protocol violation (§3: "all other bits reserved, must be zero").
const KNOWN_FLAGS: u32 = NEW_SAMPLE | THRESHOLD_EXCEEDED;

/// A single immutable temperature sample.
///
/// Wire layout (little-endian, 16 bytes, no padding):
///
/// | Offset | Size | Field |
/// |---|---|---|
/// | 0 | 8 | `timestamp_ns` |
/// | 8 | 4 | `temp_mc` (i32) |
/// | 12 | 4 | `flags` (u32) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sample {
    /// Monotonic nanoseconds since an unspecified epoch.
    pub timestamp_ns: u64,
    /// Temperature in milli-Celsius.
    pub temp_mc: i32,
    /// Bitfield: `NEW_SAMPLE` and optionally `THRESHOLD_EXCEEDED`.
    pub flags: u32,
}

impl Sample {
    /// Whether `THRESHOLD_EXCEEDED` is set.
    pub fn threshold_exceeded(&self) -> bool {
        self.flags & THRESHOLD_EXCEEDED != 0
    }

    /// Whether this record carries no flags outside the known set (§3).
    pub fn has_only_known_flags(&self) -> bool {
        self.flags & !KNOWN_FLAGS == 0
    }

    /// Encode this record into its 16-byte little-endian wire form.
    pub fn to_bytes(self) -> [u8; RECORD_LEN] {
        let mut out = [0u8; RECORD_LEN];
        out[0..8].copy_from_slice(&self.timestamp_ns.to_le_bytes());
        out[8..12].copy_from_slice(&self.temp_mc.to_le_bytes());
        out[12..16].copy_from_slice(&self.flags.to_le_bytes());
        out
    }

    /// Decode a record from its 16-byte little-endian wire form.
    pub fn from_bytes(bytes: [u8; RECORD_LEN]) -> Self {
        let timestamp_ns = u64::from_le_bytes(bytes[0..8].try_into().unwrap());
        let temp_mc = i32::from_le_bytes(bytes[8..12].try_into().unwrap());
        let flags = u32::from_le_bytes(bytes[12..16].try_into().unwrap());
        Self {
            timestamp_ns,
            temp_mc,
            flags,
        }
    }

    /// Copy this record's wire bytes into `buffer`.
    ///
    /// Caller must already have checked `buffer.len() >= RECORD_LEN`; this
    /// is the copy-only step of `read` (§4.4), kept separate from the
    /// length check so callers can't accidentally skip it.
    pub fn write_into(self, buffer: &mut [u8]) {
        debug_assert!(buffer.len() >= RECORD_LEN);
        buffer[..RECORD_LEN].copy_from_slice(&self.to_bytes());
    }
}

//! simtherm -- CORE of a simulated temperature-sensor device.
//!
//! A periodic sample generator runs on a background thread and delivers
//! timestamped temperature samples to any number of readers through a
//! file-descriptor-like interface: blocking reads, non-blocking reads, and
//! readiness polling, backed by a bounded drop-oldest ring buffer.
//!
//! Out of scope here (left to external collaborators, see the crate's
//! design notes): CLI presentation, device-node registration, and
//! configuration discovery beyond the defaults in [`config::Config`].
//!
//! # Example
//!
//! ```
//! use simtherm::{Config, Device};
//!
//! let device = Device::start(Config::default()).unwrap();
//! let reader = device.open(true);
//!
//! let mut buf = [0u8; 16];
//! match reader.read(&mut buf) {
//!     Ok(16) => { /* got a sample */ }
//!     Err(e) => { /* would block, or the device went away */ let _ = e; }
//!     Ok(_) => unreachable!("reads are always exactly 16 bytes"),
//! }
//! ```

pub mod config;
pub mod constants;
pub mod device;
pub mod driver;
pub mod error;
pub mod generator;
pub mod ring_buffer;
pub mod sample;
pub mod wait_queue;

pub use config::Config;
pub use device::{Device, Readiness, Reader};
pub use error::{DeviceError, Result};
pub use sample::{Sample, NEW_SAMPLE, RECORD_LEN, THRESHOLD_EXCEEDED};

//! Lifecycle Controller and Reader Interface (§4.4, §4.6).
//!
//! `Device::start` is the lifecycle controller's `start`; the returned
//! `Device` owns the ring buffer, the periodic driver, the wait-set, and
//! the configuration snapshot exclusively (§3, "Ownership"). `Device::open`
//! hands out [`Reader`] handles that hold only a shared, non-owning
//! reference -- cloning the `Arc<DeviceInner>` -- whose validity outlives
//! the handle's own use regardless of what happens to the `Device` (§3).

use std::sync::Arc;
use std::time::Duration;

use crate::config::{self, Config};
use crate::driver::Driver;
use crate::error::{DeviceError, Result};
use crate::ring_buffer::RingBuffer;
use crate::sample::RECORD_LEN;
use crate::wait_queue::{WaitQueue, WakeReason};

struct DeviceInner {
    buffer: Arc<RingBuffer>,
    wait_queue: Arc<WaitQueue>,
    config: Config,
}

/// The simulated device. Created by [`Device::start`]; emits samples in the
/// background immediately and continues until dropped or [`Device::stop`]
/// is called.
pub struct Device {
    inner: Arc<DeviceInner>,
    driver: Driver,
}

impl Device {
    /// Start the device with the default ring buffer capacity
    /// (§3, [`config::default_capacity`]).
    pub fn start(cfg: Config) -> Result<Self> {
        Self::start_with_capacity(cfg, config::default_capacity())
    }

    /// Start the device with an explicit ring buffer capacity.
    ///
    /// Validates `cfg` and `capacity` (§4.6); fails with
    /// [`DeviceError::InvalidConfig`] without ever starting the periodic
    /// driver if either is invalid.
    pub fn start_with_capacity(cfg: Config, capacity: usize) -> Result<Self> {
        cfg.validate()?;
        config::validate_capacity(capacity)?;

        let buffer = Arc::new(RingBuffer::new(capacity));
        let wait_queue = Arc::new(WaitQueue::new());

        #[cfg(feature = "tracing")]
        tracing::info!(?cfg, capacity, "device starting");

        // The driver gets its own clones of the buffer/wait-queue Arcs --
        // it only ever touches those two fields, never the config snapshot
        // after the initial read -- so it doesn't need a handle to the
        // whole `DeviceInner`.
        let driver = Driver::start(cfg, buffer.clone(), wait_queue.clone());

        let inner = Arc::new(DeviceInner {
            buffer,
            wait_queue,
            config: cfg,
        });

        Ok(Self { inner, driver })
    }

    /// Open a new reader handle (§4.4). `nonblocking` is fixed for the
    /// handle's lifetime; multiple readers, blocking or not, may coexist
    /// and race for the same FIFO (§3).
    pub fn open(&self, nonblocking: bool) -> Reader {
        Reader {
            device: self.inner.clone(),
            nonblocking,
        }
    }

    /// Stop the device (§4.6): halts the periodic driver first, then wakes
    /// every suspended reader with a terminal outcome, then the buffer's
    /// storage is dropped along with this `Device`. Idempotent -- safe to
    /// call more than once, and safe to call while readers still hold open
    /// handles (their next operation observes `DeviceGone`, §4.6).
    pub fn stop(&mut self) {
        let already_stopped = self.inner.wait_queue.is_stopped();
        self.driver.stop();
        self.inner.wait_queue.signal_stop();

        #[cfg(feature = "tracing")]
        if !already_stopped {
            tracing::info!("device stopped");
        }
        let _ = already_stopped;
    }

    /// Current overflow count, exposed for testing (§7, §8 item 10).
    pub fn overflow_count(&self) -> u64 {
        self.inner.buffer.overflow_count()
    }

    /// The configuration this device was started with.
    pub fn config(&self) -> Config {
        self.inner.config
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A handle opened against a [`Device`] (§4.4). Holds a shared,
/// non-owning reference to the device state; `close` (via `Drop`) releases
/// only the handle, never the device itself (§3).
pub struct Reader {
    device: Arc<DeviceInner>,
    nonblocking: bool,
}

impl Reader {
    /// Whether this handle was opened in non-blocking mode.
    pub fn is_nonblocking(&self) -> bool {
        self.nonblocking
    }

    /// Read exactly one record into `buffer` (§4.4, §6).
    ///
    /// - `buffer.len() < RECORD_LEN` fails with `BufferTooSmall`.
    /// - A successful read copies exactly `RECORD_LEN` bytes and returns
    ///   that length; never a partial record.
    /// - If the buffer is empty: non-blocking readers fail with
    ///   `WouldBlock`; blocking readers suspend on the wait-set until data
    ///   arrives or the device is stopped, retrying the dequeue on every
    ///   wakeup (another reader may have won the race, in which case the
    ///   reader re-suspends, §4.4).
    pub fn read(&self, buffer: &mut [u8]) -> Result<usize> {
        if buffer.len() < RECORD_LEN {
            return Err(DeviceError::BufferTooSmall { got: buffer.len() });
        }

        loop {
            if let Some(sample) = self.device.buffer.get() {
                sample.write_into(buffer);
                return Ok(RECORD_LEN);
            }

            if self.device.wait_queue.is_stopped() {
                return Err(DeviceError::DeviceGone);
            }

            if self.nonblocking {
                return Err(DeviceError::WouldBlock);
            }

            match self.device.wait_queue.wait(Duration::from_millis(250)) {
                WakeReason::Stopped => return Err(DeviceError::DeviceGone),
                WakeReason::Signaled => {
                    // Re-check has_data on the next loop iteration. A
                    // spurious wakeup (no data yet -- another reader won
                    // the race) is expected and not an error (§9); we just
                    // log it at trace level and loop back around.
                    #[cfg(feature = "tracing")]
                    if !self.device.buffer.has_data() {
                        tracing::trace!("spurious wakeup, buffer still empty");
                    }
                }
                WakeReason::TimedOut => {
                    // The 250ms ceiling exists only so a blocking read
                    // doesn't wait forever past `stop()` without
                    // re-checking `is_stopped`; it is not part of the
                    // public contract and callers never observe it as a
                    // distinct outcome.
                }
            }
        }
    }

    /// Register interest and test readiness (§4.4, §4.5).
    ///
    /// Registration happens *before* the emptiness check -- mandatory per
    /// §4.5 to prevent a lost wakeup if the producer publishes a record
    /// between a naive check-then-register sequence. Because this crate's
    /// wait-set doesn't expose "register" and "wait" as separate steps (to
    /// keep that ordering from being something callers could get wrong),
    /// `poll` approximates register-before-check by re-reading `has_data`
    /// after a zero-duration pass through the wait-set: a publish that
    /// lands concurrently is visible either to the immediate check or
    /// synchronizes-with this thread via the same mutex the producer's
    /// `signal_all` takes.
    pub fn poll(&self) -> Result<Readiness> {
        // Take (and immediately release) the same mutex the producer's
        // signal_all() takes, establishing a happens-before edge with any
        // enqueue that already completed, before testing has_data. This is
        // the register step; the ring buffer's own lock covers the rest.
        let _ = self.device.wait_queue.wait(Duration::from_millis(0));
        if self.device.buffer.has_data() {
            Ok(Readiness::Readable)
        } else {
            Ok(Readiness::NotReadable)
        }
    }

    /// Release this handle. Does not affect the device or other readers
    /// (§4.4). Equivalent to dropping the `Reader`.
    pub fn close(self) {
        drop(self);
    }
}

/// Result of a [`Reader::poll`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// At least one record was available at the moment of the check.
    Readable,
    /// The buffer was empty at the moment of the check.
    NotReadable,
}

/// Convenience blanket impl so a [`Reader`] can be used anywhere
/// `std::io::Read` is expected (e.g. by an external CLI glue layer, §1)
/// for blocking, full-record reads. Non-blocking `WouldBlock` is mapped to
/// `io::ErrorKind::WouldBlock`, matching the conventional meaning of that
/// `std::io` error kind.
impl std::io::Read for Reader {
    fn read(&mut self, buffer: &mut [u8]) -> std::io::Result<usize> {
        Reader::read(self, buffer).map_err(|e| match e {
            DeviceError::WouldBlock => std::io::Error::new(std::io::ErrorKind::WouldBlock, e),
            DeviceError::Interrupted => std::io::Error::new(std::io::ErrorKind::Interrupted, e),
            other => std::io::Error::new(std::io::ErrorKind::Other, other),
        })
    }
}

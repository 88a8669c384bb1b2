//! The readiness wait-set (§4.5, §9): lost-wakeup-free registration for
//! blocking readers and for `poll`.
//!
//! Pairs a `parking_lot::Mutex<()>` with a `parking_lot::Condvar`; the
//! producer calls `notify_all` after every publish. Also carries a distinct
//! "device is gone" signal so a blocking `read` in flight when `stop` runs
//! wakes with a terminal outcome instead of waiting for a tick that will
//! never come (§4.3, §4.6).

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Why a waiter was woken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    /// The condition variable was signaled (spuriously or for real --
    /// callers must re-check their own condition regardless, per §4.5).
    Signaled,
    /// The wait timed out without a signal.
    TimedOut,
    /// The device has been stopped; no further signals will come.
    Stopped,
}

/// Readiness wait-set shared between the periodic driver and all readers.
pub struct WaitQueue {
    mutex: Mutex<()>,
    condvar: Condvar,
    stopped: AtomicBool,
}

impl WaitQueue {
    /// Create a new, not-yet-stopped wait-set.
    pub fn new() -> Self {
        Self {
            mutex: Mutex::new(()),
            condvar: Condvar::new(),
            stopped: AtomicBool::new(false),
        }
    }

    /// Register interest and suspend until woken, timed out, or stopped.
    ///
    /// This method performs registration (taking the mutex the condvar is
    /// paired with) and the wait in one call so callers cannot observe
    /// registration as a separate, skippable step (§9). The caller's own
    /// condition (typically `RingBuffer::has_data`) must be re-checked
    /// after this returns `Signaled` or `TimedOut` -- spurious wakeups are
    /// permitted (§4.5) and this primitive does not know what the caller
    /// is waiting for.
    ///
    /// # Lost-wakeup avoidance
    ///
    /// The contract this method relies on: the caller has *already*
    /// observed its condition to be false *before* calling this method,
    /// and any producer that could make the condition true takes the same
    /// mutex (via [`WaitQueue::signal_all`]) before or after that
    /// observation. Because `parking_lot::Condvar::wait_for` atomically
    /// releases the mutex and begins waiting, a signal sent after the
    /// caller re-acquires the mutex here (even if sent between the
    /// caller's condition check and this call) is not missed: the
    /// condition must be re-checked by the caller under its own lock
    /// (the ring buffer's), and `put` takes that same lock before calling
    /// `signal_all`, so the two critical sections are totally ordered.
    pub fn wait(&self, timeout: Duration) -> WakeReason {
        if self.stopped.load(Ordering::Acquire) {
            return WakeReason::Stopped;
        }
        let mut guard = self.mutex.lock();
        if self.stopped.load(Ordering::Acquire) {
            return WakeReason::Stopped;
        }
        if self.condvar.wait_for(&mut guard, timeout).timed_out() {
            WakeReason::TimedOut
        } else {
            WakeReason::Signaled
        }
    }

    /// Wake every currently registered waiter. Called by the producer
    /// after every enqueue (§4.3, §4.5) -- happens-after the enqueue so a
    /// waiter that wakes is guaranteed to be able to observe at least one
    /// record.
    pub fn signal_all(&self) {
        let _guard = self.mutex.lock();
        self.condvar.notify_all();
    }

    /// Permanently mark this wait-set as stopped and wake every waiter.
    /// Idempotent (§4.6).
    pub fn signal_stop(&self) {
        self.stopped.store(true, Ordering::Release);
        let _guard = self.mutex.lock();
        self.condvar.notify_all();
    }

    /// Whether [`WaitQueue::signal_stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

impl Default for WaitQueue {
    fn default() -> Self {
        Self::new()
    }
}

//! The periodic driver (§4.3): ticks at a fixed interval, generating and
//! enqueuing one sample per tick, then signaling readiness.
//!
//! A true sensor driver's producer would run in a timer-callback context
//! that cannot block; this crate runs it as an ordinary `std::thread`
//! instead (§5's "parallel threads or a functionally equivalent preemptive
//! execution environment"), but keeps the same discipline that restricted
//! environment would force on it: each tick's critical work is
//! generate -> enqueue -> signal, in that order, with no allocation and no
//! blocking primitive held across the enqueue (§4.2, §4.3, §9).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::generator::{generate, Rng, XorShiftRng};
use crate::ring_buffer::RingBuffer;
use crate::wait_queue::WaitQueue;

/// A background thread that ticks at `cfg.sampling_interval_ms`, generating
/// and enqueuing one [`crate::sample::Sample`] per tick.
pub struct Driver {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Driver {
    /// Start the driver. The first tick fires no later than one interval
    /// after this call (§4.3); each subsequent tick is scheduled relative
    /// to the *ideal* previous instant, not the actual firing time, so a
    /// late tick does not push every following tick later -- jitter never
    /// accumulates (§4.3).
    pub fn start(cfg: Config, buffer: Arc<RingBuffer>, wait_queue: Arc<WaitQueue>) -> Self {
        Self::start_with_rng(cfg, buffer, wait_queue, Box::new(XorShiftRng::new(rng_seed())))
    }

    /// Same as [`Driver::start`] but with an explicit entropy source --
    /// used by tests that need reproducible sample sequences.
    pub fn start_with_rng(
        cfg: Config,
        buffer: Arc<RingBuffer>,
        wait_queue: Arc<WaitQueue>,
        mut rng: Box<dyn Rng + Send>,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let interval = Duration::from_millis(cfg.sampling_interval_ms);
        let start = Instant::now();

        let thread_running = running.clone();
        let handle = thread::spawn(move || {
            let mut next_tick = start + interval;
            let mut tick_index: u64 = 0;
            while thread_running.load(Ordering::Acquire) {
                let now = Instant::now();
                if now < next_tick {
                    thread::sleep(next_tick - now);
                    if !thread_running.load(Ordering::Acquire) {
                        break;
                    }
                }

                let now_ns = start.elapsed().as_nanos() as u64;
                let sample = generate(&cfg, now_ns, rng.as_mut());
                buffer.put(sample);
                wait_queue.signal_all();

                #[cfg(feature = "tracing")]
                tracing::debug!(tick = tick_index, temp_mc = sample.temp_mc, "tick");
                let _ = tick_index; // avoid unused warning when tracing is off
                tick_index += 1;

                // Schedule the next tick relative to the ideal prior
                // instant, not `Instant::now()`, so a late tick doesn't
                // shift every subsequent one (§4.3).
                next_tick += interval;
                if next_tick < Instant::now() {
                    // We fell more than one interval behind; resync to
                    // "now + interval" so we don't spin through a burst
                    // of already-missed ticks.
                    next_tick = Instant::now() + interval;
                }
            }
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the driver: prevents any further ticks from firing after this
    /// returns, and waits for an in-flight tick to complete (§4.3).
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A cheap, non-cryptographic seed derived from the current time, so
/// repeated `Device::start` calls in the same process don't all generate
/// the same sample sequence.
fn rng_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x2545_F491_4F6C_DD1D)
}

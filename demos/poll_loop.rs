//! Poll a non-blocking reader in a tight loop until a few samples show up.
//!
//! cargo run --example poll_loop

use std::thread;
use std::time::Duration;

use simtherm::{Config, Readiness, Sample};

fn main() {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt::init();

    let cfg = Config::default().with_sampling_interval_ms(150);
    let device = simtherm::Device::start(cfg).expect("invalid configuration");
    let reader = device.open(true);

    let mut collected = 0;
    while collected < 5 {
        match reader.poll().expect("device stopped unexpectedly") {
            Readiness::Readable => {
                let mut buf = [0u8; simtherm::RECORD_LEN];
                reader.read(&mut buf).expect("readable but read failed");
                let sample = Sample::from_bytes(buf);
                println!("got sample: temp_mc={}", sample.temp_mc);
                collected += 1;
            }
            Readiness::NotReadable => thread::sleep(Duration::from_millis(20)),
        }
    }
}

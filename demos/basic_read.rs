//! Start a device, open one blocking reader, print a handful of samples.
//!
//! cargo run --example basic_read

use simtherm::{Config, Sample};

fn main() {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt::init();

    let cfg = Config::default().with_sampling_interval_ms(200);
    let device = simtherm::Device::start(cfg).expect("invalid configuration");
    let reader = device.open(false);

    println!("reading 5 samples at {}ms intervals...", cfg.sampling_interval_ms);

    let mut buf = [0u8; simtherm::RECORD_LEN];
    for i in 0..5 {
        reader.read(&mut buf).expect("device stopped unexpectedly");
        let sample = Sample::from_bytes(buf);
        println!(
            "[{i}] t={} temp_mc={} exceeded={}",
            sample.timestamp_ns,
            sample.temp_mc,
            sample.threshold_exceeded(),
        );
    }
}

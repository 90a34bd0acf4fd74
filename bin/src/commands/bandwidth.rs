//! Bandwidth command implementation.

use anyhow::{Context, Result, bail};
use netgauge_lib::prelude::*;
use netgauge_lib::MIN_TICK_INTERVAL;
use std::time::Duration;

/// Print `ticks` simulated bandwidth figures, one per interval.
pub(crate) async fn bandwidth(
    download_mbps: f64,
    upload_mbps: f64,
    interval_secs: f64,
    ticks: u32,
) -> Result<()> {
    let interval = parse_interval(interval_secs)?;
    let mut simulator = BandwidthSimulator::spawn(download_mbps, upload_mbps, interval);
    println!("{:>6} {:>14}", "TICK", "BANDWIDTH");
    for tick in 1..=ticks {
        tokio::select! {
            value = simulator.next() => match value {
                Some(mbps) => println!("{tick:>6} {:>9.2} Mbps", mbps),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    simulator.stop();

    Ok(())
}

/// Convert a seconds value to a tick period of at least [`MIN_TICK_INTERVAL`].
fn parse_interval(interval_secs: f64) -> Result<Duration> {
    if interval_secs <= 0.0 {
        bail!("Interval must be positive, got {interval_secs}");
    }
    let interval = Duration::try_from_secs_f64(interval_secs)
        .with_context(|| format!("Invalid interval: {interval_secs}"))?;
    if interval < MIN_TICK_INTERVAL {
        bail!(
            "Interval must be at least {}s, got {interval_secs}",
            MIN_TICK_INTERVAL.as_secs_f64()
        );
    }
    Ok(interval)
}

//! Cosmetic "current bandwidth" ticker.
//!
//! The simulated figure is for live displays only and never feeds the
//! [`TransferEstimator`](crate::TransferEstimator).

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Default period between recomputations.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Shortest accepted period; shorter intervals are raised to it.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Maximum relative deviation from the midpoint.
const JITTER: f64 = 0.1;

/// Midpoint of the two speeds perturbed by a uniform factor in `[0.9, 1.1]`.
pub fn simulate_bandwidth<R: Rng + ?Sized>(download_mbps: f64, upload_mbps: f64, rng: &mut R) -> f64 {
    let midpoint = (download_mbps + upload_mbps) / 2.0;
    midpoint * (1.0 + rng.gen_range(-JITTER..=JITTER))
}

/// Background task republishing a simulated bandwidth figure on a timer.
///
/// The task is cancelled by [`BandwidthSimulator::stop`] or when the
/// simulator is dropped.
#[derive(Debug)]
pub struct BandwidthSimulator {
    rx: watch::Receiver<f64>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl BandwidthSimulator {
    /// Spawns the ticker on the current tokio runtime.
    ///
    /// The first figure is published immediately, then once per `interval`.
    /// Intervals below [`MIN_TICK_INTERVAL`] are raised to it.
    #[must_use]
    pub fn spawn(download_mbps: f64, upload_mbps: f64, interval: Duration) -> Self {
        let interval = interval.max(MIN_TICK_INTERVAL);
        let (tx, rx) = watch::channel((download_mbps + upload_mbps) / 2.0);
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    () = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let value = simulate_bandwidth(download_mbps, upload_mbps, &mut rng);
                        if tx.send(value).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("bandwidth simulator stopped");
        });

        Self { rx, cancel, task }
    }

    /// Returns the latest simulated figure in Mbps.
    #[must_use]
    pub fn current(&self) -> f64 {
        *self.rx.borrow()
    }

    /// Waits for the next figure. Returns `None` once the ticker has stopped.
    pub async fn next(&mut self) -> Option<f64> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Returns an independent receiver of simulated figures.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.rx.clone()
    }

    /// Signals the ticker to stop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Returns true once the background task has exited.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for BandwidthSimulator {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

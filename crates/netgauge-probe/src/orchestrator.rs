//! Probe cycle orchestration.
//!
//! A cycle runs the IP, ping, download and upload probes strictly in order,
//! then fires the remote scan probes concurrently and waits for all of them
//! before appending one [`HistoryEntry`].

use bytes::Bytes;
use futures::future::join_all;
use netgauge_types::{HistoryEntry, HistorySeries, ProbeKey, ProbeValue};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::{RwLock, mpsc};

use crate::results::{ProbeResults, ResultSnapshot};
use crate::stream::{DownloadProgress, DownloadSample, throughput_mbps};
use crate::{ProbeClient, ProbeError};

/// Lifecycle of the most recent cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleState {
    /// No cycle has run, or the last one was abandoned.
    Idle,
    /// A cycle is in flight.
    Running,
    /// The last cycle finished and appended history.
    Completed,
}

/// Notification emitted while a cycle runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeEvent {
    /// A probe was issued.
    Started(ProbeKey),
    /// A download chunk arrived.
    DownloadProgress(DownloadProgress),
    /// A probe stored its final value.
    Settled(ProbeKey, ProbeValue),
    /// History was appended and the cycle is over.
    CycleCompleted(HistoryEntry),
}

/// Result of one completed cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    /// Every probe slot after the cycle.
    pub results: ResultSnapshot,
    /// The history entry appended by this cycle.
    pub entry: HistoryEntry,
    /// Measured download throughput in MB/s (0 on failure).
    pub download_mbps: f64,
    /// Measured upload throughput in MB/s (0 on failure).
    pub upload_mbps: f64,
}

/// Runs probe cycles against one backend and keeps the session history.
#[derive(Debug)]
pub struct ProbeOrchestrator {
    client: ProbeClient,
    results: ProbeResults,
    history: RwLock<HistorySeries>,
    state: Mutex<CycleState>,
    events: Option<mpsc::UnboundedSender<ProbeEvent>>,
}

impl ProbeOrchestrator {
    /// Creates an idle orchestrator.
    #[must_use]
    pub fn new(client: ProbeClient) -> Self {
        Self {
            client,
            results: ProbeResults::new(),
            history: RwLock::new(HistorySeries::new()),
            state: Mutex::new(CycleState::Idle),
            events: None,
        }
    }

    /// Sends [`ProbeEvent`]s to `events` during every cycle.
    #[must_use]
    pub fn with_events(mut self, events: mpsc::UnboundedSender<ProbeEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Returns the HTTP client.
    #[must_use]
    pub const fn client(&self) -> &ProbeClient {
        &self.client
    }

    /// Returns a handle to the live result map.
    #[must_use]
    pub const fn results(&self) -> &ProbeResults {
        &self.results
    }

    /// Returns a copy of the session history.
    pub async fn history(&self) -> HistorySeries {
        self.history.read().await.clone()
    }

    /// Returns the state of the most recent cycle.
    #[must_use]
    pub fn state(&self) -> CycleState {
        *lock_state(&self.state)
    }

    /// Runs one full probe cycle.
    ///
    /// Probe failures never abort the cycle; they are stored as text in the
    /// result map and the cycle still appends history.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::CycleInProgress`] if another cycle is running.
    pub async fn run_cycle(&self) -> Result<CycleReport, ProbeError> {
        let guard = CycleGuard::acquire(&self.state)?;
        self.results.reset().await;
        tracing::info!(base_url = self.client.base_url(), "starting probe cycle");

        self.run_retried(ProbeKey::Ip).await;
        self.probe_ping().await;

        let download = self.probe_download().await;
        let download_mbps = download
            .as_ref()
            .map_or(0.0, DownloadSample::throughput_mbps);
        let upload_mbps = match download {
            Some(sample) => self.probe_upload(sample.payload).await,
            None => {
                self.emit(ProbeEvent::Started(ProbeKey::Upload));
                self.settle(ProbeKey::Upload, "Upload skipped: no download payload")
                    .await;
                0.0
            }
        };

        join_all(ProbeKey::scans().iter().map(|&key| self.run_retried(key))).await;

        let ping_ms = self
            .results
            .get(ProbeKey::Ping)
            .await
            .and_then(|value| value.leading_number())
            .unwrap_or(0.0);
        let entry = HistoryEntry::now(ping_ms, download_mbps, upload_mbps);
        self.history.write().await.push(entry.clone());

        tracing::info!(ping_ms, download_mbps, upload_mbps, "probe cycle completed");
        self.emit(ProbeEvent::CycleCompleted(entry.clone()));
        guard.complete();

        Ok(CycleReport {
            results: self.results.snapshot().await,
            entry,
            download_mbps,
            upload_mbps,
        })
    }

    async fn run_retried(&self, key: ProbeKey) {
        self.emit(ProbeEvent::Started(key));
        let outcome = self.client.fetch_with_retry(key).await;
        self.settle(key, outcome.value).await;
    }

    /// The JSON ping value is stored, then replaced by wall-clock time.
    async fn probe_ping(&self) {
        self.emit(ProbeEvent::Started(ProbeKey::Ping));
        let start = Instant::now();
        let outcome = self.client.fetch_with_retry(ProbeKey::Ping).await;
        self.results.set(ProbeKey::Ping, outcome.value).await;

        let elapsed_ms = start.elapsed().as_millis();
        self.settle(ProbeKey::Ping, format!("{elapsed_ms}ms")).await;
    }

    async fn probe_download(&self) -> Option<DownloadSample> {
        self.emit(ProbeEvent::Started(ProbeKey::Download));
        let result = self
            .client
            .measure_download(|progress| self.emit(ProbeEvent::DownloadProgress(progress)))
            .await;

        match result {
            Ok(sample) => {
                let mbps = sample.throughput_mbps();
                tracing::debug!(bytes = sample.payload.len(), mbps, "download finished");
                self.settle(ProbeKey::Download, format!("Download Speed: {mbps:.2} MB/s"))
                    .await;
                Some(sample)
            }
            Err(e) => {
                tracing::warn!(error = %e, "download probe failed");
                self.settle(ProbeKey::Download, format!("Download failed: {e}"))
                    .await;
                None
            }
        }
    }

    async fn probe_upload(&self, payload: Bytes) -> f64 {
        self.emit(ProbeEvent::Started(ProbeKey::Upload));
        match self.client.upload(payload).await {
            Ok(sample) => {
                let mbps = throughput_mbps(sample.bytes as u64, sample.seconds());
                tracing::debug!(
                    bytes = sample.bytes,
                    server_seconds = ?sample.server_seconds,
                    mbps,
                    "upload finished"
                );
                self.settle(ProbeKey::Upload, format!("Upload Speed: {mbps:.2} MB/s"))
                    .await;
                mbps
            }
            Err(e) => {
                tracing::warn!(error = %e, "upload probe failed");
                self.settle(ProbeKey::Upload, format!("Upload failed: {e}"))
                    .await;
                0.0
            }
        }
    }

    async fn settle(&self, key: ProbeKey, value: impl Into<ProbeValue>) {
        let value = value.into();
        self.results.set(key, value.clone()).await;
        self.emit(ProbeEvent::Settled(key, value));
    }

    fn emit(&self, event: ProbeEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is watching.
            let _ = events.send(event);
        }
    }
}

fn lock_state(state: &Mutex<CycleState>) -> MutexGuard<'_, CycleState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a cycle as running for as long as it is held.
///
/// Dropping the guard without [`CycleGuard::complete`] (early return, panic
/// or a cancelled future) puts the orchestrator back to idle.
#[derive(Debug)]
struct CycleGuard<'a> {
    state: &'a Mutex<CycleState>,
    completed: bool,
}

impl<'a> CycleGuard<'a> {
    fn acquire(state: &'a Mutex<CycleState>) -> Result<Self, ProbeError> {
        let mut current = lock_state(state);
        if *current == CycleState::Running {
            return Err(ProbeError::CycleInProgress);
        }
        *current = CycleState::Running;
        Ok(Self {
            state,
            completed: false,
        })
    }

    fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        *lock_state(self.state) = if self.completed {
            CycleState::Completed
        } else {
            CycleState::Idle
        };
    }
}

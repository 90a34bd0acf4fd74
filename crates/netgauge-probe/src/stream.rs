//! Streamed download measurement.

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use std::time::{Duration, Instant};

use crate::{ProbeClient, ProbeError};

/// Bytes in one MB for throughput figures (binary).
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Upper bound on the buffer pre-allocated from `Content-Length`.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

/// Download progress after one received chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadProgress {
    /// Cumulative bytes received.
    pub received: u64,
    /// Expected body size from `Content-Length`, when known and non-zero.
    pub total: Option<u64>,
    /// Completion in `[0, 100]`, or `None` when the total is unknown.
    pub percent: Option<f64>,
}

impl DownloadProgress {
    /// Creates a progress report for `received` bytes out of `total`.
    #[must_use]
    pub fn new(received: u64, total: Option<u64>) -> Self {
        Self {
            received,
            total,
            percent: progress_percent(received, total),
        }
    }
}

/// Completed download.
#[derive(Debug, Clone)]
pub struct DownloadSample {
    /// All received bytes, concatenated.
    pub payload: Bytes,
    /// Time from request to last chunk.
    pub elapsed: Duration,
}

impl DownloadSample {
    /// Throughput in MB/s.
    #[must_use]
    pub fn throughput_mbps(&self) -> f64 {
        throughput_mbps(self.payload.len() as u64, self.elapsed.as_secs_f64())
    }
}

/// Computes `received / total * 100`, clamped to `[0, 100]`.
///
/// Returns `None` when the total is absent or zero.
#[must_use]
pub fn progress_percent(received: u64, total: Option<u64>) -> Option<f64> {
    let total = total.filter(|&t| t > 0)?;
    Some((received as f64 / total as f64 * 100.0).clamp(0.0, 100.0))
}

/// Computes throughput in MB/s. Returns 0 for a non-positive duration.
#[must_use]
pub fn throughput_mbps(bytes: u64, seconds: f64) -> f64 {
    if seconds > 0.0 {
        bytes as f64 / seconds / BYTES_PER_MB
    } else {
        0.0
    }
}

/// Consumes a response body chunk by chunk into a single buffer.
///
/// `on_progress` is called after every chunk. `started` marks the moment
/// the request was sent and anchors the elapsed time.
///
/// # Errors
///
/// Returns an error if the body stream fails mid-read.
pub async fn read_body(
    response: reqwest::Response,
    started: Instant,
    mut on_progress: impl FnMut(DownloadProgress),
) -> Result<DownloadSample, ProbeError> {
    let total = response.content_length().filter(|&len| len > 0);
    let capacity = total.map_or(0, |len| len.min(MAX_PREALLOC)) as usize;
    let mut buffer = BytesMut::with_capacity(capacity);

    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        buffer.extend_from_slice(&chunk);
        on_progress(DownloadProgress::new(buffer.len() as u64, total));
    }

    Ok(DownloadSample {
        payload: buffer.freeze(),
        elapsed: started.elapsed(),
    })
}

impl ProbeClient {
    /// Downloads the test payload, reporting progress per chunk.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or a
    /// broken body stream.
    pub async fn measure_download(
        &self,
        on_progress: impl FnMut(DownloadProgress),
    ) -> Result<DownloadSample, ProbeError> {
        let started = Instant::now();
        let response = self.open_download().await?;
        read_body(response, started, on_progress).await
    }
}

//! Per-cycle measurement history.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Format of [`HistoryEntry::timestamp`].
const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Measurements recorded at the end of one probe cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Local wall-clock time the cycle finished.
    pub timestamp: String,
    /// Round-trip latency in milliseconds.
    pub ping: f64,
    /// Download throughput in MB/s.
    pub download: f64,
    /// Upload throughput in MB/s.
    pub upload: f64,
}

impl HistoryEntry {
    /// Creates an entry with an explicit timestamp.
    #[must_use]
    pub fn new(timestamp: impl Into<String>, ping: f64, download: f64, upload: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            ping,
            download,
            upload,
        }
    }

    /// Creates an entry stamped with the current local time.
    #[must_use]
    pub fn now(ping: f64, download: f64, upload: f64) -> Self {
        Self::new(
            Local::now().format(TIMESTAMP_FORMAT).to_string(),
            ping,
            download,
            upload,
        )
    }
}

/// Insertion-ordered history for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistorySeries {
    entries: Vec<HistoryEntry>,
}

impl HistorySeries {
    /// Creates an empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Returns the number of recorded cycles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no cycle has completed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Iterates entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Mean ping across all entries.
    #[must_use]
    pub fn average_ping(&self) -> Option<f64> {
        self.average(|e| e.ping)
    }

    /// Mean download throughput across all entries.
    #[must_use]
    pub fn average_download(&self) -> Option<f64> {
        self.average(|e| e.download)
    }

    /// Mean upload throughput across all entries.
    #[must_use]
    pub fn average_upload(&self) -> Option<f64> {
        self.average(|e| e.upload)
    }

    fn average(&self, metric: impl Fn(&HistoryEntry) -> f64) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let sum: f64 = self.entries.iter().map(metric).sum();
        Some(sum / self.entries.len() as f64)
    }
}

impl<'a> IntoIterator for &'a HistorySeries {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

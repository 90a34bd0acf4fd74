//! Shared probe result map.

use netgauge_types::{ProbeKey, ProbeValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Snapshot of every probe slot, ordered by key.
pub type ResultSnapshot = BTreeMap<ProbeKey, ProbeValue>;

/// Result map shared between concurrently running probes.
///
/// Each probe writes only its own key, so concurrent writers never race on
/// a slot. Readers may see a partially updated map while probes run.
/// Cloning yields a handle to the same map.
#[derive(Debug, Clone)]
pub struct ProbeResults {
    slots: Arc<RwLock<ResultSnapshot>>,
}

impl ProbeResults {
    /// Creates a map with every slot set to its placeholder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Arc::new(RwLock::new(placeholders())),
        }
    }

    /// Stores a value in one slot.
    pub async fn set(&self, key: ProbeKey, value: impl Into<ProbeValue>) {
        self.slots.write().await.insert(key, value.into());
    }

    /// Returns the current value of one slot.
    pub async fn get(&self, key: ProbeKey) -> Option<ProbeValue> {
        self.slots.read().await.get(&key).cloned()
    }

    /// Returns a copy of every slot.
    pub async fn snapshot(&self) -> ResultSnapshot {
        self.slots.read().await.clone()
    }

    /// Restores every slot to its placeholder.
    pub async fn reset(&self) {
        *self.slots.write().await = placeholders();
    }
}

impl Default for ProbeResults {
    fn default() -> Self {
        Self::new()
    }
}

fn placeholders() -> ResultSnapshot {
    ProbeKey::all()
        .iter()
        .map(|&key| (key, ProbeValue::from(key.placeholder())))
        .collect()
}

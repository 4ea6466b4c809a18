//! Process-local snapshot store.
//!
//! Keeps the append-only log in memory. Nothing survives a restart, so this
//! backend is meant for local runs and tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use weather_proxy_core::domain::{Snapshot, SnapshotId};
use weather_proxy_core::{Result, SnapshotStore};

#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshots: RwLock<Vec<Snapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.snapshots.read().await.is_empty()
    }

    /// All snapshots in insertion order
    pub async fn all(&self) -> Vec<Snapshot> {
        self.snapshots.read().await.clone()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn append(&self, payload: &str) -> Result<Snapshot> {
        let mut snapshots = self.snapshots.write().await;
        // ids are assigned under the write lock, so they stay unique and monotonic
        let id = SnapshotId(snapshots.len() as i64 + 1);
        let snapshot = Snapshot::new(id, payload, Utc::now());
        snapshots.push(snapshot.clone());

        tracing::debug!(id = %snapshot.id, "Weather snapshot stored in memory");
        Ok(snapshot)
    }

    async fn latest(&self) -> Result<Option<Snapshot>> {
        let snapshots = self.snapshots.read().await;
        let latest = snapshots.iter().fold(None::<&Snapshot>, |best, candidate| match best {
            Some(current) if !candidate.is_newer_than(current) => Some(current),
            _ => Some(candidate),
        });

        Ok(latest.cloned())
    }
}

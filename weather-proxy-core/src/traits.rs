use async_trait::async_trait;

use crate::domain::Snapshot;
use crate::error::Result;

/// Durable append-only log of fetched weather payloads.
///
/// Implementations own snapshot lifetime: ids and capture timestamps are
/// assigned here, never by callers, and there is no update or delete.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist a validated payload and return the stored snapshot.
    async fn append(&self, payload: &str) -> Result<Snapshot>;

    /// The snapshot with the greatest `captured_at`, or `None` when empty.
    async fn latest(&self) -> Result<Option<Snapshot>>;

    /// Whether the backing store can currently serve requests.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

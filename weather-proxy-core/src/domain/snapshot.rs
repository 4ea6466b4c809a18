use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::SnapshotId;

/// One persisted upstream response.
///
/// `payload` is the upstream body exactly as received. It is only ever
/// written after it parsed as JSON, and it is never re-serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub payload: String,
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(id: SnapshotId, payload: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            id,
            payload: payload.into(),
            captured_at,
        }
    }

    /// Time elapsed since capture, relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.captured_at
    }

    /// Ordering used to pick the latest snapshot: newest capture first,
    /// higher id breaking ties.
    pub fn is_newer_than(&self, other: &Snapshot) -> bool {
        (self.captured_at, self.id) > (other.captured_at, other.id)
    }
}

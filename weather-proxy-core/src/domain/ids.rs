use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of a persisted snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SnapshotId(pub i64);

impl SnapshotId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SnapshotId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<SnapshotId> for i64 {
    fn from(id: SnapshotId) -> Self {
        id.0
    }
}

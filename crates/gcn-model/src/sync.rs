//! Bulk-sync log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One append-only record of a bulk ACL sync.
///
/// Only the most recent record is ever read, to show "last synced" on the
/// admin page. Records are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecord {
    /// When the sync ran.
    pub synced_on: DateTime<Utc>,
    /// Identity of the administrator that triggered it.
    pub synced_by: String,
}

impl SyncRecord {
    /// Creates a record timestamped now.
    #[must_use]
    pub fn now(synced_by: impl Into<String>) -> Self {
        Self {
            synced_on: Utc::now(),
            synced_by: synced_by.into(),
        }
    }
}

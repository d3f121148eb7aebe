//! The persistence collaborator.
//!
//! The core never builds SQL or manages connections; it talks to whatever
//! implements [`LogStore`]. A production implementation maps these calls
//! onto an INSERT and an UPDATE against the configured log table; the
//! bundled [`memory::MemoryLogStore`] keeps rows in process for tests and
//! demos.

pub mod memory;

use crate::core::{PersistError, Status};
use crate::identity::RunIdentity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use memory::MemoryLogStore;

/// Opaque identifier of a persisted log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Row written when a record is first created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLogEntry {
    /// Target log table; each app routes to its own table.
    pub log_table: String,
    pub status: Status,
    pub user_name: String,
    pub user_ip: String,
    pub user_machine: String,
    pub app_name: String,
    pub app_version: String,
    pub time_start: DateTime<Utc>,
    pub time_end: Option<DateTime<Utc>>,
    /// Whole seconds between start and end; null until the first update.
    pub time_elapsed: Option<i64>,
    pub detail: String,
}

impl NewLogEntry {
    pub fn new(
        log_table: impl Into<String>,
        app_name: impl Into<String>,
        app_version: impl Into<String>,
        identity: RunIdentity,
        time_start: DateTime<Utc>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            log_table: log_table.into(),
            status: Status::START,
            user_name: identity.user_name,
            user_ip: identity.user_ip,
            user_machine: identity.user_machine,
            app_name: app_name.into(),
            app_version: app_version.into(),
            time_start,
            time_end: None,
            time_elapsed: None,
            detail: detail.into(),
        }
    }
}

/// Fields touched by an update to an existing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogUpdate {
    pub status: Status,
    pub time_end: DateTime<Utc>,
    /// Whole seconds between the row's `time_start` and `time_end`.
    pub time_elapsed: i64,
    pub detail: String,
}

/// One round trip per call, no caching, no batching. Calls against a single
/// record are strictly sequential (the heartbeat stop protocol guarantees
/// the loop has exited before the terminal update fires), so implementations
/// need no per-record locking.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Persist a new row, returning its identifier.
    async fn create_entry(&self, entry: NewLogEntry) -> Result<RecordId, PersistError>;

    /// Persist new status/detail/end-time fields for an existing row.
    async fn update_entry(&self, id: RecordId, update: LogUpdate) -> Result<(), PersistError>;
}

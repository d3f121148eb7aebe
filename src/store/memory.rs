//! In-memory [`LogStore`] used by the demo binary and the test suite.

use super::{LogStore, LogUpdate, NewLogEntry, RecordId};
use crate::core::{PersistError, Status};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::Mutex;

/// A fully materialized row, as a SQL log table would hold it.
#[derive(Debug, Clone, Serialize)]
pub struct StoredEntry {
    pub id: RecordId,
    pub log_table: String,
    pub status: Status,
    pub user_name: String,
    pub user_ip: String,
    pub user_machine: String,
    pub app_name: String,
    pub app_version: String,
    pub time_start: DateTime<Utc>,
    pub time_end: Option<DateTime<Utc>>,
    pub time_elapsed: Option<i64>,
    pub detail: String,
}

/// One persistence call as the store observed it. Tests assert on this
/// sequence to check ordering guarantees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Create { id: RecordId, status: Status },
    Update { id: RecordId, status: Status },
}

#[derive(Default)]
struct Inner {
    entries: Vec<StoredEntry>,
    history: Vec<StoreOp>,
}

/// Keeps rows in process memory. `set_offline(true)` makes every call fail
/// with a connectivity error, simulating a persistence outage.
#[derive(Default)]
pub struct MemoryLogStore {
    next_id: AtomicI64,
    offline: AtomicBool,
    inner: Mutex<Inner>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn entries(&self) -> Vec<StoredEntry> {
        self.inner.lock().await.entries.clone()
    }

    pub async fn entry(&self, id: RecordId) -> Option<StoredEntry> {
        let inner = self.inner.lock().await;
        inner.entries.iter().find(|e| e.id == id).cloned()
    }

    /// Every create/update in arrival order.
    pub async fn history(&self) -> Vec<StoreOp> {
        self.inner.lock().await.history.clone()
    }

    /// Status codes in arrival order, the shape most tests assert on.
    pub async fn status_history(&self) -> Vec<Status> {
        self.inner
            .lock()
            .await
            .history
            .iter()
            .map(|op| match op {
                StoreOp::Create { status, .. } => *status,
                StoreOp::Update { status, .. } => *status,
            })
            .collect()
    }

    fn check_online(&self) -> Result<(), PersistError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(PersistError::Connectivity(
                "log store is offline".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn create_entry(&self, entry: NewLogEntry) -> Result<RecordId, PersistError> {
        self.check_online()?;
        let id = RecordId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut inner = self.inner.lock().await;
        inner.entries.push(StoredEntry {
            id,
            log_table: entry.log_table,
            status: entry.status,
            user_name: entry.user_name,
            user_ip: entry.user_ip,
            user_machine: entry.user_machine,
            app_name: entry.app_name,
            app_version: entry.app_version,
            time_start: entry.time_start,
            time_end: entry.time_end,
            time_elapsed: entry.time_elapsed,
            detail: entry.detail,
        });
        inner.history.push(StoreOp::Create {
            id,
            status: Status::START,
        });
        Ok(id)
    }

    async fn update_entry(&self, id: RecordId, update: LogUpdate) -> Result<(), PersistError> {
        self.check_online()?;
        let mut inner = self.inner.lock().await;
        let entry = inner
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(PersistError::EntryNotFound(id.0))?;
        entry.status = update.status;
        entry.time_end = Some(update.time_end);
        entry.time_elapsed = Some(update.time_elapsed);
        entry.detail = update.detail;
        inner.history.push(StoreOp::Update {
            id,
            status: update.status,
        });
        Ok(())
    }
}

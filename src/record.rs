//! One logical log entry: in-memory state plus its create/update round trips.

use crate::core::Status;
use crate::identity::RunIdentity;
use crate::store::{LogStore, LogUpdate, NewLogEntry, RecordId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

const TARGET: &str = "proclog";

/// Tracks one row of a log table through a task's lifetime.
///
/// Identity (app, version, table, who/where) is fixed at construction;
/// `status` and `detail` move only through [`update`](LogRecord::update).
///
/// Persistence failures never propagate: they are reported on the `proclog`
/// tracing target and swallowed, because the logging subsystem must not be
/// able to crash the task it observes. A record whose initial create failed
/// stays unsaved and every later update silently skips.
pub struct LogRecord {
    store: Arc<dyn LogStore>,
    id: Option<RecordId>,
    saved: bool,
    status: Status,
    detail: String,
    app_name: String,
    app_version: String,
    log_table: String,
    identity: RunIdentity,
    time_start: DateTime<Utc>,
}

impl LogRecord {
    /// Detail is free-form text, JSON-encoded by convention.
    pub fn new(
        store: Arc<dyn LogStore>,
        app_name: impl Into<String>,
        app_version: impl Into<String>,
        log_table: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            store,
            id: None,
            saved: false,
            status: Status::START,
            detail: detail.into(),
            app_name: app_name.into(),
            app_version: app_version.into(),
            log_table: log_table.into(),
            identity: RunIdentity::detect(),
            time_start: Utc::now(),
        }
    }

    /// Replace the auto-detected identity before the first create.
    pub fn with_identity(mut self, identity: RunIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Persist the initial row (`status = 0`, no end time yet).
    ///
    /// Idempotent: once a create has succeeded, later calls return the
    /// existing id without another round trip. Returns `None` if the store
    /// rejected the row; the failure is reported, not raised.
    pub async fn create(&mut self) -> Option<RecordId> {
        if self.saved {
            return self.id;
        }

        let entry = NewLogEntry::new(
            self.log_table.clone(),
            self.app_name.clone(),
            self.app_version.clone(),
            self.identity.clone(),
            self.time_start,
            self.detail.clone(),
        );

        match self.store.create_entry(entry).await {
            Ok(id) => {
                self.id = Some(id);
                self.saved = true;
                debug!(target: TARGET, %id, app = %self.app_name, "log entry created");
                Some(id)
            }
            Err(err) => {
                warn!(target: TARGET, app = %self.app_name, error = %err, "log create failed");
                None
            }
        }
    }

    /// Persist a new status and detail, stamping `time_end = now` and the
    /// elapsed whole seconds since `time_start`.
    ///
    /// Skips silently when the record was never saved: a row that does not
    /// exist must not be updated. Store failures are reported and swallowed.
    pub async fn update(&mut self, status: Status, detail: impl Into<String>) {
        let detail = detail.into();
        let Some(id) = self.id else {
            debug!(target: TARGET, app = %self.app_name, "update skipped, entry was never saved");
            return;
        };

        let time_end = Utc::now();
        let update = LogUpdate {
            status,
            time_end,
            time_elapsed: (time_end - self.time_start).num_seconds(),
            detail: detail.clone(),
        };

        match self.store.update_entry(id, update).await {
            Ok(()) => {
                self.status = status;
                self.detail = detail;
            }
            Err(err) => {
                warn!(target: TARGET, %id, app = %self.app_name, error = %err, "log update failed");
            }
        }
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn time_start(&self) -> DateTime<Utc> {
        self.time_start
    }
}

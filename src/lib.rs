// ============================================================================
// proclog Library
// ============================================================================

pub mod core;
pub mod heartbeat;
pub mod identity;
pub mod record;
pub mod signal;
pub mod store;

// Re-export main types for convenience
pub use crate::core::{LogError, PersistError, Result, Status};
pub use crate::heartbeat::{HeartbeatConfig, PeriodicHeartbeat};
pub use crate::identity::RunIdentity;
pub use crate::record::LogRecord;
pub use crate::signal::{shutdown_signal, stop_on_interrupt};
pub use crate::store::{LogStore, LogUpdate, MemoryLogStore, NewLogEntry, RecordId};

use std::sync::Arc;

/// Start heartbeat logging for a process.
///
/// Persists the initial entry (status 0) against `log_table` and launches a
/// background loop that writes a status-50 "still alive" update every
/// `period_secs` seconds. Stop it with [`PeriodicHeartbeat::stop`]; to bind
/// the stop to Ctrl-C, pass the returned value through
/// [`stop_on_interrupt`].
///
/// # Examples
///
/// ```no_run
/// use proclog::{MemoryLogStore, Status};
/// use std::sync::Arc;
///
/// # async fn run() -> proclog::Result<()> {
/// let store = Arc::new(MemoryLogStore::new());
/// let heartbeat = proclog::start(
///     store.clone(),
///     "best App",
///     "9001",
///     "best_app_log_tb",
///     r#"{"job":"nightly refresh"}"#,
///     60,
/// )
/// .await?;
///
/// // ... do the actual work ...
///
/// heartbeat.stop().await;
/// assert_eq!(store.entries().await[0].status, Status::FINISHED);
/// # Ok(())
/// # }
/// ```
pub async fn start(
    store: Arc<dyn LogStore>,
    app_name: impl Into<String>,
    app_version: impl Into<String>,
    log_table: impl Into<String>,
    detail: impl Into<String>,
    period_secs: u64,
) -> Result<PeriodicHeartbeat> {
    let record = LogRecord::new(store, app_name, app_version, log_table, detail);
    PeriodicHeartbeat::start(record, HeartbeatConfig::every_secs(period_secs)).await
}

/// Log record tests
///
/// Create/update round trips, idempotency, and the fail-soft contract
/// Run with: cargo test --test record_tests

use proclog::{LogRecord, MemoryLogStore, RunIdentity, Status};
use proclog::store::memory::StoreOp;
use std::sync::Arc;

fn record(store: &Arc<MemoryLogStore>) -> LogRecord {
    LogRecord::new(
        store.clone(),
        "best App",
        "9001",
        "best_app_log_tb",
        r#"{"what":"the thing the app does"}"#,
    )
    .with_identity(RunIdentity::new("alice", "10.0.0.7", "worker-1"))
}

#[tokio::test]
async fn create_persists_initial_row() {
    let store = Arc::new(MemoryLogStore::new());
    let mut record = record(&store);

    let id = record.create().await.unwrap();
    assert!(record.is_saved());
    assert_eq!(record.id(), Some(id));

    let row = store.entry(id).await.unwrap();
    assert_eq!(row.status, Status::START);
    assert_eq!(row.user_name, "alice");
    assert_eq!(row.user_ip, "10.0.0.7");
    assert_eq!(row.user_machine, "worker-1");
    assert_eq!(row.app_name, "best App");
    assert_eq!(row.app_version, "9001");
    assert_eq!(row.log_table, "best_app_log_tb");
    assert!(row.time_end.is_none());
    assert!(row.time_elapsed.is_none());
}

#[tokio::test]
async fn create_is_idempotent() {
    let store = Arc::new(MemoryLogStore::new());
    let mut record = record(&store);

    let first = record.create().await.unwrap();
    let second = record.create().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(store.entries().await.len(), 1);
    assert_eq!(store.history().await.len(), 1);
}

#[tokio::test]
async fn update_before_create_is_a_noop() {
    let store = Arc::new(MemoryLogStore::new());
    let mut record = record(&store);

    record.update(Status::FINISHED, "never persisted").await;
    assert!(store.history().await.is_empty());
    assert_eq!(record.status(), Status::START);
}

#[tokio::test]
async fn update_stamps_end_time_and_elapsed() {
    let store = Arc::new(MemoryLogStore::new());
    let mut record = record(&store);
    let id = record.create().await.unwrap();

    record.update(Status::FINISHED, "done").await;

    let row = store.entry(id).await.unwrap();
    assert_eq!(row.status, Status::FINISHED);
    assert_eq!(row.detail, "done");
    let time_end = row.time_end.unwrap();
    assert!(time_end >= row.time_start);
    assert_eq!(
        row.time_elapsed.unwrap(),
        (time_end - row.time_start).num_seconds()
    );
    assert_eq!(record.status(), Status::FINISHED);
    assert_eq!(record.detail(), "done");
}

#[tokio::test]
async fn failed_create_disables_all_later_updates() {
    let store = Arc::new(MemoryLogStore::new());
    store.set_offline(true);
    let mut record = record(&store);

    assert!(record.create().await.is_none());
    assert!(!record.is_saved());

    // The outage ends, but the record was never saved: permanent skip.
    store.set_offline(false);
    record.update(Status::HEARTBEAT, "still alive").await;
    record.update(Status::FINISHED, "done").await;
    assert!(store.history().await.is_empty());
}

#[tokio::test]
async fn failed_update_is_swallowed() {
    let store = Arc::new(MemoryLogStore::new());
    let mut record = record(&store);
    let id = record.create().await.unwrap();

    store.set_offline(true);
    record.update(Status::FAILED, "lost").await;

    // The row is untouched and the record keeps its last good state.
    let row = store.entry(id).await.unwrap();
    assert_eq!(row.status, Status::START);
    assert_eq!(record.status(), Status::START);

    store.set_offline(false);
    record.update(Status::FINISHED, "recovered").await;
    assert_eq!(store.entry(id).await.unwrap().status, Status::FINISHED);
}

#[tokio::test]
async fn history_tracks_operation_order() {
    let store = Arc::new(MemoryLogStore::new());
    let mut record = record(&store);
    let id = record.create().await.unwrap();
    record.update(Status::HEARTBEAT, "alive").await;
    record.update(Status::FINISHED, "done").await;

    assert_eq!(
        store.history().await,
        vec![
            StoreOp::Create { id, status: Status::START },
            StoreOp::Update { id, status: Status::HEARTBEAT },
            StoreOp::Update { id, status: Status::FINISHED },
        ]
    );
}

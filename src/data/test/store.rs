use super::*;
use crate::{config::StorageBackend, data::store::StateStore};

/// Tests the SQLite backend with a full snapshot.
///
/// Expected: loaded snapshot equals the saved one
#[tokio::test]
async fn sql_store_round_trips_snapshot() -> Result<(), AppError> {
    let test = TestBuilder::new().with_tracker_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = TempDataDir::new().unwrap();
    let store = StateStore::for_backend(StorageBackend::Sqlite, dir.path(), db);
    let snapshot = sample_snapshot();

    store.save(&snapshot).await?;
    let loaded = store.load().await?;

    assert_eq!(loaded.records, snapshot.records);
    assert_eq!(loaded.demoted, snapshot.demoted);
    assert_eq!(loaded.under_review, snapshot.under_review);
    assert_eq!(loaded.sessions, snapshot.sessions);
    Ok(())
}

/// Tests that a second save replaces rather than accumulates.
///
/// Expected: removed users disappear from every table
#[tokio::test]
async fn sql_store_save_replaces_previous_state() -> Result<(), AppError> {
    let test = TestBuilder::new().with_tracker_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = TempDataDir::new().unwrap();
    let store = StateStore::for_backend(StorageBackend::Sqlite, dir.path(), db);

    store.save(&sample_snapshot()).await?;
    store.save(&TrackerSnapshot::default()).await?;
    let loaded = store.load().await?;

    assert_eq!(loaded, TrackerSnapshot::default());
    Ok(())
}

/// Tests that the JSON backend writes into the data directory.
///
/// Expected: loaded snapshot equals the saved one
#[tokio::test]
async fn json_store_round_trips_snapshot() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = TempDataDir::new().unwrap();
    let store = StateStore::for_backend(StorageBackend::Json, dir.path(), db);
    let snapshot = sample_snapshot();

    store.save(&snapshot).await?;

    assert_eq!(store.load().await?, snapshot);
    let demoted: HashSet<u64> = snapshot.demoted;
    assert!(demoted.contains(&11));
    Ok(())
}

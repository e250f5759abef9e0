use super::*;
use crate::data::json_store::{
    load_json, read_json, save_json, JsonStateStore, ACTIVE_POLLS_FILE, BACKUPS_KEPT,
    USER_ACTIVITY_FILE,
};

fn backups_of(dir: &TempDataDir, file: &str) -> Vec<String> {
    let prefix = format!("{}.backup.", file);
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok()?.file_name().into_string().ok())
        .filter(|name| name.starts_with(&prefix))
        .collect();
    names.sort();
    names
}

/// Tests that a saved snapshot loads back unchanged.
///
/// Expected: every map and set survives the trip through the four files
#[tokio::test]
async fn saves_and_loads_snapshot() -> Result<(), AppError> {
    let dir = TempDataDir::new().unwrap();
    let store = JsonStateStore::new(dir.path());
    let snapshot = sample_snapshot();

    store.save(&snapshot).await?;
    let loaded = store.load().await;

    assert_eq!(loaded, snapshot);
    assert!(dir.join(ACTIVE_POLLS_FILE).exists());
    Ok(())
}

/// Tests loading from an empty data directory.
///
/// Expected: empty snapshot, no error
#[tokio::test]
async fn loads_empty_when_no_files() {
    let dir = TempDataDir::new().unwrap();
    let store = JsonStateStore::new(dir.path());

    let loaded = store.load().await;

    assert_eq!(loaded, TrackerSnapshot::default());
}

/// Tests that saving over an existing file leaves a backup and no temp file.
///
/// Expected: one backup after the second save, target holds the new value
#[tokio::test]
async fn rotates_backup_on_overwrite() -> Result<(), AppError> {
    let dir = TempDataDir::new().unwrap();
    let path = dir.join(USER_ACTIVITY_FILE);

    save_json(&path, &vec![1u64]).await?;
    assert!(backups_of(&dir, USER_ACTIVITY_FILE).is_empty());

    save_json(&path, &vec![2u64]).await?;

    assert_eq!(backups_of(&dir, USER_ACTIVITY_FILE).len(), 1);
    assert_eq!(read_json::<Vec<u64>>(&path).await?, vec![2]);
    assert!(!dir.join(&format!("{}.tmp", USER_ACTIVITY_FILE)).exists());
    Ok(())
}

/// Tests that only the newest backups are retained.
///
/// Expected: at most BACKUPS_KEPT backups after many saves
#[tokio::test]
async fn prunes_old_backups() -> Result<(), AppError> {
    let dir = TempDataDir::new().unwrap();
    let path = dir.join(USER_ACTIVITY_FILE);

    for i in 0..6u64 {
        save_json(&path, &vec![i]).await?;
        tokio::time::sleep(std::time::Duration::from_millis(3)).await;
    }

    assert_eq!(backups_of(&dir, USER_ACTIVITY_FILE).len(), BACKUPS_KEPT);
    Ok(())
}

/// Tests recovery from a corrupt file.
///
/// Expected: the most recent readable backup is loaded
#[tokio::test]
async fn corrupt_file_falls_back_to_latest_backup() {
    let dir = TempDataDir::new().unwrap();
    let path = dir.join(USER_ACTIVITY_FILE);
    std::fs::write(dir.join(&format!("{}.backup.20260101000000000", USER_ACTIVITY_FILE)), "[1]")
        .unwrap();
    std::fs::write(dir.join(&format!("{}.backup.20260102000000000", USER_ACTIVITY_FILE)), "[2]")
        .unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let loaded: Vec<u64> = load_json(&path).await;

    assert_eq!(loaded, vec![2]);
}

/// Tests recovery when the newest backup is also corrupt.
///
/// Expected: older readable backup is used
#[tokio::test]
async fn skips_unreadable_backups() {
    let dir = TempDataDir::new().unwrap();
    let path = dir.join(USER_ACTIVITY_FILE);
    std::fs::write(dir.join(&format!("{}.backup.20260101000000000", USER_ACTIVITY_FILE)), "[1]")
        .unwrap();
    std::fs::write(dir.join(&format!("{}.backup.20260102000000000", USER_ACTIVITY_FILE)), "garbage")
        .unwrap();
    std::fs::write(&path, "garbage").unwrap();

    let loaded: Vec<u64> = load_json(&path).await;

    assert_eq!(loaded, vec![1]);
}

/// Tests a corrupt file with no backups.
///
/// Expected: empty default without raising
#[tokio::test]
async fn corrupt_file_without_backup_loads_default() {
    let dir = TempDataDir::new().unwrap();
    let path = dir.join(USER_ACTIVITY_FILE);
    std::fs::write(&path, "{{{{").unwrap();

    let loaded: HashMap<u64, UserActivityRecord> = load_json(&path).await;

    assert!(loaded.is_empty());
    assert!(matches!(
        read_json::<HashMap<u64, UserActivityRecord>>(&path).await,
        Err(AppError::CorruptPersistence { .. })
    ));
}

/// Tests that resolved sessions found on disk are not restored.
///
/// Expected: only open sessions are loaded
#[tokio::test]
async fn drops_closed_sessions_on_load() -> Result<(), AppError> {
    let dir = TempDataDir::new().unwrap();
    let now = Utc::now();
    let open = VoteSession::open(SessionKind::Ghost, 1, 1, now, Duration::hours(24));
    let mut resolved = VoteSession::open(SessionKind::Ghost, 2, 1, now, Duration::hours(24));
    resolved.cast(5, ModerationAction::Kick, now).unwrap();

    let polls: HashMap<String, VoteSession> = HashMap::from([
        (open.key().to_string(), open.clone()),
        (resolved.key().to_string(), resolved),
    ]);
    save_json(&dir.join(ACTIVE_POLLS_FILE), &polls).await?;

    let loaded = JsonStateStore::new(dir.path()).load().await;

    assert_eq!(loaded.sessions.len(), 1);
    assert_eq!(loaded.sessions.get(&open.key()), Some(&open));
    Ok(())
}

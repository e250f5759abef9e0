//! JSON file persistence for the tracker state.
//!
//! Every save writes to a temporary file and renames it over the target, after copying the
//! previous version to `<file>.backup.<timestamp>`. Only the newest [`BACKUPS_KEPT`] backups
//! are retained. Loading never fails: an unreadable file falls back to the most recent
//! readable backup, and if none exists, to an empty default.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::AppError,
    model::{
        activity::{ReviewEntry, UserActivityRecord},
        snapshot::TrackerSnapshot,
        vote::VoteSession,
    },
};

pub const USER_ACTIVITY_FILE: &str = "user_activity.json";
pub const DEMOTED_USERS_FILE: &str = "demoted_users.json";
pub const USERS_UNDER_REVIEW_FILE: &str = "users_under_review.json";
pub const ACTIVE_POLLS_FILE: &str = "active_polls.json";

/// Number of `.backup.*` copies kept per file.
pub const BACKUPS_KEPT: usize = 3;

/// Atomically writes `value` as pretty JSON to `path`, rotating backups.
///
/// # Arguments
/// - `path` - Target file; its parent directory is created if missing
/// - `value` - Value to serialize
///
/// # Returns
/// - `Ok(())` - File written and renamed into place
/// - `Err(AppError::JsonErr)` - Value could not be serialized
/// - `Err(AppError::IoErr)` - Filesystem error while writing, copying or renaming
pub async fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let contents = serde_json::to_vec_pretty(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    if tokio::fs::try_exists(path).await? {
        let backup = backup_path(path, &Utc::now().format("%Y%m%d%H%M%S%3f").to_string());
        tokio::fs::copy(path, &backup).await?;
        prune_backups(path).await?;
    }

    let tmp = sibling(path, ".tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await?;

    Ok(())
}

/// Reads and decodes a single JSON document.
///
/// # Returns
/// - `Ok(T)` - Decoded value
/// - `Err(AppError::IoErr)` - File missing or unreadable
/// - `Err(AppError::CorruptPersistence)` - File is not valid JSON for `T`
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let bytes = tokio::fs::read(path).await?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::CorruptPersistence {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Loads `path`, falling back to the newest readable backup, else `T::default()`.
pub async fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_json(path).await {
        Ok(value) => return value,
        Err(AppError::IoErr(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("{} does not exist yet", path.display());
        }
        Err(e) => tracing::warn!("Failed to load {}: {}", path.display(), e),
    }

    let backups = match list_backups(path).await {
        Ok(backups) => backups,
        Err(e) => {
            tracing::warn!("Failed to list backups of {}: {}", path.display(), e);
            Vec::new()
        }
    };

    for backup in backups.iter().rev() {
        match read_json(backup).await {
            Ok(value) => {
                tracing::warn!("Recovered {} from {}", path.display(), backup.display());
                return value;
            }
            Err(e) => tracing::warn!("Skipping unreadable backup {}: {}", backup.display(), e),
        }
    }

    T::default()
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn backup_path(path: &Path, stamp: &str) -> PathBuf {
    sibling(path, &format!(".backup.{}", stamp))
}

/// Backups of `path`, oldest first.
async fn list_backups(path: &Path) -> Result<Vec<PathBuf>, AppError> {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };
    let prefix = format!("{}.backup.", file_name);
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    };

    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut backups = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            if name.starts_with(&prefix) {
                backups.push(entry.path());
            }
        }
    }
    // Timestamps are fixed-width, so lexical order is chronological.
    backups.sort();

    Ok(backups)
}

async fn prune_backups(path: &Path) -> Result<(), AppError> {
    let backups = list_backups(path).await?;
    let excess = backups.len().saturating_sub(BACKUPS_KEPT);
    for old in &backups[..excess] {
        tokio::fs::remove_file(old).await?;
    }
    Ok(())
}

/// The four JSON files backing the tracker in the data directory.
pub struct JsonStateStore {
    dir: PathBuf,
}

impl JsonStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loads every file, recovering from corruption per file.
    pub async fn load(&self) -> TrackerSnapshot {
        let records: HashMap<u64, UserActivityRecord> =
            load_json(&self.dir.join(USER_ACTIVITY_FILE)).await;
        let demoted: Vec<u64> = load_json(&self.dir.join(DEMOTED_USERS_FILE)).await;
        let under_review: HashMap<u64, ReviewEntry> =
            load_json(&self.dir.join(USERS_UNDER_REVIEW_FILE)).await;
        let polls: HashMap<String, VoteSession> =
            load_json(&self.dir.join(ACTIVE_POLLS_FILE)).await;

        TrackerSnapshot {
            records,
            demoted: demoted.into_iter().collect::<HashSet<_>>(),
            under_review,
            sessions: polls
                .into_values()
                .filter(|session| session.is_open())
                .map(|session| (session.key(), session))
                .collect(),
        }
    }

    /// Writes every file. Maps are written in key order.
    pub async fn save(&self, snapshot: &TrackerSnapshot) -> Result<(), AppError> {
        let records: BTreeMap<u64, &UserActivityRecord> =
            snapshot.records.iter().map(|(k, v)| (*k, v)).collect();
        let mut demoted: Vec<u64> = snapshot.demoted.iter().copied().collect();
        demoted.sort_unstable();
        let under_review: BTreeMap<u64, &ReviewEntry> =
            snapshot.under_review.iter().map(|(k, v)| (*k, v)).collect();
        let polls: BTreeMap<String, &VoteSession> = snapshot
            .sessions
            .iter()
            .map(|(key, session)| (key.to_string(), session))
            .collect();

        save_json(&self.dir.join(USER_ACTIVITY_FILE), &records).await?;
        save_json(&self.dir.join(DEMOTED_USERS_FILE), &demoted).await?;
        save_json(&self.dir.join(USERS_UNDER_REVIEW_FILE), &under_review).await?;
        save_json(&self.dir.join(ACTIVE_POLLS_FILE), &polls).await?;

        Ok(())
    }
}

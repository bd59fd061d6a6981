//! Durable key/value storage and the cache snapshot kept in it.

use crate::cache::CacheEntry;
use crate::error::StorageError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

pub const DEFAULT_STORAGE_KEY: &str = "liga_cache";

/// String key/value storage supplied by the host. Calls are synchronous;
/// volumes are small.
pub trait KeyValueStorage: Send + Sync {
    fn read_string(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write_string(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(key).cloned())
    }

    fn write_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per storage key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// # Errors
    ///
    /// Will return `Err` if the directory cannot be created
    pub fn new(dir: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// `$XDG_CACHE_HOME/<app>`, then `~/.cache/<app>`, then `./.cache/<app>`.
    #[must_use]
    pub fn default_dir(app_name: &str) -> PathBuf {
        let base = std::env::var_os("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".cache")))
            .unwrap_or_else(|| PathBuf::from(".cache"));
        base.join(app_name)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn read_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn write_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        atomic_write(&self.key_path(key), value.as_bytes())?;
        Ok(())
    }
}

const TMP_ATTEMPTS: usize = 3;

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Write to a fresh temp file beside `path`, then rename over it.
fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    for _ in 0..TMP_ATTEMPTS {
        let tmp_path = unique_tmp_path(path);
        match write_and_rename(&tmp_path, path, bytes) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                let _ = fs::remove_file(&tmp_path);
                return Err(e);
            }
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "no unique temporary file after retries",
    ))
}

// .<file>.tmp.<pid>.<nanos>.<seq>
fn unique_tmp_path(path: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("snapshot");
    path.with_file_name(format!(
        ".{file_name}.tmp.{}.{nanos}.{seq}",
        std::process::id()
    ))
}

fn write_and_rename(tmp_path: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(tmp_path, target)
}

/// On-disk shape of one cache entry. Times are epoch milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEntry {
    pub data: Value,
    pub created_at: i64,
    pub ttl: i64,
}

/// Mirrors the cache store into durable storage under a single key.
/// Every failure is logged and swallowed; the cache then simply runs
/// in memory only.
#[derive(Clone)]
pub struct PersistenceShim {
    storage: Arc<dyn KeyValueStorage>,
    storage_key: String,
}

impl PersistenceShim {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, storage_key: impl Into<String>) -> Self {
        Self {
            storage,
            storage_key: storage_key.into(),
        }
    }

    /// Reads the snapshot and returns the entries still valid at `now`.
    #[must_use]
    pub fn load(&self, now: DateTime<Utc>) -> Vec<CacheEntry> {
        let raw = match self.storage.read_string(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read cache snapshot; starting empty");
                return Vec::new();
            }
        };

        let parsed: BTreeMap<String, PersistedEntry> = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "cache snapshot is corrupt; starting empty");
                return Vec::new();
            }
        };

        let total = parsed.len();
        let entries: Vec<CacheEntry> = parsed
            .into_iter()
            .filter_map(|(key, persisted)| {
                let created_at = DateTime::from_timestamp_millis(persisted.created_at)?;
                Some(CacheEntry {
                    key,
                    data: persisted.data,
                    created_at,
                    ttl: Duration::milliseconds(persisted.ttl),
                })
            })
            .filter(|entry| entry.is_valid(now))
            .collect();
        debug!(
            restored = entries.len(),
            dropped = total - entries.len(),
            "cache snapshot loaded"
        );
        entries
    }

    pub fn save(&self, entries: &[CacheEntry]) {
        let snapshot: BTreeMap<&str, PersistedEntry> = entries
            .iter()
            .map(|entry| {
                (
                    entry.key.as_str(),
                    PersistedEntry {
                        data: entry.data.clone(),
                        created_at: entry.created_at.timestamp_millis(),
                        ttl: entry.ttl.num_milliseconds(),
                    },
                )
            })
            .collect();

        let encoded = match serde_json::to_string(&snapshot) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode cache snapshot");
                return;
            }
        };
        if let Err(e) = self.storage.write_string(&self.storage_key, &encoded) {
            warn!(error = %e, "failed to write cache snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_sanitized() {
        let storage = FileStorage {
            dir: PathBuf::from("/tmp/cache"),
        };
        assert_eq!(
            storage.key_path("liga/cache:v2"),
            PathBuf::from("/tmp/cache/liga_cache_v2.json")
        );
    }

    #[test]
    fn concurrent_writers_never_publish_a_torn_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("liga_cache.json");
        let bodies: Vec<String> = (0..8)
            .map(|i| format!("{{\"writer\": {i}, \"pad\": \"{}\"}}", "x".repeat(64 * 1024)))
            .collect();

        std::thread::scope(|scope| {
            for body in &bodies {
                let target = &target;
                scope.spawn(move || {
                    for _ in 0..4 {
                        atomic_write(target, body.as_bytes()).unwrap();
                    }
                });
            }
        });

        let written = fs::read_to_string(&target).unwrap();
        assert!(bodies.contains(&written));
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn expired_and_bad_timestamps_are_dropped_on_load() {
        let storage = Arc::new(MemoryStorage::new());
        let now = DateTime::from_timestamp_millis(1_000_000).unwrap();
        storage
            .write_string(
                DEFAULT_STORAGE_KEY,
                r#"{
                    "fresh": {"data": 1, "createdAt": 999000, "ttl": 5000},
                    "stale": {"data": 2, "createdAt": 900000, "ttl": 5000},
                    "odd": {"data": 3, "createdAt": 9223372036854775807, "ttl": 5000}
                }"#,
            )
            .unwrap();
        let shim = PersistenceShim::new(storage, DEFAULT_STORAGE_KEY);
        let keys: Vec<String> = shim.load(now).into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["fresh".to_string()]);
    }
}

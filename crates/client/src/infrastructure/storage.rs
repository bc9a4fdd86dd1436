//! Session storage adapters
//!
//! `FileSessionStorage` keeps the key/value map in a JSON file under the
//! platform data directory; `MemorySessionStorage` is process-local.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use directories::ProjectDirs;
use tempfile::NamedTempFile;

use crate::ports::outbound::SessionStorage;

pub const STORAGE_FILE_NAME: &str = "session.json";

/// File-backed session storage
///
/// The map lives in a JSON file at:
/// - Linux: ~/.local/share/greenbidz-client/session.json
/// - macOS: ~/Library/Application Support/com.GreenBidz.greenbidz-client/session.json
/// - Windows: C:\Users\<User>\AppData\Roaming\GreenBidz\greenbidz-client\data\session.json
///
/// Every mutation rewrites the file while the map's write guard is held, so
/// the file on disk always matches the latest in-memory state. Writes land
/// in a sibling temp file first and are renamed over the target.
#[derive(Clone)]
pub struct FileSessionStorage {
    file: PathBuf,
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for FileSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSessionStorage {
    /// Open the store in the platform data directory.
    pub fn new() -> Self {
        let file = ProjectDirs::from("com", "GreenBidz", "greenbidz-client")
            .map(|dirs| dirs.data_dir().join(STORAGE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from("greenbidz_session.json"));
        Self::at_path(file)
    }

    /// Open the store in `dir`, or the platform directory when `None`.
    pub fn in_dir(dir: Option<&Path>) -> Self {
        dir.map(|dir| Self::at_path(dir.join(STORAGE_FILE_NAME)))
            .unwrap_or_else(Self::new)
    }

    /// Open the store at an explicit file path. A missing or corrupt file
    /// starts empty.
    pub fn at_path(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let entries = load_entries(&file);
        tracing::debug!(path = %file.display(), entries = entries.len(), "Session storage opened");

        Self {
            file,
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Apply `change` and flush the result while still holding the guard.
    /// `change` returns false when the map was left untouched.
    fn mutate(&self, change: impl FnOnce(&mut HashMap<String, String>) -> bool) {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("Session storage lock poisoned: {}", e);
                return;
            }
        };
        if !change(&mut entries) {
            return;
        }
        if let Err(e) = write_atomically(&self.file, &entries) {
            tracing::error!(path = %self.file.display(), "Failed to write session storage: {}", e);
        }
    }
}

fn load_entries(file: &Path) -> HashMap<String, String> {
    let raw = match fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            tracing::warn!(path = %file.display(), "Failed to read session storage: {}", e);
            return HashMap::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(path = %file.display(), "Discarding unreadable session storage: {}", e);
        HashMap::new()
    })
}

fn write_atomically(file: &Path, entries: &HashMap<String, String>) -> io::Result<()> {
    let dir = match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let body = serde_json::to_vec_pretty(entries)?;
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(&body)?;
    staged.as_file().sync_all()?;
    staged.persist(file).map_err(|e| e.error)?;
    Ok(())
}

impl SessionStorage for FileSessionStorage {
    fn save(&self, key: &str, value: &str) {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        });
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.entries.read() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                tracing::error!("Session storage lock poisoned: {}", e);
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        self.mutate(|entries| entries.remove(key).is_some());
    }
}

/// In-memory session storage. Nothing survives the process.
#[derive(Clone, Default)]
pub struct MemorySessionStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemorySessionStorage {
    fn save(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenbidz_domain::storage_keys;

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(STORAGE_FILE_NAME);

        let storage = FileSessionStorage::at_path(&path);
        storage.save(storage_keys::USER_TOKEN, "jwt");
        storage.save(storage_keys::IS_LOGGED_IN, "true");
        storage.remove(storage_keys::IS_LOGGED_IN);

        let reopened = FileSessionStorage::at_path(&path);
        assert_eq!(reopened.load(storage_keys::USER_TOKEN).as_deref(), Some("jwt"));
        assert_eq!(reopened.load(storage_keys::IS_LOGGED_IN), None);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let storage = FileSessionStorage::at_path(&path);
        assert_eq!(storage.load(storage_keys::USER_TOKEN), None);

        storage.save(storage_keys::USER_TOKEN, "fresh");
        let reopened = FileSessionStorage::at_path(&path);
        assert_eq!(reopened.load(storage_keys::USER_TOKEN).as_deref(), Some("fresh"));
    }

    #[test]
    fn test_in_dir_uses_storage_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::in_dir(Some(dir.path()));
        assert_eq!(storage.path(), dir.path().join(STORAGE_FILE_NAME));
    }

    #[test]
    fn test_concurrent_saves_reach_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE_NAME);
        let storage = FileSessionStorage::at_path(&path);

        for round in 0..10 {
            std::thread::scope(|scope| {
                for worker in 0..8 {
                    let storage = storage.clone();
                    scope.spawn(move || {
                        for i in 0..20 {
                            storage.save(&format!("k{worker}"), &format!("v{round}-{i}"));
                        }
                    });
                }
            });

            let reopened = FileSessionStorage::at_path(&path);
            for worker in 0..8 {
                let key = format!("k{worker}");
                assert_eq!(reopened.load(&key), storage.load(&key), "round {round}, key {key}");
                assert_eq!(reopened.load(&key), Some(format!("v{round}-19")));
            }
        }
    }

    #[test]
    fn test_concurrent_save_and_clear_leave_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE_NAME);
        let storage = FileSessionStorage::at_path(&path);

        std::thread::scope(|scope| {
            let writer = storage.clone();
            scope.spawn(move || {
                for i in 0..50 {
                    writer.save(storage_keys::USER_TOKEN, &format!("jwt-{i}"));
                }
            });
            let clearer = storage.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    clearer.remove(storage_keys::IS_LOGGED_IN);
                    clearer.save(storage_keys::IS_LOGGED_IN, "true");
                }
            });
        });

        let reopened = FileSessionStorage::at_path(&path);
        assert_eq!(reopened.load(storage_keys::USER_TOKEN).as_deref(), Some("jwt-49"));
        assert_eq!(reopened.load(storage_keys::IS_LOGGED_IN).as_deref(), Some("true"));

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(STORAGE_FILE_NAME)]);
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemorySessionStorage::new();
        assert!(storage.is_empty());

        storage.save("k", "v");
        assert_eq!(storage.load("k").as_deref(), Some("v"));
        assert_eq!(storage.len(), 1);

        storage.remove("k");
        storage.remove("k");
        assert!(storage.is_empty());
    }
}

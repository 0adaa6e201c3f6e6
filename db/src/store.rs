use common::error::{AppError, Res};
use dashmap::DashMap;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Synchronous string-keyed, string-valued storage.
///
/// Every call is atomic on its own; there is no cross-key transaction.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Res<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Res<()>;
    fn remove(&self, key: &str) -> Res<()>;
}

/// In-process store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Res<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Res<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Res<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store persisted as one JSON object on disk.
///
/// Reads are served from memory. Each write rewrites the whole file through
/// a temporary sibling and a rename.
pub struct FileStore {
    path: PathBuf,
    entries: DashMap<String, String>,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens (or creates) the store at `path`.
    ///
    /// A file that is not a JSON object of strings is moved aside to
    /// `<path>.corrupt` and the store starts empty.
    pub fn open(path: &Path) -> Res<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = DashMap::new();
        if path.exists() {
            let raw = fs::read_to_string(path)?;
            match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => {
                    for (k, v) in map {
                        entries.insert(k, v);
                    }
                }
                Err(e) if raw.trim().is_empty() => {
                    log::debug!("Empty storage file {}: {}", path.display(), e);
                }
                Err(e) => {
                    let backup = corrupt_path(path);
                    log::error!(
                        "Storage file {} is unreadable ({}), moving it to {}",
                        path.display(),
                        e,
                        backup.display()
                    );
                    fs::rename(path, &backup)?;
                }
            }
        }

        Ok(FileStore {
            path: path.to_path_buf(),
            entries,
            write_lock: Mutex::new(()),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flush(&self) -> Res<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AppError::Storage("Storage write lock poisoned".to_string()))?;

        let snapshot: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let json = serde_json::to_string_pretty(&snapshot)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Res<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Res<()> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            // keep memory and disk in agreement
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key).map(|(_, v)| v),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Res<()> {
        if let Some((k, old)) = self.entries.remove(key) {
            if let Err(e) = self.flush() {
                self.entries.insert(k, old);
                return Err(e);
            }
        }
        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile").join("storage.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("companyName", "Acme").unwrap();
            store.set("gone", "soon").unwrap();
            store.remove("gone").unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("companyName").unwrap().as_deref(), Some("Acme"));
        assert_eq!(reopened.get("gone").unwrap(), None);
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn file_store_moves_corrupt_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert!(dir.path().join("storage.json.corrupt").exists());

        store.set("k", "v").unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"k\""));
    }
}

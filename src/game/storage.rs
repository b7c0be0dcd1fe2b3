use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use super::error::StorageError;

/// Flat string key-value persistence, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

pub type SharedStorage = Rc<RefCell<dyn KeyValueStore>>;

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// All keys in one JSON object file, rewritten atomically on every change.
///
/// A file that exists but cannot be read or parsed is renamed to
/// `storage.corrupt-<millis>.json` before the store starts empty. If that
/// rename fails the store stays read-only for the session.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    read_only: bool,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "storage.json";

    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let loaded = fs::read_to_string(&path)
            .map_err(StorageError::from)
            .and_then(|raw| Ok(serde_json::from_str::<BTreeMap<String, String>>(&raw)?));
        match loaded {
            Ok(entries) => FileStore {
                path,
                entries,
                read_only: false,
            },
            Err(StorageError::Io(err)) if err.kind() == io::ErrorKind::NotFound => FileStore {
                path,
                entries: BTreeMap::new(),
                read_only: false,
            },
            Err(err) => {
                warn!(path = %path.display(), %err, "storage file unreadable");
                let read_only = match set_aside(&path) {
                    Ok(moved) => {
                        warn!(to = %moved.display(), "moved unreadable storage aside");
                        false
                    }
                    Err(err) => {
                        warn!(path = %path.display(), %err, "cannot move storage aside; changes will not be saved");
                        true
                    }
                };
                FileStore {
                    path,
                    entries: BTreeMap::new(),
                    read_only,
                }
            }
        }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::open(dir.join(Self::FILE_NAME))
    }

    fn flush(&self) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::ReadOnly(self.path.clone()));
        }
        let data = serde_json::to_string_pretty(&self.entries)?;
        write_atomic(&self.path, &data)
    }
}

fn set_aside(path: &Path) -> io::Result<PathBuf> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let moved = path.with_extension(format!("corrupt-{stamp}.json"));
    fs::rename(path, &moved)?;
    Ok(moved)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

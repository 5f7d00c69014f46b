use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::warn;
use tempfile::NamedTempFile;

use super::KeyValueStore;
use crate::errors::{Error, Result};

/// Store backed by a single JSON object file.
///
/// Every write rewrites the whole file through a temp file in the same
/// directory followed by a rename, so readers never see a partial file.
/// A missing file reads as an empty store. A corrupt file reads as empty
/// too, and the first write moves it aside to `<file name>.corrupt` before
/// replacing it.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable store file is moved before it is rewritten.
    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("store"));
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    /// Stored items, or `None` when the file exists but does not parse.
    fn read_items(&self) -> Result<Option<BTreeMap<String, String>>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Some(BTreeMap::new())),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Some(BTreeMap::new()));
        }

        match serde_json::from_str(&content) {
            Ok(items) => Ok(Some(items)),
            Err(e) => {
                warn!(
                    "[Storage] Failed to parse {} ({}), treating as empty",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.read_items()?.unwrap_or_default())
    }

    fn set_aside_corrupt(&self) -> Result<()> {
        let target = self.corrupt_path();
        std::fs::rename(&self.path, &target)?;
        warn!(
            "[Storage] Moved unreadable {} to {}",
            self.path.display(),
            target.display()
        );
        Ok(())
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(items)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::storage("file store lock poisoned"))?;
        let mut items = match self.read_items()? {
            Some(items) => items,
            None => {
                self.set_aside_corrupt()?;
                BTreeMap::new()
            }
        };
        mutate(&mut items);
        self.write_all(&items)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.update(|items| {
            items.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("store.json"));
        assert_eq!(store.get_item("token").unwrap(), None);
    }

    #[test]
    fn values_survive_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStore::new(&path);
        store.set_item("token", "abc123").unwrap();
        store.set_item("usuario", "maria").unwrap();
        store.remove_item("usuario").unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get_item("token").unwrap().as_deref(), Some("abc123"));
        assert_eq!(reopened.get_item("usuario").unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_moved_aside_before_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let damaged = r#"{"token":"abc123","usuario":"maria""#;
        std::fs::write(&path, damaged).unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get_item("token").unwrap(), None);
        assert!(!store.corrupt_path().exists());

        store.set_item("token", "fresh").unwrap();
        assert_eq!(store.get_item("token").unwrap().as_deref(), Some("fresh"));

        let corrupt = dir.path().join("store.json.corrupt");
        assert_eq!(store.corrupt_path(), corrupt);
        assert_eq!(std::fs::read_to_string(&corrupt).unwrap(), damaged);
    }
}

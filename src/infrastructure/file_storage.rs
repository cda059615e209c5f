// File-backed session storage: one JSON object of keyed strings
use crate::application::session_store::SessionStorage;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Blocking `std::fs` I/O. Each call touches one small file and happens only
/// on login, logout and startup, so it runs inline on the calling task.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("Corrupt session file {}", self.path.display()))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        // Write then rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        // A corrupt file is replaced rather than blocking every future write
        let mut entries = self.load().unwrap_or_else(|e| {
            tracing::warn!("{:#}", e);
            BTreeMap::new()
        });
        f(&mut entries);
        self.save(&entries)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.remove(key))
    }

    fn set_entries(&self, entries: &[(&str, &str)]) -> Result<()> {
        self.modify(|map| {
            for (key, value) in entries {
                map.insert(key.to_string(), value.to_string());
            }
        })
    }

    fn remove_entries(&self, keys: &[&str]) -> Result<()> {
        self.modify(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}

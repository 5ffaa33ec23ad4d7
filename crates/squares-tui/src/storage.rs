use serde::de::DeserializeOwned;
use serde::Serialize;
use squares_core::{KeyValueStore, Settings, StoreError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Per-user directory for the streak, settings and log file
pub fn app_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slang-squares")
}

pub fn streak_path() -> PathBuf {
    app_dir().join("streak.json")
}

pub fn settings_path() -> PathBuf {
    app_dir().join("settings.json")
}

pub fn log_path() -> PathBuf {
    app_dir().join("squares.log")
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let json = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring unreadable file");
            None
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// String key/value pairs kept in one JSON object on disk.
/// Every `set` rewrites the file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store; a missing or corrupt file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_json(&path).unwrap_or_default();
        Self { path, values }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        write_json(&self.path, &self.values)
    }
}

pub fn load_settings(path: &Path) -> Settings {
    read_json(path).unwrap_or_default()
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), StoreError> {
    write_json(path, settings)
}

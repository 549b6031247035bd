//! Opaque key-value preference store.
//!
//! Small pieces of user state that are written on change and read at startup
//! (sound settings, default reminder offset, the notification decision) are
//! kept in a flat JSON object in `prefs.json` inside the data directory.
//!
//! Reads never fail: a missing file, a corrupt file, or a value of the wrong
//! shape all read as "absent", and callers fall back to built-in defaults.
//! Writes do report I/O errors so that callers can decide whether to log them.

use super::data_storage::DataStorage;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::path::PathBuf;
use tracing::debug;

pub const PREFS_FILE_NAME: &str = "prefs.json";

pub const SOUND_CONFIG_KEY: &str = "soundConfig";
pub const DEFAULT_REMIND_KEY: &str = "defaultRemindMinutes";
pub const NOTIFICATION_PERMISSION_KEY: &str = "notificationPermission";

/// Reminder offset suggested for new tasks when no preference is stored.
pub const DEFAULT_REMIND_MINUTES: i64 = 5;

#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
}

impl Preferences {
    /// Opens the store in the per-user data directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: DataStorage::new().get_path(PREFS_FILE_NAME)?,
        })
    }

    /// Opens a store backed by an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_all(&self) -> Map<String, Value> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return Map::new(),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                debug!(path = %self.path.display(), "ignoring unreadable preferences file");
                Map::new()
            }
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(&file, map)?;
        Ok(())
    }

    /// Returns the stored JSON value for `key`, if any.
    pub fn get_raw(&self, key: &str) -> Option<Value> {
        self.read_all().remove(key)
    }

    /// Returns the value for `key` decoded as `T`, or `None` when it is absent or malformed.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_raw(key).and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut map = self.read_all();
        map.insert(key.to_string(), serde_json::to_value(value)?);
        self.write_all(&map)
    }

    /// Removes `key`. Returns whether a value was stored.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut map = self.read_all();
        let existed = map.remove(key).is_some();
        if existed {
            self.write_all(&map)?;
        }
        Ok(existed)
    }

    /// Reminder offset used to pre-fill new tasks.
    ///
    /// Accepts a stored number or numeric string; anything negative,
    /// non-finite, or unparseable reads as [`DEFAULT_REMIND_MINUTES`].
    pub fn default_remind_minutes(&self) -> i64 {
        let minutes = match self.get_raw(DEFAULT_REMIND_KEY) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match minutes {
            Some(m) if m.is_finite() && m >= 0.0 => m.floor() as i64,
            _ => DEFAULT_REMIND_MINUTES,
        }
    }

    /// Stores the default reminder offset, clamped at zero, and returns the stored value.
    pub fn set_default_remind_minutes(&self, minutes: i64) -> Result<i64> {
        let minutes = minutes.max(0);
        self.set(DEFAULT_REMIND_KEY, &minutes)?;
        Ok(minutes)
    }
}

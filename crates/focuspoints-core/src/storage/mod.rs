mod config;
pub mod database;
pub mod keys;
mod memory;

pub use config::{Config, RewardsConfig, SessionConfig, TrialConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{ConfigError, StoreError};

/// String-keyed scalar persistence.
///
/// The store is the single source of truth: domain types are read through
/// it on every access and written back after every mutation. Booleans and
/// numbers are encoded as strings here and nowhere else.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    /// Drop every key.
    fn clear(&self) -> Result<(), StoreError>;

    /// Run `f` so no other writer can interleave with its reads and writes.
    ///
    /// Stores with a single owner run `f` directly. Shared stores hold a
    /// write lock for the duration and discard partial writes when `f`
    /// fails.
    fn atomic<T, E, F>(&self, f: F) -> Result<T, E>
    where
        Self: Sized,
        E: From<StoreError>,
        F: FnOnce() -> Result<T, E>,
    {
        f()
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    fn get_i64(&self, key: &str, fallback: i64) -> Result<i64, StoreError> {
        match self.get(key)? {
            None => Ok(fallback),
            Some(raw) => parse_number(key, &raw),
        }
    }

    fn set_i64(&self, key: &str, value: i64) -> Result<(), StoreError> {
        self.set(key, &value.to_string())
    }

    fn get_bool(&self, key: &str, fallback: bool) -> Result<bool, StoreError> {
        match self.get(key)?.as_deref() {
            None => Ok(fallback),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(other) => Err(StoreError::Corrupt {
                key: key.to_string(),
                value: other.to_string(),
            }),
        }
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.set(key, if value { "true" } else { "false" })
    }
}

// Settings screens historically wrote values like "2.0"; accept integral floats.
fn parse_number(key: &str, raw: &str) -> Result<i64, StoreError> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        _ => Err(StoreError::Corrupt {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Returns the directory holding `config.toml` and `focuspoints.db`.
///
/// `FOCUSPOINTS_HOME` wins when set. Otherwise `~/.config/focuspoints`, or
/// `~/.config/focuspoints-dev` with `FOCUSPOINTS_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("FOCUSPOINTS_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("FOCUSPOINTS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focuspoints-dev")
            } else {
                base_dir.join("focuspoints")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::NoDataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors_fall_back_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(store.get_i64("missing", 60).unwrap(), 60);
        assert!(!store.get_bool("missing", false).unwrap());
    }

    #[test]
    fn booleans_roundtrip_as_literal_strings() {
        let store = MemoryStore::new();
        store.set_bool("flag", true).unwrap();
        assert_eq!(store.get("flag").unwrap().as_deref(), Some("true"));
        assert!(store.get_bool("flag", false).unwrap());
    }

    #[test]
    fn integral_float_strings_are_accepted() {
        let store = MemoryStore::new();
        store.set("mult", "2.0").unwrap();
        assert_eq!(store.get_i64("mult", 1).unwrap(), 2);
    }

    #[test]
    fn garbage_number_is_corrupt_not_defaulted() {
        let store = MemoryStore::new();
        store.set("fp_points", "lots").unwrap();
        let err = store.get_i64("fp_points", 0).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "fp_points"));
    }

    #[test]
    fn garbage_bool_is_corrupt() {
        let store = MemoryStore::new();
        store.set("fp_sess_active", "yes").unwrap();
        assert!(store.get_bool("fp_sess_active", false).is_err());
    }
}

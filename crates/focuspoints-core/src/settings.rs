//! User-tunable thresholds, persisted one scalar per key.
//!
//! Settings are read through the store at the start of every engine
//! operation, so edits made between ticks apply from the next tick on.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, StoreError};
use crate::storage::{keys, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Clean minutes per day needed to keep the streak.
    pub streak_target: u32,
    pub bed_start: u32,
    pub bed_end: u32,
    pub bed_mult: u32,
    pub work_start: u32,
    pub work_end: u32,
    pub work_mult: u32,
    /// Late-night window is `[late_hour, 6)`.
    pub late_hour: u32,
    /// Points removed when a session ends inside the late-night window.
    pub late_penalty: u32,
    pub late_mult: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            streak_target: 60,
            bed_start: 21,
            bed_end: 23,
            bed_mult: 2,
            work_start: 8,
            work_end: 15,
            work_mult: 2,
            late_hour: 0,
            late_penalty: 10,
            late_mult: 0,
        }
    }
}

/// Setting name -> store key, in display order.
pub const FIELDS: [(&str, &str); 10] = [
    ("streak_target", keys::SET_STREAK_TARGET),
    ("bed_start", keys::SET_BED_START),
    ("bed_end", keys::SET_BED_END),
    ("bed_mult", keys::SET_BED_MULT),
    ("work_start", keys::SET_WORK_START),
    ("work_end", keys::SET_WORK_END),
    ("work_mult", keys::SET_WORK_MULT),
    ("late_hour", keys::SET_LATE_HOUR),
    ("late_penalty", keys::SET_LATE_PENALTY),
    ("late_mult", keys::SET_LATE_MULT),
];

const HOUR_FIELDS: [&str; 5] = ["bed_start", "bed_end", "work_start", "work_end", "late_hour"];

impl Settings {
    fn field(&self, name: &str) -> Option<u32> {
        Some(match name {
            "streak_target" => self.streak_target,
            "bed_start" => self.bed_start,
            "bed_end" => self.bed_end,
            "bed_mult" => self.bed_mult,
            "work_start" => self.work_start,
            "work_end" => self.work_end,
            "work_mult" => self.work_mult,
            "late_hour" => self.late_hour,
            "late_penalty" => self.late_penalty,
            "late_mult" => self.late_mult,
            _ => return None,
        })
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut u32> {
        Some(match name {
            "streak_target" => &mut self.streak_target,
            "bed_start" => &mut self.bed_start,
            "bed_end" => &mut self.bed_end,
            "bed_mult" => &mut self.bed_mult,
            "work_start" => &mut self.work_start,
            "work_end" => &mut self.work_end,
            "work_mult" => &mut self.work_mult,
            "late_hour" => &mut self.late_hour,
            "late_penalty" => &mut self.late_penalty,
            "late_mult" => &mut self.late_mult,
            _ => return None,
        })
    }

    /// Read every setting, falling back to the default for missing keys.
    ///
    /// # Errors
    /// Fails if the store is unreachable or a value is not a non-negative
    /// integer.
    pub fn load<S: Store + ?Sized>(store: &S) -> Result<Self> {
        let defaults = Self::default();
        let mut settings = defaults;
        for (name, key) in FIELDS {
            let fallback = defaults.field(name).unwrap_or_default();
            let raw = store.get_i64(key, i64::from(fallback))?;
            let value = u32::try_from(raw).map_err(|_| StoreError::Corrupt {
                key: key.to_string(),
                value: raw.to_string(),
            })?;
            if let Some(slot) = settings.field_mut(name) {
                *slot = value;
            }
        }
        Ok(settings)
    }

    /// Write every field.
    pub fn save<S: Store + ?Sized>(&self, store: &S) -> Result<()> {
        for (name, key) in FIELDS {
            if let Some(value) = self.field(name) {
                store.set_i64(key, i64::from(value))?;
            }
        }
        Ok(())
    }

    /// Write the default for every key that is not present yet.
    pub fn ensure_defaults<S: Store + ?Sized>(store: &S) -> Result<()> {
        let defaults = Self::default();
        for (name, key) in FIELDS {
            if !store.contains(key)? {
                if let Some(value) = defaults.field(name) {
                    store.set_i64(key, i64::from(value))?;
                }
            }
        }
        Ok(())
    }

    /// Look up a single setting by name.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.field(name)
    }

    /// Change one setting in memory.
    ///
    /// # Errors
    /// `InvalidInput` for unknown names, non-integers, negative values, or
    /// hours outside 0-23.
    pub fn apply(&mut self, name: &str, value: &str) -> Result<()> {
        let parsed: i64 = value
            .trim()
            .parse()
            .map_err(|_| CoreError::invalid(name, format!("'{value}' is not a whole number")))?;
        let parsed = u32::try_from(parsed)
            .map_err(|_| CoreError::invalid(name, "must not be negative"))?;
        if HOUR_FIELDS.contains(&name) && parsed > 23 {
            return Err(CoreError::invalid(name, "hours run from 0 to 23"));
        }
        let slot = self
            .field_mut(name)
            .ok_or_else(|| CoreError::invalid(name, "unknown setting"))?;
        *slot = parsed;
        Ok(())
    }

    /// Change one setting and persist it. The store is untouched on error.
    pub fn set<S: Store + ?Sized>(store: &S, name: &str, value: &str) -> Result<Self> {
        let mut settings = Self::load(store)?;
        settings.apply(name, value)?;
        settings.save(store)?;
        Ok(settings)
    }

    /// Restore every setting to its default.
    pub fn reset<S: Store + ?Sized>(store: &S) -> Result<Self> {
        let settings = Self::default();
        settings.save(store)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn load_from_empty_store_yields_defaults() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store).unwrap(), Settings::default());
    }

    #[test]
    fn ensure_defaults_keeps_existing_values() {
        let store = MemoryStore::new();
        store.set_i64(keys::SET_STREAK_TARGET, 30).unwrap();
        Settings::ensure_defaults(&store).unwrap();
        assert_eq!(store.get_i64(keys::SET_STREAK_TARGET, 0).unwrap(), 30);
        assert_eq!(store.get_i64(keys::SET_LATE_PENALTY, 0).unwrap(), 10);
        assert_eq!(store.len(), FIELDS.len());
    }

    #[test]
    fn set_persists_single_field() {
        let store = MemoryStore::new();
        let settings = Settings::set(&store, "work_mult", "3").unwrap();
        assert_eq!(settings.work_mult, 3);
        assert_eq!(Settings::load(&store).unwrap().work_mult, 3);
    }

    #[test]
    fn set_rejects_out_of_range_hour() {
        let store = MemoryStore::new();
        let err = Settings::set(&store, "bed_end", "24").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn apply_rejects_unknown_and_negative() {
        let mut settings = Settings::default();
        assert!(settings.apply("nap_mult", "2").is_err());
        assert!(settings.apply("late_penalty", "-5").is_err());
        assert!(settings.apply("late_penalty", "ten").is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn negative_stored_value_is_corrupt() {
        let store = MemoryStore::new();
        store.set_i64(keys::SET_BED_MULT, -1).unwrap();
        assert!(matches!(
            Settings::load(&store),
            Err(CoreError::Store(StoreError::Corrupt { .. }))
        ));
    }
}

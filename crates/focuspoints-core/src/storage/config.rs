//! TOML-based application configuration.
//!
//! Holds deployment-level policy that is fixed for the lifetime of an
//! engine:
//! - How clean minutes are paid out (per minute or lump sum)
//! - Whether the ledger clamps at zero
//! - Whether the trial/paywall gate is active, and its length
//! - Reward thresholds per brand
//!
//! User-tunable thresholds (streak target, time windows) are [`Settings`]
//! and live in the store instead.
//!
//! Configuration is stored at `<data_dir>/config.toml`.
//!
//! [`Settings`]: crate::settings::Settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::ledger::LedgerPolicy;
use crate::rewards::Brand;
use crate::session::{AwardPolicy, EnginePolicy};

/// Session payout configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub award_policy: AwardPolicy,
    #[serde(default)]
    pub ledger_policy: LedgerPolicy,
}

/// Trial gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_trial_days")]
    pub trial_days: u32,
}

/// Points needed per reward brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_starbucks")]
    pub starbucks: i64,
    #[serde(default = "default_dunkin")]
    pub dunkin: i64,
    #[serde(default = "default_amazon")]
    pub amazon: i64,
    /// Fixed seed for reward code generation (None = random).
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub trial: TrialConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
}

// Default functions
fn default_trial_days() -> u32 {
    7
}
fn default_starbucks() -> i64 {
    50
}
fn default_dunkin() -> i64 {
    100
}
fn default_amazon() -> i64 {
    150
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trial_days: default_trial_days(),
        }
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            starbucks: default_starbucks(),
            dunkin: default_dunkin(),
            amazon: default_amazon(),
            seed: None,
        }
    }
}

impl RewardsConfig {
    pub fn required_points(&self, brand: Brand) -> i64 {
        match brand {
            Brand::Starbucks => self.starbucks,
            Brand::Dunkin => self.dunkin,
            Brand::Amazon => self.amazon,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<i64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?;
                        serde_json::Value::Number(n.into())
                    }
                    // Optional numbers (e.g. rewards.seed) start out as null.
                    serde_json::Value::Null => match value {
                        "none" | "null" => serde_json::Value::Null,
                        _ => serde_json::Value::Number(
                            value
                                .parse::<u64>()
                                .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?
                                .into(),
                        ),
                    },
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("not a leaf key".to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from `<data_dir>/config.toml`, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to `<data_dir>/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without persisting.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field's type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Policy the session engine runs under.
    pub fn engine_policy(&self) -> EnginePolicy {
        EnginePolicy {
            award: self.session.award_policy,
            ledger: self.session.ledger_policy,
            trial_days: self.trial.enabled.then_some(self.trial.trial_days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.session.award_policy, AwardPolicy::PerMinute);
        assert_eq!(parsed.session.ledger_policy, LedgerPolicy::Clamped);
        assert_eq!(parsed.trial.trial_days, 7);
        assert_eq!(parsed.rewards.amazon, 150);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[session]\naward_policy = \"lump_sum\"\n").unwrap();
        assert_eq!(parsed.session.award_policy, AwardPolicy::LumpSum);
        assert_eq!(parsed.session.ledger_policy, LedgerPolicy::Clamped);
        assert!(!parsed.trial.enabled);
        assert_eq!(parsed.rewards.starbucks, 50);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.award_policy").as_deref(), Some("per_minute"));
        assert_eq!(cfg.get("trial.trial_days").as_deref(), Some("7"));
        assert_eq!(cfg.get("trial.enabled").as_deref(), Some("false"));
        assert!(cfg.get("session.missing_key").is_none());
    }

    #[test]
    fn apply_updates_enum_bool_and_number() {
        let mut cfg = Config::default();
        cfg.apply("session.award_policy", "lump_sum").unwrap();
        cfg.apply("trial.enabled", "true").unwrap();
        cfg.apply("rewards.dunkin", "80").unwrap();
        assert_eq!(cfg.session.award_policy, AwardPolicy::LumpSum);
        assert!(cfg.trial.enabled);
        assert_eq!(cfg.rewards.required_points(Brand::Dunkin), 80);
    }

    #[test]
    fn apply_sets_and_clears_optional_seed() {
        let mut cfg = Config::default();
        cfg.apply("rewards.seed", "42").unwrap();
        assert_eq!(cfg.rewards.seed, Some(42));
        cfg.apply("rewards.seed", "none").unwrap();
        assert_eq!(cfg.rewards.seed, None);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("session.nonexistent", "x").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn apply_rejects_bad_enum_value() {
        let mut cfg = Config::default();
        let err = cfg.apply("session.ledger_policy", "sometimes").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.session.ledger_policy, LedgerPolicy::Clamped);
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("trial.enabled", "not_a_bool").is_err());
        assert!(cfg.apply("trial.trial_days", "seven").is_err());
    }

    #[test]
    fn engine_policy_only_gates_when_trial_enabled() {
        let mut cfg = Config::default();
        assert_eq!(cfg.engine_policy().trial_days, None);
        cfg.trial.enabled = true;
        cfg.trial.trial_days = 14;
        assert_eq!(cfg.engine_policy().trial_days, Some(14));
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.trial.trial_days, 7);
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session\naward_policy = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn load_from_unreadable_file_keeps_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let bytes = [0x5b, 0xff, 0xfe, 0x5d];
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }
}

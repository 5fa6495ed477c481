//! TOML-based application configuration.
//!
//! Stores:
//! - Planner tuning (checkpoint intervals, session floor, impact model)
//! - Optional path to an external task catalog
//! - Optional RNG seed for reproducible content selection
//!
//! Configuration is stored at `~/.config/bandplan/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::catalog::TaskCatalog;
use crate::error::{ConfigError, CoreError, Result};
use crate::planner::PlannerConfig;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/bandplan/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// TOML content table replacing the builtin catalog.
    #[serde(default)]
    pub catalog_path: Option<String>,
    /// Seed for catalog selection; entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Days shown by `plan show`.
    #[serde(default = "default_upcoming_days")]
    pub upcoming_days: usize,
    #[serde(default)]
    pub planner: PlannerConfig,
}

fn default_upcoming_days() -> usize {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            catalog_path: None,
            seed: None,
            upcoming_days: default_upcoming_days(),
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
    ) -> std::result::Result<(), ConfigError> {
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
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    // Optional fields: "none" clears, numbers stay numbers
                    serde_json::Value::Null => {
                        if value.eq_ignore_ascii_case("none") {
                            serde_json::Value::Null
                        } else if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            serde_json::Value::String(value.into())
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::String(_) => {
                        if value.eq_ignore_ascii_case("none") {
                            serde_json::Value::Null
                        } else {
                            serde_json::Value::String(value.into())
                        }
                    }
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if no file exists.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load config, using defaults");
                Self::default()
            }
        }
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

    /// Set a config value by key without persisting.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the field's type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let current = serde_json::to_value(&*self)?;
        let mut json = current.clone();
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated = match serde_json::from_value(json) {
            Ok(updated) => updated,
            // An unset optional field guessed a number; it may want text
            Err(_) if Self::get_json_value_by_path(&current, key).is_some_and(|v| v.is_null()) => {
                let mut json = current;
                if let Some(leaf) = json.pointer_mut(&format!("/{}", key.replace('.', "/"))) {
                    *leaf = serde_json::Value::String(value.into());
                }
                serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                })?
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: e.to_string(),
                }
                .into())
            }
        };
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// The configured catalog, or the builtin one when no path is set.
    pub fn catalog(&self) -> Result<TaskCatalog> {
        match &self.catalog_path {
            Some(path) => TaskCatalog::load(Path::new(path)).map_err(CoreError::from),
            None => Ok(TaskCatalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::CheckpointPrecedence;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("[planner]\nreview_interval_days = 5\n").unwrap();
        assert_eq!(parsed.planner.review_interval_days, 5);
        assert_eq!(parsed.planner.mock_test_interval_days, 14);
        assert_eq!(parsed.planner.impact.base_rate, 0.01);
        assert_eq!(parsed.upcoming_days, 7);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("planner.review_interval_days").as_deref(), Some("7"));
        assert_eq!(cfg.get("planner.min_session_hours").as_deref(), Some("0.5"));
        assert_eq!(
            cfg.get("planner.checkpoint_precedence").as_deref(),
            Some("review_first")
        );
        assert!(cfg.get("planner.missing_key").is_none());
    }

    #[test]
    fn apply_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.apply("planner.mock_test_interval_days", "10").unwrap();
        assert_eq!(cfg.planner.mock_test_interval_days, 10);
        cfg.apply("planner.impact.base_rate", "0.02").unwrap();
        assert_eq!(cfg.planner.impact.base_rate, 0.02);
    }

    #[test]
    fn apply_updates_enum_string() {
        let mut cfg = Config::default();
        cfg.apply("planner.checkpoint_precedence", "mock_first").unwrap();
        assert_eq!(cfg.planner.checkpoint_precedence, CheckpointPrecedence::MockFirst);
        assert!(cfg.apply("planner.checkpoint_precedence", "sideways").is_err());
    }

    #[test]
    fn apply_sets_and_clears_optional_fields() {
        let mut cfg = Config::default();
        cfg.apply("seed", "42").unwrap();
        assert_eq!(cfg.seed, Some(42));
        cfg.apply("catalog_path", "/tmp/catalog.toml").unwrap();
        assert_eq!(cfg.catalog_path.as_deref(), Some("/tmp/catalog.toml"));
        cfg.apply("catalog_path", "none").unwrap();
        assert!(cfg.catalog_path.is_none());
    }

    #[test]
    fn apply_keeps_numeric_text_for_string_fields() {
        let mut cfg = Config::default();
        cfg.apply("catalog_path", "2024").unwrap();
        assert_eq!(cfg.catalog_path.as_deref(), Some("2024"));
        cfg.apply("seed", "2024").unwrap();
        assert_eq!(cfg.seed, Some(2024));
        assert!(cfg.apply("seed", "soon").is_err());
        assert_eq!(cfg.seed, Some(2024));
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "planner.nonexistent_key", "1");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result =
            Config::set_json_value_by_path(&mut json, "planner.review_interval_days", "weekly");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.seed = Some(7);
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().seed, Some(7));
    }

    #[test]
    fn load_from_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "planner = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }

    #[test]
    fn load_from_leaves_unreadable_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let bytes = [0xff, 0xfe, 0xfd];
        std::fs::write(&path, bytes).unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn catalog_defaults_to_builtin() {
        let cfg = Config::default();
        assert_eq!(cfg.catalog().unwrap(), TaskCatalog::builtin());

        let missing = Config {
            catalog_path: Some("/nonexistent/bandplan/catalog.toml".to_string()),
            ..Default::default()
        };
        assert!(missing.catalog().is_err());
    }
}

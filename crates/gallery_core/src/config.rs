//! Runtime configuration for embedding the gallery core.
//!
//! Values come from defaults, a JSON document or `GALLERY_*` environment
//! variables. `db::open_with_config` validates before opening storage.

use crate::logging::{default_log_level, normalize_level};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const ENV_DB_PATH: &str = "GALLERY_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "GALLERY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GALLERY_LOG_DIR";
pub const ENV_BUSY_TIMEOUT_MS: &str = "GALLERY_BUSY_TIMEOUT_MS";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{key}` must be a non-negative integer, got `{value}`")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{0}")]
    InvalidLogLevel(String),
    #[error("log_dir must be an absolute path, got `{}`", .0.display())]
    RelativeLogDir(PathBuf),
    #[error("busy_timeout_ms must be greater than zero")]
    ZeroBusyTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// SQLite file. `None` keeps everything in memory.
    pub database_path: Option<PathBuf>,
    pub log_level: String,
    /// Rolling log directory. File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub busy_timeout_ms: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl GalleryConfig {
    /// Builds a config from `GALLERY_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset or blank keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.database_path = Some(PathBuf::from(path));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = read(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms = raw.parse().map_err(|_| ConfigError::InvalidNumber {
                key: ENV_BUSY_TIMEOUT_MS,
                value: raw.clone(),
            })?;
        }
        Ok(config)
    }

    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.log_level).map_err(ConfigError::InvalidLogLevel)?;
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        if self.busy_timeout_ms == 0 {
            return Err(ConfigError::ZeroBusyTimeout);
        }
        Ok(())
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GalleryConfig, ENV_BUSY_TIMEOUT_MS, ENV_DB_PATH, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_in_memory_and_valid() {
        let config = GalleryConfig::default();
        assert!(config.database_path.is_none());
        assert_eq!(config.busy_timeout_ms, 5_000);
        config.validate().unwrap();
    }

    #[test]
    fn lookup_overrides_defaults_and_ignores_blank_values() {
        let config = GalleryConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/var/lib/gallery/gallery.sqlite3"),
            (ENV_LOG_LEVEL, "  "),
            (ENV_BUSY_TIMEOUT_MS, "250"),
        ]))
        .unwrap();

        assert_eq!(
            config.database_path,
            Some(PathBuf::from("/var/lib/gallery/gallery.sqlite3"))
        );
        assert_eq!(config.log_level, GalleryConfig::default().log_level);
        assert_eq!(config.busy_timeout_ms, 250);
    }

    #[test]
    fn lookup_rejects_non_numeric_timeout() {
        let err = GalleryConfig::from_lookup(lookup_from(&[(ENV_BUSY_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { value, .. } if value == "soon"));
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = GalleryConfig::from_json_str(r#"{"log_level": "warn"}"#).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.busy_timeout_ms, 5_000);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let relative = GalleryConfig {
            log_dir: Some(PathBuf::from("logs")),
            ..GalleryConfig::default()
        };
        assert!(matches!(
            relative.validate(),
            Err(ConfigError::RelativeLogDir(_))
        ));

        let zero = GalleryConfig {
            busy_timeout_ms: 0,
            ..GalleryConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroBusyTimeout)));

        let level = GalleryConfig {
            log_level: "loud".to_string(),
            ..GalleryConfig::default()
        };
        assert!(matches!(
            level.validate(),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}

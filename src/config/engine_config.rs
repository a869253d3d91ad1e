//! Engine configuration file
//!
//! ```json
//! {
//!   "catalog_path": "catalog.json",
//!   "log_level": "info",
//!   "snapshot_cache": true,
//!   "levels": [{"level": 1, "points_required": 0, "title": "Newcomer"}]
//! }
//! ```
//!
//! Only `catalog_path` is required. A relative `catalog_path` is resolved
//! against the directory holding the configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::Severity;
use crate::snapshot::{LevelDef, LevelTable};

use super::errors::{ConfigError, ConfigResult};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Catalog file or directory of catalog files (required)
    pub catalog_path: PathBuf,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Cache snapshots per user (optional, default true)
    #[serde(default = "default_snapshot_cache")]
    pub snapshot_cache: bool,

    /// Level thresholds (optional, default built-in table)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<LevelDef>>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_snapshot_cache() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("catalog.json"),
            log_level: default_log_level(),
            snapshot_cache: default_snapshot_cache(),
            levels: None,
        }
    }
}

impl EngineConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::unreadable(
                path.display().to_string(),
                format!("Failed to read config: {}", e),
            )
        })?;

        let mut config: EngineConfig = serde_json::from_str(&content).map_err(|e| {
            ConfigError::unreadable(
                path.display().to_string(),
                format!("Invalid config JSON: {}", e),
            )
        })?;

        if config.catalog_path.is_relative() {
            if let Some(base) = path.parent() {
                config.catalog_path = base.join(&config.catalog_path);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses and validates configuration held in memory.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| ConfigError::unreadable("<in-memory>", format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.catalog_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("catalog_path", "catalog_path must not be empty"));
        }

        self.log_severity()?;
        self.level_table()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> ConfigResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            ConfigError::invalid(
                "log_level",
                format!(
                    "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                    self.log_level
                ),
            )
        })
    }

    /// Configured level table, or the built-in one
    pub fn level_table(&self) -> ConfigResult<LevelTable> {
        match &self.levels {
            None => Ok(LevelTable::default_table()),
            Some(levels) => LevelTable::new(levels.clone())
                .map_err(|e| ConfigError::invalid("levels", e.to_string())),
        }
    }
}

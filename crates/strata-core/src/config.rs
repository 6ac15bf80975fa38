//! Configuration types and parsing for strata.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runner configuration from strata.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Directory containing version folders of migration task files
    pub migration_path: PathBuf,

    /// Version ceiling: version folders above this semantic version are
    /// excluded from analysis and execution
    #[serde(default)]
    pub version: Option<semver::Version>,
}

impl Config {
    /// Build a config programmatically.
    pub fn new(database: DatabaseConfig, migration_path: impl Into<PathBuf>) -> Self {
        Self {
            database,
            migration_path: migration_path.into(),
            version: None,
        }
    }

    /// Set the version ceiling.
    pub fn with_ceiling(mut self, ceiling: semver::Version) -> Self {
        self.version = Some(ceiling);
        self
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate required fields.
    ///
    /// The runner needs a database location and the location of the
    /// migration files; everything else has a default.
    pub fn validate(&self) -> CoreResult<()> {
        if self.database.path.is_empty() {
            return Err(CoreError::InvalidConfig {
                message: "a database config with a non-empty path is required".to_string(),
            });
        }

        if self.migration_path.as_os_str().is_empty() {
            return Err(CoreError::InvalidConfig {
                message: "the location of your migration files is required".to_string(),
            });
        }

        Ok(())
    }
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Logical database name, used by the database-creation statement on
    /// server-style engines (default: "main")
    #[serde(default = "default_db_name")]
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
            name: default_db_name(),
        }
    }
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_db_name() -> String {
    "main".to_string()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

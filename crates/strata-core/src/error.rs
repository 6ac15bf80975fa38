//! Error types for strata-core

use thiserror::Error;

/// Core error type for Strata
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration is missing a required value
    #[error("[E001] Invalid config: {message}")]
    InvalidConfig { message: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// E003: A requested version folder does not exist
    #[error("[E003] Migration path not found: {path}")]
    InvalidMigrationPath { path: String },

    /// E004: A version folder name is neither `init` nor valid semver
    #[error("[E004] Invalid version folder name: {name}")]
    InvalidVersion { name: String },

    /// E005: IO error
    #[error("[E005] IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

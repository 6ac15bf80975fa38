//! Error types for strata-migrate

use strata_core::CoreError;
use strata_db::DbError;
use thiserror::Error;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// R001: The state database has never been created
    #[error("[R001] Please initialize migration: database missing")]
    TableMissing,

    /// R002: The migrations table has never been created
    #[error("[R002] Please initialize migration: migrations table missing")]
    NotInitialized,

    /// R003: At least one version has unapplied tasks
    #[error("[R003] Please run migration: version {version} has unapplied tasks")]
    Needed { version: String },

    /// R004: A task was already recorded for this version.
    ///
    /// Internal signal consumed by the task loop to skip applied tasks;
    /// never escapes to the caller under normal operation.
    #[error("[R004] Migration already initialized: {name} ({version})")]
    AlreadyApplied { name: String, version: String },

    /// R005: Database creation failed for a reason other than "already exists"
    #[error("[R005] Database creation failed: {message}")]
    DatabaseCreateFailed { message: String },

    /// Core error (config, version labels, task loading)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Underlying connection error, propagated unchanged
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;

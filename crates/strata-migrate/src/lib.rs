//! strata-migrate - Migration engine for Strata
//!
//! Given a tree of versioned migration tasks and a database connection,
//! the [`Migrator`] determines which versions have been applied, applies
//! outstanding ones in order inside transactions, and records completion
//! per task so re-runs are idempotent.

pub mod analysis;
pub mod dir_source;
pub mod error;
pub mod migrator;
pub mod registry_source;
pub mod task;

pub use analysis::{AnalysisResult, VersionStatus};
pub use dir_source::DirTaskSource;
pub use error::{MigrateError, MigrateResult};
pub use migrator::Migrator;
pub use registry_source::RegistryTaskSource;
pub use task::{MigrationTask, SqlTask, TaskOp, TaskSource};

//! Migration task model and the task-source abstraction.
//!
//! A task is a named pair of forward/backward operations applied against a
//! database; its identity is the `(version, name)` pair. Tasks come from a
//! [`TaskSource`] — the file system, a compiled-in registry, or anything
//! else an embedder injects — and are re-created on every load, never
//! cached, so source changes between calls are observed.

use async_trait::async_trait;
use std::sync::Arc;
use strata_core::CoreResult;
use strata_db::{DbResult, SqlConnection};

/// A forward or backward migration operation.
///
/// The connection handle is the enclosing transaction; schema changes and
/// data changes both go through it.
#[async_trait]
pub trait TaskOp: Send + Sync {
    async fn run(&self, conn: &dyn SqlConnection, version: &str) -> DbResult<()>;
}

/// A named migration task.
#[derive(Clone)]
pub struct MigrationTask {
    /// Task name, unique within its version (e.g. the file name)
    pub name: String,
    /// Forward operation
    pub up: Arc<dyn TaskOp>,
    /// Optional backward operation
    pub down: Option<Arc<dyn TaskOp>>,
}

impl MigrationTask {
    pub fn new(name: impl Into<String>, up: Arc<dyn TaskOp>) -> Self {
        Self {
            name: name.into(),
            up,
            down: None,
        }
    }

    pub fn with_down(mut self, down: Arc<dyn TaskOp>) -> Self {
        self.down = Some(down);
        self
    }
}

impl std::fmt::Debug for MigrationTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationTask")
            .field("name", &self.name)
            .field("has_down", &self.down.is_some())
            .finish()
    }
}

/// A task operation that runs a SQL batch.
///
/// File-based tasks compile to this.
pub struct SqlTask {
    sql: String,
}

impl SqlTask {
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }
}

#[async_trait]
impl TaskOp for SqlTask {
    async fn run(&self, conn: &dyn SqlConnection, _version: &str) -> DbResult<()> {
        conn.execute_batch(&self.sql).await
    }
}

/// Source of migration tasks, keyed by version folder name.
pub trait TaskSource: Send + Sync {
    /// All version folder names present in the source; empty when the
    /// source location does not exist. Ordering is not significant — the
    /// analyzer orders by version.
    fn versions(&self) -> CoreResult<Vec<String>>;

    /// The tasks of one version, in application order. Fails with
    /// `InvalidMigrationPath` when the version does not exist.
    fn tasks(&self, version: &str) -> CoreResult<Vec<MigrationTask>>;
}

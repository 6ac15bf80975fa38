//! The migration engine.
//!
//! [`Migrator`] owns one lazily-established connection and drives tasks
//! from an injected [`TaskSource`] through a before/execute/after protocol.
//! `init()` and `migrate()` each open exactly one transaction; a failure
//! anywhere rolls back every task applied in that call. Applied tasks are
//! recorded in the `migrations` table, which the before-task check uses to
//! make re-runs idempotent.

use crate::analysis::{analyze_versions, AnalysisResult};
use crate::dir_source::DirTaskSource;
use crate::error::{MigrateError, MigrateResult};
use crate::task::{MigrationTask, TaskSource};
use std::sync::Arc;
use strata_core::version::INIT;
use strata_core::{Config, DbType};
use strata_db::{DbError, DuckDbBackend, SqlConnection};

/// Name of the state table tracking applied tasks.
pub(crate) const MIGRATIONS_TABLE: &str = "migrations";

/// State table columns: one row per applied `(name, version)` pair.
const MIGRATIONS_COLUMNS: &[&str] = &["name", "version"];

/// Schema-migration runner over a single logical connection.
pub struct Migrator {
    config: Config,
    source: Arc<dyn TaskSource>,
    connection: Option<Arc<dyn SqlConnection>>,
}

impl std::fmt::Debug for Migrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrator")
            .field("config", &self.config)
            .field("connected", &self.connection.is_some())
            .finish()
    }
}

impl Migrator {
    /// Build a migrator with an injected task source.
    pub fn new(config: Config, source: Arc<dyn TaskSource>) -> MigrateResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            connection: None,
        })
    }

    /// Build a migrator reading tasks from `config.migration_path`.
    pub fn from_config(config: Config) -> MigrateResult<Self> {
        let source = Arc::new(DirTaskSource::new(config.migration_path.clone()));
        Self::new(config, source)
    }

    /// Establish the connection if needed and return a shared handle.
    ///
    /// After `disconnect()` a later call opens a fresh connection.
    pub async fn connect(&mut self) -> MigrateResult<Arc<dyn SqlConnection>> {
        if let Some(conn) = &self.connection {
            return Ok(Arc::clone(conn));
        }

        let conn: Arc<dyn SqlConnection> = match self.config.database.db_type {
            DbType::DuckDb => Arc::new(DuckDbBackend::new(&self.config.database.path)?),
        };
        log::debug!(
            "connected to {} database at {}",
            conn.backend(),
            self.config.database.path
        );
        self.connection = Some(Arc::clone(&conn));
        Ok(conn)
    }

    /// Tear down the connection, releasing underlying resources.
    pub async fn disconnect(&mut self) -> MigrateResult<()> {
        if let Some(conn) = self.connection.take() {
            conn.destroy().await?;
        }
        Ok(())
    }

    /// Initialize the database: ensure the database container exists, then
    /// apply the `init` version inside one transaction.
    pub async fn init(&mut self) -> MigrateResult<()> {
        let conn = self.connect().await?;
        self.create_database(conn.as_ref()).await?;

        conn.begin().await?;
        let result = self.migrate_to(conn.as_ref(), INIT).await;
        finish_transaction(conn.as_ref(), result).await
    }

    /// Apply every outstanding version, strictly in version order, inside
    /// one transaction. A no-op when nothing is outstanding.
    pub async fn migrate(&mut self) -> MigrateResult<()> {
        let conn = self.connect().await?;

        conn.begin().await?;
        let result = self.migrate_outstanding(conn.as_ref()).await;
        finish_transaction(conn.as_ref(), result).await
    }

    async fn migrate_outstanding(&self, conn: &dyn SqlConnection) -> MigrateResult<()> {
        let analysis = analyze_versions(
            conn,
            self.source.as_ref(),
            self.config.version.as_ref(),
            &[INIT],
        )
        .await?;

        let outstanding = analysis.outstanding();
        if outstanding.is_empty() {
            log::debug!("all versions complete, nothing to migrate");
            return Ok(());
        }

        // One version's tasks must all complete before the next starts:
        // later versions may depend on earlier schema/data changes.
        for label in outstanding {
            self.migrate_to(conn, &label.to_string()).await?;
        }
        Ok(())
    }

    /// Apply one version's tasks in load order against the open
    /// transaction.
    async fn migrate_to(&self, conn: &dyn SqlConnection, version: &str) -> MigrateResult<()> {
        let tasks = self.source.tasks(version)?;

        for task in tasks {
            match self.before_task(conn, &task.name, version).await {
                Ok(()) => {}
                Err(MigrateError::AlreadyApplied { name, version }) => {
                    // Already recorded: skip, keeping re-runs idempotent
                    // at the task level.
                    log::debug!("task {name} ({version}) already applied, skipping");
                    continue;
                }
                Err(err) => return Err(err),
            }

            log::debug!("applying task {} ({version})", task.name);
            task.up.run(conn, version).await?;

            self.after_task(conn, &task.name, version).await?;
        }

        Ok(())
    }

    /// Before-task bookkeeping: create the state table on first write and
    /// refuse tasks that are already recorded.
    async fn before_task(
        &self,
        conn: &dyn SqlConnection,
        name: &str,
        version: &str,
    ) -> MigrateResult<()> {
        let rows = match conn.query_rows(MIGRATIONS_TABLE, &[]).await {
            Ok(rows) => rows,
            Err(DbError::TableNotFound(_)) => {
                // Lazy creation at first write: a missing state table is
                // not an error here.
                log::debug!("creating {MIGRATIONS_TABLE} table");
                conn.create_table(MIGRATIONS_TABLE, MIGRATIONS_COLUMNS).await?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let applied = rows.iter().any(|row| {
            row.get("name").is_some_and(|n| n == name)
                && row.get("version").is_some_and(|v| v == version)
        });
        if applied {
            return Err(MigrateError::AlreadyApplied {
                name: name.to_string(),
                version: version.to_string(),
            });
        }

        Ok(())
    }

    /// After-task bookkeeping: record the applied task.
    async fn after_task(
        &self,
        conn: &dyn SqlConnection,
        name: &str,
        version: &str,
    ) -> MigrateResult<()> {
        conn.insert_row(MIGRATIONS_TABLE, &[("name", name), ("version", version)])
            .await?;
        Ok(())
    }

    /// Read-only readiness check: fails fast when `init` has not completed
    /// or any in-scope version is outstanding. Never mutates state.
    pub async fn ready(&mut self) -> MigrateResult<()> {
        let analysis = self.analyze().await?;

        if let Some(status) = analysis.get(&strata_core::VersionLabel::Init) {
            if !status.is_complete() {
                return Err(MigrateError::Needed {
                    version: INIT.to_string(),
                });
            }
        }

        for (label, status) in analysis.iter() {
            if !label.is_init() && !status.is_complete() {
                return Err(MigrateError::Needed {
                    version: label.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Reconcile expected vs. actual task counts for every in-scope
    /// version. Read-only.
    pub async fn analyze(&mut self) -> MigrateResult<AnalysisResult> {
        let conn = self.connect().await?;
        analyze_versions(
            conn.as_ref(),
            self.source.as_ref(),
            self.config.version.as_ref(),
            &[],
        )
        .await
    }

    /// The tasks of one version, in application order.
    pub fn tasks(&self, version: &str) -> MigrateResult<Vec<MigrationTask>> {
        Ok(self.source.tasks(version)?)
    }

    /// Ensure the database container exists. A "database already exists"
    /// race is not an error; any other failure is wrapped.
    async fn create_database(&self, conn: &dyn SqlConnection) -> MigrateResult<()> {
        match conn.create_database(&self.config.database.name).await {
            Ok(()) => Ok(()),
            Err(DbError::DatabaseExists(_)) => Ok(()),
            Err(err) => Err(MigrateError::DatabaseCreateFailed {
                message: err.to_string(),
            }),
        }
    }
}

/// Commit on success, roll back on any escape, preserving the original
/// error over a failed rollback.
async fn finish_transaction(
    conn: &dyn SqlConnection,
    result: MigrateResult<()>,
) -> MigrateResult<()> {
    match result {
        Ok(()) => {
            conn.commit().await?;
            Ok(())
        }
        Err(err) => {
            if let Err(rollback_err) = conn.rollback().await {
                log::warn!("rollback failed: {rollback_err}");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;

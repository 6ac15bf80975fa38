//! Version analysis: expected vs. actual task counts per version.
//!
//! This is the reconciliation primitive the engine builds on. For every
//! version folder in scope it counts the recorded `migrations` rows
//! (`actual`) against the loadable task files (`expected`); a version is
//! complete iff the two match.

use crate::error::{MigrateError, MigrateResult};
use crate::migrator::MIGRATIONS_TABLE;
use crate::task::TaskSource;
use strata_core::VersionLabel;
use strata_db::{DbError, SqlConnection};

/// Expected vs. actual task counts for one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionStatus {
    /// Number of loadable task files under the version folder
    pub expected: usize,
    /// Number of recorded migration rows for the version
    pub actual: usize,
}

impl VersionStatus {
    /// A version is complete iff every expected task is recorded.
    pub fn is_complete(&self) -> bool {
        self.expected == self.actual
    }
}

/// Per-version discrepancy report, ordered by version (init first, then
/// ascending semver).
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    entries: Vec<(VersionLabel, VersionStatus)>,
}

impl AnalysisResult {
    pub(crate) fn from_entries(mut entries: Vec<(VersionLabel, VersionStatus)>) -> Self {
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Self { entries }
    }

    /// Status of one version, if it was in scope.
    pub fn get(&self, label: &VersionLabel) -> Option<&VersionStatus> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == label)
            .map(|(_, status)| status)
    }

    /// All entries in version order.
    pub fn iter(&self) -> impl Iterator<Item = &(VersionLabel, VersionStatus)> {
        self.entries.iter()
    }

    /// Versions whose expected/actual counts diverge, in version order.
    pub fn outstanding(&self) -> Vec<VersionLabel> {
        self.entries
            .iter()
            .filter(|(_, status)| !status.is_complete())
            .map(|(label, _)| label.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Analyze every in-scope version: all folders the source knows, minus
/// `exclude`, minus releases above `ceiling`.
///
/// The per-version state lookups are independent reads against one
/// connection; they are issued as a batch of futures and joined
/// (fan-out/fan-in). Backends that serialize statements behind a lock
/// simply degrade this to sequential execution.
pub(crate) async fn analyze_versions(
    conn: &dyn SqlConnection,
    source: &dyn TaskSource,
    ceiling: Option<&semver::Version>,
    exclude: &[&str],
) -> MigrateResult<AnalysisResult> {
    let mut labels = Vec::new();
    for folder in source.versions()? {
        if exclude.contains(&folder.as_str()) {
            continue;
        }
        // Folder names that are neither `init` nor valid semver are
        // rejected outright rather than silently mis-ordered.
        let label = VersionLabel::parse(&folder)?;
        if let Some(ceiling) = ceiling {
            if label.exceeds_ceiling(ceiling) {
                log::debug!("version {label} exceeds ceiling {ceiling}, skipping");
                continue;
            }
        }
        labels.push(label);
    }

    let lookups = labels.iter().map(|label| async move {
        let folder = label.to_string();
        let rows = conn
            .query_rows(MIGRATIONS_TABLE, &[("version", folder.as_str())])
            .await
            .map_err(map_state_lookup_error)?;
        let expected = source.tasks(&folder)?.len();

        Ok::<(VersionLabel, VersionStatus), MigrateError>((
            label.clone(),
            VersionStatus {
                expected,
                actual: rows.len(),
            },
        ))
    });

    let entries = futures::future::try_join_all(lookups).await?;
    Ok(AnalysisResult::from_entries(entries))
}

/// Map a failed state lookup to the initialization errors the caller can
/// act on; anything else propagates unchanged.
fn map_state_lookup_error(err: DbError) -> MigrateError {
    match err {
        // Database never created
        DbError::DatabaseNotFound(_) => MigrateError::TableMissing,
        // Database exists but the migrations table does not
        DbError::TableNotFound(_) => MigrateError::NotInitialized,
        other => MigrateError::Db(other),
    }
}

#[cfg(test)]
#[path = "analysis_test.rs"]
mod tests;

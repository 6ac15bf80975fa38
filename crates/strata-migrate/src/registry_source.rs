//! Compiled-in task source.
//!
//! Substitutes for the file-system source when tasks ship inside the
//! binary: embedders register task tables per version and hand the
//! registry to the engine. Same contract as any other [`TaskSource`].

use crate::task::{MigrationTask, TaskSource};
use std::collections::BTreeMap;
use strata_core::{CoreError, CoreResult};

/// In-memory registry of migration tasks keyed by version folder name.
#[derive(Default)]
pub struct RegistryTaskSource {
    versions: BTreeMap<String, Vec<MigrationTask>>,
}

impl RegistryTaskSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the task set for a version, replacing any previous set.
    pub fn insert(&mut self, version: impl Into<String>, tasks: Vec<MigrationTask>) -> &mut Self {
        self.versions.insert(version.into(), tasks);
        self
    }
}

impl TaskSource for RegistryTaskSource {
    fn versions(&self) -> CoreResult<Vec<String>> {
        Ok(self.versions.keys().cloned().collect())
    }

    fn tasks(&self, version: &str) -> CoreResult<Vec<MigrationTask>> {
        self.versions
            .get(version)
            .cloned()
            .ok_or_else(|| CoreError::InvalidMigrationPath {
                path: version.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::SqlTask;
    use std::sync::Arc;

    #[test]
    fn test_registered_versions_and_tasks() {
        let mut registry = RegistryTaskSource::new();
        registry.insert(
            "init",
            vec![MigrationTask::new(
                "1-create-users",
                Arc::new(SqlTask::new("CREATE TABLE users (name VARCHAR)")),
            )],
        );
        registry.insert("1.0.0", vec![]);

        assert_eq!(
            registry.versions().unwrap(),
            vec!["1.0.0".to_string(), "init".to_string()]
        );
        assert_eq!(registry.tasks("init").unwrap().len(), 1);
        assert!(registry.tasks("1.0.0").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_version_fails() {
        let registry = RegistryTaskSource::new();
        let err = registry.tasks("init").unwrap_err();
        assert!(matches!(err, CoreError::InvalidMigrationPath { .. }));
    }
}

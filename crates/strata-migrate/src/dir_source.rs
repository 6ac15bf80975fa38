//! File-system task source.
//!
//! Layout: one subdirectory per version under the migration root, each
//! containing `*.sql` task files applied in file-name order. A file named
//! `<task>.down.sql` holds the backward operation for `<task>.sql` and is
//! not a task of its own. Entries that cannot be loaded as tasks are
//! skipped, not fatal — version folders may contain stray files.

use crate::task::{MigrationTask, SqlTask, TaskSource};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use strata_core::{CoreError, CoreResult};

const TASK_EXT: &str = ".sql";
const DOWN_EXT: &str = ".down.sql";

/// Task source reading version folders of SQL files from disk.
pub struct DirTaskSource {
    root: PathBuf,
}

impl DirTaskSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Sorted entry names of a directory; `None` when it does not exist.
    fn list(path: &PathBuf) -> CoreResult<Option<Vec<(String, bool)>>> {
        let read_dir = match std::fs::read_dir(path) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            let is_dir = entry.file_type()?.is_dir();
            entries.push((entry.file_name().to_string_lossy().into_owned(), is_dir));
        }
        entries.sort();
        Ok(Some(entries))
    }
}

impl TaskSource for DirTaskSource {
    fn versions(&self) -> CoreResult<Vec<String>> {
        let entries = Self::list(&self.root)?.unwrap_or_default();
        Ok(entries
            .into_iter()
            .filter(|(_, is_dir)| *is_dir)
            .map(|(name, _)| name)
            .collect())
    }

    fn tasks(&self, version: &str) -> CoreResult<Vec<MigrationTask>> {
        let dir = self.root.join(version);
        let entries = Self::list(&dir)?.ok_or_else(|| CoreError::InvalidMigrationPath {
            path: dir.display().to_string(),
        })?;

        // First pass: collect backward operations keyed by base task name.
        let mut downs: HashMap<String, Arc<SqlTask>> = HashMap::new();
        for (name, is_dir) in &entries {
            if *is_dir || !name.ends_with(DOWN_EXT) {
                continue;
            }
            match std::fs::read_to_string(dir.join(name)) {
                Ok(sql) => {
                    let base = format!("{}{TASK_EXT}", &name[..name.len() - DOWN_EXT.len()]);
                    downs.insert(base, Arc::new(SqlTask::new(sql)));
                }
                Err(e) => log::warn!("Cannot read {}: {e}", dir.join(name).display()),
            }
        }

        let mut tasks = Vec::new();
        for (name, is_dir) in &entries {
            if *is_dir || !name.ends_with(TASK_EXT) || name.ends_with(DOWN_EXT) {
                continue;
            }
            let sql = match std::fs::read_to_string(dir.join(name)) {
                Ok(sql) => sql,
                Err(e) => {
                    // Lenient by policy: an unloadable entry is excluded,
                    // not an error.
                    log::warn!("Cannot read {}: {e}", dir.join(name).display());
                    continue;
                }
            };

            let mut task = MigrationTask::new(name.clone(), Arc::new(SqlTask::new(sql)));
            if let Some(down) = downs.remove(name) {
                task = task.with_down(down);
            }
            tasks.push(task);
        }

        Ok(tasks)
    }
}

#[cfg(test)]
#[path = "dir_source_test.rs"]
mod tests;

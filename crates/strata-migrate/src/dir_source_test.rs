use super::*;
use std::fs;
use std::path::Path;

fn write_file(dir: &Path, name: &str, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_versions_missing_root_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirTaskSource::new(dir.path().join("does-not-exist"));

    assert!(source.versions().unwrap().is_empty());
}

#[test]
fn test_versions_lists_directories_only() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("init")).unwrap();
    fs::create_dir_all(dir.path().join("1.0.0")).unwrap();
    fs::write(dir.path().join("README.md"), "notes").unwrap();

    let source = DirTaskSource::new(dir.path());
    let versions = source.versions().unwrap();

    assert_eq!(versions, vec!["1.0.0".to_string(), "init".to_string()]);
}

#[test]
fn test_tasks_sorted_by_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let init = dir.path().join("init");
    write_file(&init, "2-insert-users.sql", "INSERT INTO users VALUES ('John Doe');");
    write_file(&init, "1-create-users.sql", "CREATE TABLE users (name VARCHAR);");

    let source = DirTaskSource::new(dir.path());
    let tasks = source.tasks("init").unwrap();

    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["1-create-users.sql", "2-insert-users.sql"]);
}

#[test]
fn test_non_task_entries_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let init = dir.path().join("init");
    write_file(&init, "1-create-users.sql", "CREATE TABLE users (name VARCHAR);");
    write_file(&init, "notes.txt", "not a task");
    write_file(&init, ".gitkeep", "");
    fs::create_dir_all(init.join("nested")).unwrap();

    let source = DirTaskSource::new(dir.path());
    let tasks = source.tasks("init").unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "1-create-users.sql");
}

#[test]
fn test_down_files_pair_with_base_task() {
    let dir = tempfile::tempdir().unwrap();
    let init = dir.path().join("init");
    write_file(&init, "1-create-users.sql", "CREATE TABLE users (name VARCHAR);");
    write_file(&init, "1-create-users.down.sql", "DROP TABLE users;");
    write_file(&init, "2-insert-users.sql", "INSERT INTO users VALUES ('John Doe');");

    let source = DirTaskSource::new(dir.path());
    let tasks = source.tasks("init").unwrap();

    // The down file is attached, not listed as a task of its own.
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].name, "1-create-users.sql");
    assert!(tasks[0].down.is_some());
    assert!(tasks[1].down.is_none());
}

#[test]
fn test_missing_version_folder_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("init")).unwrap();

    let source = DirTaskSource::new(dir.path());
    let err = source.tasks("9.9.9").unwrap_err();

    assert!(matches!(err, CoreError::InvalidMigrationPath { .. }));
}

#[test]
fn test_tasks_reloaded_on_every_call() {
    let dir = tempfile::tempdir().unwrap();
    let init = dir.path().join("init");
    write_file(&init, "1-create-users.sql", "CREATE TABLE users (name VARCHAR);");

    let source = DirTaskSource::new(dir.path());
    assert_eq!(source.tasks("init").unwrap().len(), 1);

    write_file(&init, "2-insert-users.sql", "INSERT INTO users VALUES ('John Doe');");
    assert_eq!(source.tasks("init").unwrap().len(), 2);
}

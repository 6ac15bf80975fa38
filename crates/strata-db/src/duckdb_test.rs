use super::*;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.backend(), "duckdb");
}

#[tokio::test]
async fn test_create_table_and_insert() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table("migrations", &["name", "version"])
        .await
        .unwrap();
    db.insert_row("migrations", &[("name", "1-create-users.sql"), ("version", "init")])
        .await
        .unwrap();

    let rows = db.query_rows("migrations", &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "1-create-users.sql");
    assert_eq!(rows[0]["version"], "init");
}

#[tokio::test]
async fn test_query_rows_with_filters() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table("migrations", &["name", "version"])
        .await
        .unwrap();
    db.insert_row("migrations", &[("name", "a.sql"), ("version", "init")])
        .await
        .unwrap();
    db.insert_row("migrations", &[("name", "b.sql"), ("version", "1.0.0")])
        .await
        .unwrap();

    let rows = db
        .query_rows("migrations", &[("version", "1.0.0")])
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "b.sql");

    let rows = db
        .query_rows("migrations", &[("name", "a.sql"), ("version", "init")])
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    let rows = db
        .query_rows("migrations", &[("version", "9.9.9")])
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_delete_rows() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table("migrations", &["name", "version"])
        .await
        .unwrap();
    db.insert_row("migrations", &[("name", "a.sql"), ("version", "init")])
        .await
        .unwrap();
    db.insert_row("migrations", &[("name", "b.sql"), ("version", "init")])
        .await
        .unwrap();

    let deleted = db
        .delete_rows("migrations", &[("name", "a.sql")])
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let rows = db.query_rows("migrations", &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_missing_table_classified() {
    let db = DuckDbBackend::in_memory().unwrap();

    let err = db.query_rows("migrations", &[]).await.unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)), "{err}");
}

#[tokio::test]
async fn test_rollback_discards_writes() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table("migrations", &["name", "version"])
        .await
        .unwrap();

    db.begin().await.unwrap();
    db.insert_row("migrations", &[("name", "a.sql"), ("version", "init")])
        .await
        .unwrap();
    db.rollback().await.unwrap();

    let rows = db.query_rows("migrations", &[]).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_commit_keeps_writes() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_table("migrations", &["name", "version"])
        .await
        .unwrap();

    db.begin().await.unwrap();
    db.insert_row("migrations", &[("name", "a.sql"), ("version", "init")])
        .await
        .unwrap();
    db.commit().await.unwrap();

    let rows = db.query_rows("migrations", &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_raw_query() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE users (name VARCHAR, email VARCHAR); INSERT INTO users VALUES ('John Doe', 'johndoe@gmail.com');")
        .await
        .unwrap();

    let rows = db.query("SELECT * FROM users").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "John Doe");
    assert_eq!(rows[0]["email"], "johndoe@gmail.com");
}

#[tokio::test]
async fn test_create_database_noop() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.create_database("app").await.unwrap();
}

#[tokio::test]
async fn test_destroy_then_use() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.destroy().await.unwrap();

    let err = db.execute("SELECT 1").await.unwrap_err();
    assert!(matches!(err, DbError::ConnectionError(_)));

    // destroy is idempotent
    db.destroy().await.unwrap();
}

#[tokio::test]
async fn test_file_backed_connection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.duckdb");

    let db = DuckDbBackend::new(path.to_str().unwrap()).unwrap();
    db.create_table("migrations", &["name", "version"])
        .await
        .unwrap();
    db.insert_row("migrations", &[("name", "a.sql"), ("version", "init")])
        .await
        .unwrap();
    db.destroy().await.unwrap();

    // A fresh connection sees the committed state.
    let db = DuckDbBackend::new(path.to_str().unwrap()).unwrap();
    let rows = db.query_rows("migrations", &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
}

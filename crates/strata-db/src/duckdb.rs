//! DuckDB connection backend

use crate::error::{DbError, DbResult};
use crate::traits::{Row, SqlConnection};
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
///
/// The connection lives behind a mutex (duckdb connections are not Sync),
/// so statements issued concurrently are serialized at the lock. The
/// handle is an `Option` so `destroy` can take it out; every call after
/// destroy fails with a connection error.
pub struct DuckDbBackend {
    conn: Mutex<Option<Connection>>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Option<Connection>>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Run `f` against the live connection, failing if destroyed.
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> DbResult<T>) -> DbResult<T> {
        let guard = self.lock()?;
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(DbError::ConnectionError(
                "connection has been destroyed".to_string(),
            )),
        }
    }

    fn query_sync(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Row>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql).map_err(DbError::from)?;

            // Collect values first: DuckDB panics on stmt.column_count()
            // before execution, so column metadata is read afterwards.
            let raw_rows: Vec<Vec<String>> = stmt
                .query_map(duckdb::params_from_iter(params.iter().copied()), |row| {
                    let count = row.as_ref().column_count();
                    Ok((0..count).map(|i| column_as_string(row, i)).collect())
                })
                .map_err(DbError::from)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(DbError::from)?;

            let names: Vec<String> = (0..stmt.column_count())
                .map(|i| stmt.column_name(i).map_or("?".to_string(), String::from))
                .collect();

            Ok(raw_rows
                .into_iter()
                .map(|values| names.iter().cloned().zip(values).collect())
                .collect())
        })
    }

    fn execute_sync(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        self.with_conn(|conn| {
            conn.execute(sql, duckdb::params_from_iter(params.iter().copied()))
                .map_err(DbError::from)
        })
    }
}

/// Read a column value as a String, trying multiple DuckDB types.
fn column_as_string(row: &duckdb::Row<'_>, idx: usize) -> String {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return s;
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return n.to_string();
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return f.to_string();
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return b.to_string();
    }
    "null".to_string()
}

/// Build `WHERE a = ? AND b = ?` from equality filters (empty = no clause).
fn where_clause(filters: &[(&str, &str)]) -> String {
    if filters.is_empty() {
        return String::new();
    }
    let conditions: Vec<String> = filters.iter().map(|(col, _)| format!("{col} = ?")).collect();
    format!(" WHERE {}", conditions.join(" AND "))
}

#[async_trait]
impl SqlConnection for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql, &[])
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.with_conn(|conn| conn.execute_batch(sql).map_err(DbError::from))
    }

    async fn query(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.query_sync(sql, &[])
    }

    async fn query_rows(&self, table: &str, filters: &[(&str, &str)]) -> DbResult<Vec<Row>> {
        let sql = format!("SELECT * FROM {table}{}", where_clause(filters));
        let params: Vec<&str> = filters.iter().map(|(_, value)| *value).collect();
        self.query_sync(&sql, &params)
    }

    async fn insert_row(&self, table: &str, values: &[(&str, &str)]) -> DbResult<()> {
        let columns: Vec<&str> = values.iter().map(|(col, _)| *col).collect();
        let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );
        let params: Vec<&str> = values.iter().map(|(_, value)| *value).collect();
        self.execute_sync(&sql, &params)?;
        Ok(())
    }

    async fn delete_rows(&self, table: &str, filters: &[(&str, &str)]) -> DbResult<usize> {
        let sql = format!("DELETE FROM {table}{}", where_clause(filters));
        let params: Vec<&str> = filters.iter().map(|(_, value)| *value).collect();
        self.execute_sync(&sql, &params)
    }

    async fn create_table(&self, table: &str, columns: &[&str]) -> DbResult<()> {
        let defs: Vec<String> = columns.iter().map(|col| format!("{col} VARCHAR")).collect();
        let sql = format!("CREATE TABLE {table} ({})", defs.join(", "));
        self.execute_sync(&sql, &[])?;
        Ok(())
    }

    async fn create_database(&self, name: &str) -> DbResult<()> {
        // Embedded engine: the database file is the database. Nothing to
        // create beyond the connection itself.
        log::debug!("create_database({name}) is a no-op for duckdb");
        Ok(())
    }

    async fn begin(&self) -> DbResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch("BEGIN TRANSACTION")
                .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))
        })
    }

    async fn commit(&self) -> DbResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch("COMMIT")
                .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
        })
    }

    async fn rollback(&self) -> DbResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch("ROLLBACK")
                .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
        })
    }

    async fn destroy(&self) -> DbResult<()> {
        let mut guard = self.lock()?;
        if let Some(conn) = guard.take() {
            conn.close()
                .map_err(|(_, e)| DbError::ConnectionError(e.to_string()))?;
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;

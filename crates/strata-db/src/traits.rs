//! Connection trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use std::collections::HashMap;

/// A single result row as column-name -> text-value pairs.
///
/// The migration state tables are all-VARCHAR, so text values are enough;
/// non-text columns from raw queries are rendered to strings.
pub type Row = HashMap<String, String>;

/// Transactional connection abstraction for Strata
///
/// Implementations must be Send + Sync for async operation. One logical
/// connection backs one engine instance; `begin`/`commit`/`rollback` scope
/// a single transaction at a time on that connection.
#[async_trait]
pub trait SqlConnection: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute a raw query, returning all rows
    async fn query(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Query rows from a table matching all equality filters
    /// (empty filters = all rows)
    async fn query_rows(&self, table: &str, filters: &[(&str, &str)]) -> DbResult<Vec<Row>>;

    /// Insert a single row of column/value pairs into a table
    async fn insert_row(&self, table: &str, values: &[(&str, &str)]) -> DbResult<()>;

    /// Delete rows matching all equality filters, returns deleted count
    async fn delete_rows(&self, table: &str, filters: &[(&str, &str)]) -> DbResult<usize>;

    /// Create a table with the named string (VARCHAR) columns
    async fn create_table(&self, table: &str, columns: &[&str]) -> DbResult<()>;

    /// Create the database container itself.
    ///
    /// Distinct from table operations: a no-op for embedded/file-based
    /// engines, an explicit CREATE DATABASE for server engines.
    async fn create_database(&self, name: &str) -> DbResult<()>;

    /// Begin a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the current transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the current transaction
    async fn rollback(&self) -> DbResult<()>;

    /// Tear down the connection, releasing underlying resources.
    ///
    /// Every call after destroy fails with a connection error.
    async fn destroy(&self) -> DbResult<()>;

    /// Backend identifier for logging
    fn backend(&self) -> &'static str;
}

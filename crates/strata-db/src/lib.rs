//! strata-db - Database abstraction layer for Strata
//!
//! This crate provides the `SqlConnection` trait the migration engine
//! drives, and its DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Row, SqlConnection};

//! strata-core - Core library for Strata
//!
//! This crate provides the configuration types, version-label ordering,
//! and shared error type used by the Strata migration runner.

pub mod config;
pub mod error;
pub mod version;

pub use config::{Config, DatabaseConfig, DbType};
pub use error::{CoreError, CoreResult};
pub use version::VersionLabel;

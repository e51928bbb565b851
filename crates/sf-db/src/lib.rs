//! sf-db - Database abstraction layer for Schemaflow
//!
//! This crate provides the `Database` trait, a transactional execution
//! template, and the DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;
pub mod transaction;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, Row, Value};
pub use transaction::within_transaction;

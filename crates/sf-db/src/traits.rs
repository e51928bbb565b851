//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// A single column value read from the target database.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(0) => Some(false),
            Value::Int(1) => Some(true),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// One result row.
pub type Row = Vec<Value>;

/// Database abstraction trait for Schemaflow
///
/// Implementations must be Send + Sync. Every operation executes
/// synchronously against the target and blocks its caller; the engine
/// never parallelizes statement execution.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single SQL statement, returning affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Run a query and collect every row
    async fn query(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Open an explicit transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;

    /// Check whether a table exists
    async fn table_exists(&self, schema: Option<&str>, table: &str) -> DbResult<bool>;

    /// Check whether a schema exists
    async fn schema_exists(&self, schema: &str) -> DbResult<bool>;

    /// Create a schema. Deliberately not `IF NOT EXISTS`: racing
    /// initializers rely on the existence probe plus failure-and-retry.
    async fn create_schema(&self, schema: &str) -> DbResult<()>;

    /// Server version string, for minimum-version gating
    async fn server_version(&self) -> DbResult<String>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

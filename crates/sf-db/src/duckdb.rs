//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Row, Value};
use async_trait::async_trait;
use duckdb::Connection;
use sf_core::DialectProfile;
use std::path::Path;
use std::sync::Mutex;

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
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

    fn lock(&self) -> DbResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Query synchronously, collecting every row
    fn query_sync(&self, sql: &str) -> DbResult<Vec<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::QueryError(format!("{}: {}", e, sql)))?;

        let rows: Vec<Row> = stmt
            .query_map([], |row| {
                let columns = row.as_ref().column_count();
                Ok((0..columns).map(|i| value_from_row(row, i)).collect())
            })
            .map_err(|e| DbError::QueryError(format!("{}: {}", e, sql)))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        Ok(rows)
    }

    fn exists_query_sync(&self, sql: &str, params: &[&str]) -> DbResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(sql, duckdb::params_from_iter(params), |row| row.get(0))
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        Ok(count > 0)
    }
}

/// Read one column as a [`Value`], probing types the way DuckDB answers
/// them: a wrongly-typed probe errors (or yields None) and falls through.
fn value_from_row(row: &duckdb::Row<'_>, idx: usize) -> Value {
    if let Ok(Some(v)) = row.get::<_, Option<bool>>(idx) {
        return Value::Bool(v);
    }
    if let Ok(Some(v)) = row.get::<_, Option<i64>>(idx) {
        return Value::Int(v);
    }
    if let Ok(Some(v)) = row.get::<_, Option<f64>>(idx) {
        return Value::Real(v);
    }
    if let Ok(Some(v)) = row.get::<_, Option<String>>(idx) {
        return Value::Text(v);
    }
    Value::Null
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn query(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.query_sync(sql)
    }

    async fn begin(&self) -> DbResult<()> {
        self.execute_sync("BEGIN TRANSACTION")?;
        Ok(())
    }

    async fn commit(&self) -> DbResult<()> {
        self.execute_sync("COMMIT")?;
        Ok(())
    }

    async fn rollback(&self) -> DbResult<()> {
        self.execute_sync("ROLLBACK")?;
        Ok(())
    }

    async fn table_exists(&self, schema: Option<&str>, table: &str) -> DbResult<bool> {
        let schema = schema.unwrap_or("main");
        self.exists_query_sync(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = ? AND table_name = ?",
            &[schema, table],
        )
    }

    async fn schema_exists(&self, schema: &str) -> DbResult<bool> {
        self.exists_query_sync(
            "SELECT COUNT(*) FROM information_schema.schemata WHERE schema_name = ?",
            &[schema],
        )
    }

    async fn create_schema(&self, schema: &str) -> DbResult<()> {
        let sql = format!("CREATE SCHEMA {}", DialectProfile::duckdb().quote(schema));
        self.execute_sync(&sql)?;
        Ok(())
    }

    async fn server_version(&self) -> DbResult<String> {
        let conn = self.lock()?;
        let version: String = conn
            .query_row("SELECT version()", [], |row| row.get(0))
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        Ok(version)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

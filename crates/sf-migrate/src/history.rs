//! The schema history ledger
//!
//! An append-only table owned by the target database itself. Every
//! migration attempt becomes one row; `installed_rank` establishes the
//! total application order and rows are never updated or deleted here.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use sf_core::{escape_literal, DialectProfile, HistoryRecord, HistoryType, MigrationVersion};
use sf_db::{Database, Row, Value};

use crate::error::{MigrateError, MigrateResult};

/// A record to append; the ledger assigns rank, timestamp, and installer.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub version: Option<MigrationVersion>,
    pub description: String,
    pub kind: HistoryType,
    pub script: String,
    pub checksum: Option<i32>,
    pub execution_time_ms: i64,
    pub success: bool,
}

/// Handle on the history table of one target database.
pub struct SchemaHistory {
    db: Arc<dyn Database>,
    dialect: DialectProfile,
    schema: Option<String>,
    table: String,
    installed_by: String,
}

impl SchemaHistory {
    pub fn new(
        db: Arc<dyn Database>,
        dialect: DialectProfile,
        schema: Option<String>,
        table: String,
        installed_by: String,
    ) -> Self {
        Self {
            db,
            dialect,
            schema,
            table,
            installed_by,
        }
    }

    /// Quoted, schema-qualified table reference.
    pub fn qualified_table(&self) -> String {
        self.dialect
            .quote_qualified(self.schema.as_deref(), &self.table)
    }

    pub async fn exists(&self) -> MigrateResult<bool> {
        Ok(self
            .db
            .table_exists(self.schema.as_deref(), &self.table)
            .await?)
    }

    /// Idempotently create the history table, and record a baseline marker
    /// when requested.
    pub async fn create(
        &self,
        baseline: Option<(&MigrationVersion, &str)>,
    ) -> MigrateResult<()> {
        if self.exists().await? {
            log::debug!(
                "history table {} already exists, skipping creation",
                self.qualified_table()
            );
            return Ok(());
        }

        let table = self.qualified_table();
        let q = |name: &str| self.dialect.quote(name);
        let ddl = format!(
            "CREATE TABLE {table} (
    {rank} INTEGER NOT NULL PRIMARY KEY,
    {version} VARCHAR(50),
    {description} VARCHAR(200) NOT NULL,
    {kind} VARCHAR(20) NOT NULL,
    {script} VARCHAR(1000) NOT NULL,
    {checksum} INTEGER,
    {installed_by} VARCHAR(100) NOT NULL,
    {installed_on} TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    {execution_time} INTEGER NOT NULL,
    {success} BOOLEAN NOT NULL
)",
            rank = q("installed_rank"),
            version = q("version"),
            description = q("description"),
            kind = q("type"),
            script = q("script"),
            checksum = q("checksum"),
            installed_by = q("installed_by"),
            installed_on = q("installed_on"),
            execution_time = q("execution_time"),
            success = q("success"),
        );
        self.db.execute(&ddl).await?;

        let index = format!(
            "CREATE INDEX {} ON {} ({})",
            q(&format!("{}_s_idx", self.table)),
            table,
            q("success"),
        );
        self.db.execute(&index).await?;
        log::info!("created schema history table {}", table);

        if let Some((version, description)) = baseline {
            self.append(HistoryEntry {
                version: Some(version.clone()),
                description: description.to_string(),
                kind: HistoryType::Baseline,
                script: description.to_string(),
                checksum: None,
                execution_time_ms: 0,
                success: true,
            })
            .await?;
            log::info!("recorded baseline marker at version {}", version);
        }

        Ok(())
    }

    async fn next_installed_rank(&self) -> MigrateResult<i32> {
        let sql = format!(
            "SELECT COALESCE(MAX({}), 0) FROM {}",
            self.dialect.quote("installed_rank"),
            self.qualified_table(),
        );
        let rows = self.db.query(&sql).await?;
        let max = rows
            .first()
            .and_then(|row| row.first())
            .and_then(Value::as_i64)
            .unwrap_or(0);
        Ok(max as i32 + 1)
    }

    /// Insert one record with the next `installed_rank`, returning the
    /// rank it received. Atomicity with the migration's own statements is
    /// the caller's concern: run both inside one transaction when the
    /// dialect supports it.
    pub async fn append(&self, entry: HistoryEntry) -> MigrateResult<i32> {
        let rank = self.next_installed_rank().await?;
        let q = |name: &str| self.dialect.quote(name);
        let version_sql = match &entry.version {
            Some(version) => format!("'{}'", escape_literal(&version.to_string())),
            None => "NULL".to_string(),
        };
        let checksum_sql = entry
            .checksum
            .map(|c| c.to_string())
            .unwrap_or_else(|| "NULL".to_string());

        let sql = format!(
            "INSERT INTO {table} ({rank_col}, {version_col}, {description_col}, {kind_col}, \
             {script_col}, {checksum_col}, {installed_by_col}, {execution_time_col}, {success_col}) \
             VALUES ({rank}, {version}, '{description}', '{kind}', '{script}', {checksum}, \
             '{installed_by}', {execution_time}, {success})",
            table = self.qualified_table(),
            rank_col = q("installed_rank"),
            version_col = q("version"),
            description_col = q("description"),
            kind_col = q("type"),
            script_col = q("script"),
            checksum_col = q("checksum"),
            installed_by_col = q("installed_by"),
            execution_time_col = q("execution_time"),
            success_col = q("success"),
            rank = rank,
            version = version_sql,
            description = escape_literal(&entry.description),
            kind = entry.kind.as_str(),
            script = escape_literal(&entry.script),
            checksum = checksum_sql,
            installed_by = escape_literal(&self.installed_by),
            execution_time = entry.execution_time_ms,
            success = self.dialect.boolean_literal(entry.success),
        );
        self.db.execute(&sql).await?;
        Ok(rank)
    }

    /// All records ordered by rank. An absent table reads as empty.
    pub async fn snapshot(&self) -> MigrateResult<Vec<HistoryRecord>> {
        if !self.exists().await? {
            return Ok(Vec::new());
        }
        let q = |name: &str| self.dialect.quote(name);
        let sql = format!(
            "SELECT {rank}, {version}, {description}, {kind}, {script}, {checksum}, \
             {installed_by}, {execution_time}, {success}, CAST({installed_on} AS VARCHAR) \
             FROM {table} ORDER BY {rank}",
            rank = q("installed_rank"),
            version = q("version"),
            description = q("description"),
            kind = q("type"),
            script = q("script"),
            checksum = q("checksum"),
            installed_by = q("installed_by"),
            execution_time = q("execution_time"),
            success = q("success"),
            installed_on = q("installed_on"),
            table = self.qualified_table(),
        );
        let rows = self.db.query(&sql).await?;
        rows.iter().map(record_from_row).collect()
    }

    pub async fn latest_applied_version(&self) -> MigrateResult<Option<MigrationVersion>> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .iter()
            .filter(|r| r.is_versioned() || r.kind == HistoryType::Baseline)
            .filter_map(|r| r.version.clone())
            .max())
    }

    pub async fn applied_checksum_for(
        &self,
        version: &MigrationVersion,
    ) -> MigrateResult<Option<i32>> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .iter()
            .filter(|r| r.is_versioned())
            .filter(|r| r.version.as_ref() == Some(version))
            .last()
            .and_then(|r| r.checksum))
    }

    /// Fast failed-row probe through the success index.
    pub async fn has_failed(&self) -> MigrateResult<bool> {
        if !self.exists().await? {
            return Ok(false);
        }
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = {}",
            self.qualified_table(),
            self.dialect.quote("success"),
            self.dialect.boolean_literal(false),
        );
        let rows = self.db.query(&sql).await?;
        let count = rows
            .first()
            .and_then(|row| row.first())
            .and_then(Value::as_i64)
            .unwrap_or(0);
        Ok(count > 0)
    }

    /// The lowest-rank failed row, for error reporting.
    pub async fn first_failed(&self) -> MigrateResult<Option<HistoryRecord>> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.into_iter().find(|r| !r.success))
    }

    /// Record which schemas initialization created.
    pub async fn add_schemas_marker(&self, schemas: &[String]) -> MigrateResult<()> {
        self.append(HistoryEntry {
            version: None,
            description: "<< Schema Creation >>".to_string(),
            kind: HistoryType::Schema,
            script: schemas.join(","),
            checksum: None,
            execution_time_ms: 0,
            success: true,
        })
        .await?;
        Ok(())
    }
}

fn record_from_row(row: &Row) -> MigrateResult<HistoryRecord> {
    let get = |idx: usize| -> &Value { row.get(idx).unwrap_or(&Value::Null) };

    let installed_rank = get(0)
        .as_i64()
        .ok_or_else(|| MigrateError::CorruptHistory("missing installed_rank".to_string()))?
        as i32;

    let version = match get(1) {
        Value::Text(raw) => Some(MigrationVersion::parse(raw)?),
        _ => None,
    };

    let kind_raw = get(3)
        .as_str()
        .ok_or_else(|| MigrateError::CorruptHistory("missing type".to_string()))?;
    let kind = HistoryType::parse(kind_raw).ok_or_else(|| {
        MigrateError::CorruptHistory(format!("unknown history type '{}'", kind_raw))
    })?;

    let success = get(8)
        .as_bool()
        .ok_or_else(|| MigrateError::CorruptHistory("missing success flag".to_string()))?;

    Ok(HistoryRecord {
        installed_rank,
        version,
        description: get(2).as_str().unwrap_or_default().to_string(),
        kind,
        script: get(4).as_str().unwrap_or_default().to_string(),
        checksum: get(5).as_i64().map(|c| c as i32),
        installed_by: get(6).as_str().unwrap_or_default().to_string(),
        installed_on: parse_timestamp(get(9).as_str().unwrap_or_default()),
        execution_time_ms: get(7).as_i64().unwrap_or(0),
        success,
    })
}

/// Timestamps come back as text; ordering authority is installed_rank, so
/// an unparseable value degrades to the epoch instead of failing the read.
fn parse_timestamp(text: &str) -> DateTime<Utc> {
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return naive.and_utc();
        }
    }
    DateTime::<Utc>::UNIX_EPOCH
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

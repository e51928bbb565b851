//! Schema history records
//!
//! One `HistoryRecord` per migration attempt, mirrored exactly by the rows
//! of the history table. Records are append-only: failures stay visible with
//! `success = false`, and `installed_rank` is the sole ordering authority.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::version::MigrationVersion;

/// What kind of event a history row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryType {
    /// An applied SQL migration (versioned or repeatable).
    Sql,
    /// A baseline marker: everything at or below its version is assumed
    /// pre-existing.
    Baseline,
    /// A marker recording the schemas created at initialization.
    Schema,
}

impl HistoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryType::Sql => "SQL",
            HistoryType::Baseline => "BASELINE",
            HistoryType::Schema => "SCHEMA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SQL" => Some(HistoryType::Sql),
            "BASELINE" => Some(HistoryType::Baseline),
            "SCHEMA" => Some(HistoryType::Schema),
            _ => None,
        }
    }
}

impl fmt::Display for HistoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the schema history table.
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub installed_rank: i32,
    pub version: Option<MigrationVersion>,
    pub description: String,
    pub kind: HistoryType,
    pub script: String,
    pub checksum: Option<i32>,
    pub installed_by: String,
    pub installed_on: DateTime<Utc>,
    pub execution_time_ms: i64,
    pub success: bool,
}

impl HistoryRecord {
    /// An applied repeatable migration: SQL type, no version.
    pub fn is_repeatable(&self) -> bool {
        self.kind == HistoryType::Sql && self.version.is_none()
    }

    /// An applied versioned migration row.
    pub fn is_versioned(&self) -> bool {
        self.kind == HistoryType::Sql && self.version.is_some()
    }
}

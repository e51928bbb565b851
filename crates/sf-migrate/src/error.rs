//! Error types for sf-migrate

use thiserror::Error;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// M001: a migration statement failed; the ledger records the failure
    #[error("[M001] Migration {migration} failed at statement starting on line {line}: {source}")]
    MigrationFailed {
        migration: String,
        line: usize,
        source: sf_db::DbError,
    },

    /// M002: a prior failed migration blocks the run
    #[error(
        "[M002] Schema history holds a failed migration at rank {rank} ({description}); repair it before migrating"
    )]
    FailedMigrationBlocks { rank: i32, description: String },

    /// M003: target database too old for this dialect
    #[error(
        "[M003] {dialect} version {actual} is older than the minimum supported version {minimum}"
    )]
    UnsupportedDatabaseVersion {
        dialect: String,
        actual: String,
        minimum: String,
    },

    /// M004: a history row could not be read back
    #[error("[M004] Corrupt schema history row: {0}")]
    CorruptHistory(String),

    /// M005: baseline requested on an already-initialized history
    #[error("[M005] Schema history already exists; baseline only applies before the first migration")]
    BaselineAfterInit,

    #[error("{0}")]
    Core(#[from] sf_core::CoreError),

    #[error("{0}")]
    Script(#[from] sf_sql::ScriptError),

    #[error("{0}")]
    Db(#[from] sf_db::DbError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;

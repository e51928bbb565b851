//! sf-migrate - Migration engine for Schemaflow
//!
//! Orchestrates the schema history ledger, the pending-set resolver, and
//! the statement tokenizer into the migrate/info/validate/baseline
//! operations, including the race-tolerant first-time initialization path.

pub mod applier;
pub mod error;
pub mod history;
pub mod init;
pub mod migrator;

pub use applier::{AppliedMigration, MigrationApplier};
pub use error::{MigrateError, MigrateResult};
pub use history::{HistoryEntry, SchemaHistory};
pub use init::InitRetry;
pub use migrator::{MigrateSummary, MigrationInfo, MigrationStatus, Migrator, ValidationReport};

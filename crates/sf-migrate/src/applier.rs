//! Migration applier
//!
//! Executes pending migrations in order and records each attempt in the
//! history ledger. The first failure stops the run: remaining migrations
//! are not attempted, and the failure row stays behind for diagnosis.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use sf_core::{DialectProfile, HistoryType, ResolvedMigration};
use sf_db::{within_transaction, Database};
use sf_sql::{ScriptTokenizer, StatementFragment};

use crate::error::{MigrateError, MigrateResult};
use crate::history::{HistoryEntry, SchemaHistory};

/// Outcome of one successfully applied migration.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedMigration {
    pub name: String,
    pub statements: usize,
    pub execution_time_ms: i64,
}

/// Applies an ordered pending list against one target database.
pub struct MigrationApplier<'a> {
    db: Arc<dyn Database>,
    history: &'a SchemaHistory,
    dialect: DialectProfile,
}

impl<'a> MigrationApplier<'a> {
    pub fn new(db: Arc<dyn Database>, history: &'a SchemaHistory, dialect: DialectProfile) -> Self {
        Self {
            db,
            history,
            dialect,
        }
    }

    /// Apply every migration in order, fail-fast.
    pub async fn apply_all(
        &self,
        pending: &[ResolvedMigration],
    ) -> MigrateResult<Vec<AppliedMigration>> {
        let mut applied = Vec::new();
        for migration in pending {
            applied.push(self.apply_one(migration).await?);
        }
        Ok(applied)
    }

    async fn apply_one(&self, migration: &ResolvedMigration) -> MigrateResult<AppliedMigration> {
        // Tokenize up front so lexical errors surface before anything runs.
        let fragments = ScriptTokenizer::tokenize(&migration.sql, &self.dialect)?;
        let name = migration.display_name();
        log::info!("applying {} ({} statements)", name, fragments.len());

        let started = Instant::now();
        let result = if self.dialect.supports_ddl_transactions {
            // Statements and the history row commit or roll back together.
            within_transaction(self.db.as_ref(), || async {
                self.run_fragments(migration, &fragments).await?;
                let elapsed = started.elapsed().as_millis() as i64;
                self.history
                    .append(history_entry(migration, elapsed, true))
                    .await?;
                Ok::<_, MigrateError>(())
            })
            .await
        } else {
            // No DDL transactions: record immediately after execution. A
            // crash between the two leaves a detectable gap, not a lie.
            match self.run_fragments(migration, &fragments).await {
                Ok(()) => {
                    let elapsed = started.elapsed().as_millis() as i64;
                    self.history
                        .append(history_entry(migration, elapsed, true))
                        .await
                        .map(|_| ())
                }
                Err(err) => Err(err),
            }
        };

        let elapsed = started.elapsed().as_millis() as i64;
        match result {
            Ok(()) => {
                log::info!("applied {} in {}ms", name, elapsed);
                Ok(AppliedMigration {
                    name,
                    statements: fragments.len(),
                    execution_time_ms: elapsed,
                })
            }
            Err(err) => {
                // The failure row lands after any rollback, in its own
                // implicit transaction, so the audit trail survives.
                if let Err(record_err) = self
                    .history
                    .append(history_entry(migration, elapsed, false))
                    .await
                {
                    log::error!("could not record failure of {}: {}", name, record_err);
                }
                Err(err)
            }
        }
    }

    async fn run_fragments(
        &self,
        migration: &ResolvedMigration,
        fragments: &[StatementFragment],
    ) -> MigrateResult<()> {
        for fragment in fragments {
            log::debug!("executing statement starting on line {}", fragment.start_line);
            self.db
                .execute(&fragment.sql)
                .await
                .map_err(|source| MigrateError::MigrationFailed {
                    migration: migration.display_name(),
                    line: fragment.start_line,
                    source,
                })?;
        }
        Ok(())
    }
}

fn history_entry(migration: &ResolvedMigration, elapsed_ms: i64, success: bool) -> HistoryEntry {
    HistoryEntry {
        version: migration.version.clone(),
        description: migration.description.clone(),
        kind: HistoryType::Sql,
        script: migration.script.clone(),
        checksum: Some(migration.checksum),
        execution_time_ms: elapsed_ms,
        success,
    }
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;

//! Migrator facade
//!
//! Ties the pieces together into the operations the CLI drives: migrate,
//! info, validate, and baseline.

use std::sync::Arc;

use serde::Serialize;
use sf_core::{
    resolve, Config, DialectProfile, HistoryType, MigrationSet, MigrationVersion, ResolverPolicy,
};
use sf_db::{within_transaction, Database};

use crate::applier::{AppliedMigration, MigrationApplier};
use crate::error::{MigrateError, MigrateResult};
use crate::history::SchemaHistory;
use crate::init::InitRetry;

/// Result of a migrate run.
#[derive(Debug, Serialize)]
pub struct MigrateSummary {
    pub applied: Vec<AppliedMigration>,
    pub out_of_order: usize,
    pub below_baseline: usize,
    pub total_time_ms: i64,
}

/// Result of a validate run.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub applied: usize,
    pub pending: usize,
    pub missing: Vec<String>,
}

/// Per-migration status for `info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    Applied,
    Pending,
    OutOfOrder,
    /// Excluded by the baseline cutoff.
    Ignored,
    /// Applied but no longer resolved.
    Missing,
    Failed,
}

impl std::fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationStatus::Applied => write!(f, "applied"),
            MigrationStatus::Pending => write!(f, "pending"),
            MigrationStatus::OutOfOrder => write!(f, "out of order"),
            MigrationStatus::Ignored => write!(f, "ignored"),
            MigrationStatus::Missing => write!(f, "missing"),
            MigrationStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationInfo {
    pub version: Option<String>,
    pub description: String,
    pub status: MigrationStatus,
}

/// The migration engine for one target database.
pub struct Migrator {
    db: Arc<dyn Database>,
    dialect: DialectProfile,
    history: SchemaHistory,
    schemas: Vec<String>,
    policy: ResolverPolicy,
    baseline_on_migrate: bool,
    baseline_version: MigrationVersion,
    baseline_description: String,
    init_retry: InitRetry,
}

impl Migrator {
    pub fn new(db: Arc<dyn Database>, config: &Config) -> MigrateResult<Self> {
        let dialect = config.dialect.profile();
        let history = SchemaHistory::new(
            db.clone(),
            dialect.clone(),
            config.history.schema.clone(),
            config.history.table.clone(),
            config.installed_by.clone(),
        );
        Ok(Self {
            db,
            dialect,
            history,
            schemas: config.schemas.clone(),
            policy: ResolverPolicy {
                out_of_order_allowed: config.out_of_order,
            },
            baseline_on_migrate: config.baseline_on_migrate,
            baseline_version: config.baseline_version()?,
            baseline_description: config.baseline_description.clone(),
            init_retry: InitRetry::default(),
        })
    }

    /// Override the init retry policy (tests shrink the backoff).
    pub fn with_init_retry(mut self, init_retry: InitRetry) -> Self {
        self.init_retry = init_retry;
        self
    }

    pub fn history(&self) -> &SchemaHistory {
        &self.history
    }

    /// Apply all pending migrations from `migrations`.
    pub async fn migrate(&self, migrations: &MigrationSet) -> MigrateResult<MigrateSummary> {
        self.ensure_supported().await?;
        self.provision(self.baseline_on_migrate).await?;

        if self.history.has_failed().await? {
            if let Some(failed) = self.history.first_failed().await? {
                return Err(MigrateError::FailedMigrationBlocks {
                    rank: failed.installed_rank,
                    description: failed.description,
                });
            }
        }

        let snapshot = self.history.snapshot().await?;
        let plan = resolve(&snapshot, migrations, &self.policy)?;
        for name in &plan.missing {
            log::warn!("applied migration is no longer resolved: {}", name);
        }

        if plan.is_empty() {
            log::info!("schema is up to date, nothing to migrate");
            return Ok(MigrateSummary {
                applied: Vec::new(),
                out_of_order: 0,
                below_baseline: plan.below_baseline,
                total_time_ms: 0,
            });
        }

        let started = std::time::Instant::now();
        let applier = MigrationApplier::new(self.db.clone(), &self.history, self.dialect.clone());
        let applied = applier.apply_all(&plan.pending).await?;

        Ok(MigrateSummary {
            applied,
            out_of_order: plan.out_of_order.len(),
            below_baseline: plan.below_baseline,
            total_time_ms: started.elapsed().as_millis() as i64,
        })
    }

    /// Per-migration status without mutating anything. Unlike `migrate`,
    /// conflicts (checksum drift, out-of-order) are reported as statuses,
    /// not errors.
    pub async fn info(&self, migrations: &MigrationSet) -> MigrateResult<Vec<MigrationInfo>> {
        let snapshot = self.history.snapshot().await?;
        let baseline = snapshot
            .iter()
            .filter(|r| r.kind == HistoryType::Baseline)
            .filter_map(|r| r.version.clone())
            .max();
        let latest_applied = snapshot
            .iter()
            .filter(|r| r.is_versioned() && r.success)
            .filter_map(|r| r.version.clone())
            .max()
            .or_else(|| baseline.clone());

        let mut rows = Vec::new();

        for migration in migrations.versioned() {
            let Some(version) = migration.version.as_ref() else {
                continue;
            };
            let record = snapshot
                .iter()
                .filter(|r| r.is_versioned())
                .filter(|r| r.version.as_ref() == Some(version))
                .last();
            let status = match record {
                Some(r) if !r.success => MigrationStatus::Failed,
                Some(_) => MigrationStatus::Applied,
                None if baseline.as_ref().is_some_and(|b| version <= b) => {
                    MigrationStatus::Ignored
                }
                None if latest_applied.as_ref().is_some_and(|l| version <= l) => {
                    MigrationStatus::OutOfOrder
                }
                None => MigrationStatus::Pending,
            };
            rows.push(MigrationInfo {
                version: Some(version.to_string()),
                description: migration.description.clone(),
                status,
            });
        }

        for migration in migrations.repeatable() {
            let last = snapshot
                .iter()
                .filter(|r| r.is_repeatable() && r.success)
                .filter(|r| r.description == migration.description)
                .last();
            let status = match last {
                Some(r) if r.checksum == Some(migration.checksum) => MigrationStatus::Applied,
                _ => MigrationStatus::Pending,
            };
            rows.push(MigrationInfo {
                version: None,
                description: migration.description.clone(),
                status,
            });
        }

        for record in snapshot.iter().filter(|r| r.is_versioned() && r.success) {
            if let Some(version) = &record.version {
                if !migrations.contains_version(version) {
                    rows.push(MigrationInfo {
                        version: Some(version.to_string()),
                        description: record.description.clone(),
                        status: MigrationStatus::Missing,
                    });
                }
            }
        }

        Ok(rows)
    }

    /// Checksum and ordering validation only; nothing is applied.
    pub async fn validate(&self, migrations: &MigrationSet) -> MigrateResult<ValidationReport> {
        let snapshot = self.history.snapshot().await?;
        let plan = resolve(&snapshot, migrations, &self.policy)?;
        let applied = snapshot.iter().filter(|r| r.is_versioned() && r.success).count();
        Ok(ValidationReport {
            applied,
            pending: plan.pending.len(),
            missing: plan.missing,
        })
    }

    /// Initialize the history table with a baseline marker. Only valid
    /// before the first migration has been recorded.
    pub async fn baseline(&self) -> MigrateResult<()> {
        if self.history.exists().await? {
            return Err(MigrateError::BaselineAfterInit);
        }
        self.provision(true).await
    }

    /// Create schemas and the history table exactly once across a fleet of
    /// racing processes.
    async fn provision(&self, baseline: bool) -> MigrateResult<()> {
        self.init_retry
            .run(|| self.provision_once(baseline))
            .await
    }

    async fn provision_once(&self, baseline: bool) -> MigrateResult<()> {
        within_transaction(self.db.as_ref(), || async {
            if self.history.exists().await? {
                // The expected outcome when another process won the race.
                log::debug!("schema history already initialized, skipping creation");
                return Ok(());
            }

            let mut created = Vec::new();
            for schema in &self.schemas {
                if self.db.schema_exists(schema).await? {
                    log::debug!("schema {} already exists, skipping creation", schema);
                    continue;
                }
                self.db.create_schema(schema).await?;
                created.push(schema.clone());
            }

            let marker = if baseline {
                Some((&self.baseline_version, self.baseline_description.as_str()))
            } else {
                None
            };
            self.history.create(marker).await?;

            if !created.is_empty() {
                self.history.add_schemas_marker(&created).await?;
            }
            Ok(())
        })
        .await
    }

    /// Refuse to run against servers older than the dialect supports.
    async fn ensure_supported(&self) -> MigrateResult<()> {
        let raw = self.db.server_version().await?;
        let Some(actual) = parse_server_version(&raw) else {
            log::warn!("could not parse server version '{}', skipping gate", raw);
            return Ok(());
        };
        let minimum = MigrationVersion::parse(self.dialect.min_supported_version)?;
        if actual < minimum {
            return Err(MigrateError::UnsupportedDatabaseVersion {
                dialect: self.dialect.name.to_string(),
                actual: actual.to_string(),
                minimum: minimum.to_string(),
            });
        }
        Ok(())
    }
}

/// Extract a comparable version from a server version string such as
/// `v1.1.3` or `19.0.2000.5 (X64)`.
fn parse_server_version(raw: &str) -> Option<MigrationVersion> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let digits: String = raw[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    MigrationVersion::parse(digits.trim_end_matches('.')).ok()
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;

//! Pending-set computation
//!
//! Reconciles the history ledger against the resolved migration set:
//! which migrations still need to run, in what order, and which applied
//! rows conflict with what is currently resolved.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::history::{HistoryRecord, HistoryType};
use crate::migration::{MigrationSet, ResolvedMigration};
use crate::version::MigrationVersion;

/// Resolver knobs decided by configuration, not by the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverPolicy {
    /// Allow versioned migrations below the latest applied version to run
    /// instead of failing the resolve.
    pub out_of_order_allowed: bool,
}

/// The ordered outcome of a resolve: everything the applier needs.
#[derive(Debug)]
pub struct MigrationPlan {
    /// Migrations to apply, versioned ascending followed by repeatables.
    pub pending: Vec<ResolvedMigration>,
    /// Versions in `pending` that sort below the latest applied version.
    pub out_of_order: Vec<MigrationVersion>,
    /// Applied migrations no longer present in the resolved set.
    pub missing: Vec<String>,
    /// Versioned migrations excluded by the baseline cutoff.
    pub below_baseline: usize,
}

impl MigrationPlan {
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Compute the ordered list of migrations to apply.
///
/// `snapshot` must be the full history table ordered by `installed_rank`.
/// Fails fast on checksum drift, and on out-of-order versions unless the
/// policy allows them.
pub fn resolve(
    snapshot: &[HistoryRecord],
    migrations: &MigrationSet,
    policy: &ResolverPolicy,
) -> CoreResult<MigrationPlan> {
    let baseline = snapshot
        .iter()
        .filter(|r| r.kind == HistoryType::Baseline)
        .filter_map(|r| r.version.as_ref())
        .max();

    // Later ranks win: a version re-recorded after repair shadows older rows.
    let mut applied: HashMap<MigrationVersion, &HistoryRecord> = HashMap::new();
    for record in snapshot.iter().filter(|r| r.is_versioned()) {
        if let Some(version) = &record.version {
            applied.insert(version.clone(), record);
        }
    }

    let latest_applied = match (applied.keys().max(), baseline) {
        (Some(a), Some(b)) => Some(if b > a { b.clone() } else { a.clone() }),
        (Some(a), None) => Some(a.clone()),
        (None, b) => b.cloned(),
    };

    let mut pending = Vec::new();
    let mut out_of_order = Vec::new();
    let mut below_baseline = 0;

    for migration in migrations.versioned() {
        let Some(version) = migration.version.as_ref() else {
            continue;
        };

        if baseline.is_some_and(|b| version <= b) {
            below_baseline += 1;
            continue;
        }

        if let Some(record) = applied.get(version) {
            if record.checksum != Some(migration.checksum) {
                return Err(CoreError::ChecksumMismatch {
                    migration: migration.display_name(),
                    applied: record
                        .checksum
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "none".to_string()),
                    resolved: migration.checksum,
                });
            }
            continue;
        }

        if latest_applied.as_ref().is_some_and(|latest| version <= latest) {
            if !policy.out_of_order_allowed {
                return Err(CoreError::OutOfOrder {
                    version: version.to_string(),
                    latest: latest_applied
                        .as_ref()
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                });
            }
            log::warn!(
                "applying out-of-order migration {} below latest applied version",
                migration.display_name()
            );
            out_of_order.push(version.clone());
        }

        pending.push(migration.clone());
    }

    let mut missing = Vec::new();
    for record in snapshot.iter().filter(|r| r.is_versioned() && r.success) {
        if let Some(version) = &record.version {
            if baseline.is_some_and(|b| version <= b) {
                continue;
            }
            if !migrations.contains_version(version) {
                missing.push(format!("{} - {}", version, record.description));
            }
        }
    }

    // Last successful application per repeatable description; rank order of
    // the snapshot makes "last" well defined.
    let mut last_repeatable: HashMap<&str, &HistoryRecord> = HashMap::new();
    for record in snapshot.iter().filter(|r| r.is_repeatable() && r.success) {
        last_repeatable.insert(record.description.as_str(), record);
    }

    for migration in migrations.repeatable() {
        let changed = match last_repeatable.get(migration.description.as_str()) {
            Some(record) => record.checksum != Some(migration.checksum),
            None => true,
        };
        if changed {
            pending.push(migration.clone());
        }
    }

    Ok(MigrationPlan {
        pending,
        out_of_order,
        missing,
        below_baseline,
    })
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;

//! Filesystem migration discovery
//!
//! Scans the configured directories for `V<version>__<description>.sql`
//! and `R__<description>.sql` files and builds the resolved set the engine
//! consumes. The engine itself never touches the filesystem.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sf_core::{MigrationSet, MigrationVersion, ResolvedMigration};

/// Build the migration set from every configured directory.
///
/// Missing directories are skipped with a warning; invalid migration file
/// names and duplicate versions are errors.
pub fn discover_migrations(dirs: &[PathBuf]) -> Result<MigrationSet> {
    let mut migrations = Vec::new();

    for dir in dirs {
        if !dir.is_dir() {
            log::warn!("migration path {} does not exist, skipping", dir.display());
            continue;
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("cannot read migration directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("sql"))
            .collect();
        paths.sort();

        for path in paths {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(migration) = resolve_file(file_name, &path)? {
                migrations.push(migration);
            }
        }
    }

    Ok(MigrationSet::new(migrations)?)
}

fn resolve_file(file_name: &str, path: &Path) -> Result<Option<ResolvedMigration>> {
    let stem = file_name.trim_end_matches(".sql");

    if let Some(rest) = stem.strip_prefix("R__") {
        let sql = read_script(path)?;
        let description = rest.replace('_', " ");
        return Ok(Some(ResolvedMigration::repeatable(
            description, file_name, sql,
        )));
    }

    if let Some(rest) = stem.strip_prefix('V') {
        let Some((version_raw, description_raw)) = rest.split_once("__") else {
            bail!(
                "invalid migration file name '{}': expected V<version>__<description>.sql",
                file_name
            );
        };
        let version = MigrationVersion::parse(version_raw)
            .with_context(|| format!("invalid version in migration file '{}'", file_name))?;
        let description = description_raw.replace('_', " ");
        let sql = read_script(path)?;
        return Ok(Some(ResolvedMigration::versioned(
            version, description, file_name, sql,
        )));
    }

    log::debug!("ignoring non-migration file {}", file_name);
    Ok(None)
}

fn read_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("cannot read migration script {}", path.display()))
}

#[cfg(test)]
#[path = "discover_test.rs"]
mod tests;

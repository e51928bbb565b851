//! Shared utilities for CLI commands

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use sf_core::{Config, MigrationSet};
use sf_db::{Database, DuckDbBackend};

use crate::cli::GlobalArgs;
use crate::discover;

pub(crate) fn config_path(global: &GlobalArgs) -> PathBuf {
    match &global.config {
        Some(path) => PathBuf::from(path),
        None => Path::new(&global.project_dir).join("schemaflow.yml"),
    }
}

pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let path = config_path(global);
    Config::load(&path)
        .with_context(|| format!("cannot load project config {}", path.display()))
}

pub(crate) fn open_database(config: &Config, global: &GlobalArgs) -> Result<Arc<dyn Database>> {
    let backend = if config.database.path == ":memory:" {
        DuckDbBackend::in_memory()?
    } else {
        DuckDbBackend::from_path(&Path::new(&global.project_dir).join(&config.database.path))?
    };
    Ok(Arc::new(backend))
}

pub(crate) fn load_migration_set(config: &Config, global: &GlobalArgs) -> Result<MigrationSet> {
    let dirs: Vec<PathBuf> = config
        .migration_paths
        .iter()
        .map(|path| Path::new(&global.project_dir).join(path))
        .collect();
    discover::discover_migrations(&dirs)
}

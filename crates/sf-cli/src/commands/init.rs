//! Init command implementation

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::{GlobalArgs, InitArgs};

const CONFIG_TEMPLATE: &str = r#"name: {name}

# SQL dialect of the target database: duckdb, postgres, mysql, sqlserver, sqlite
dialect: duckdb

database:
  path: schemaflow.duckdb

migration_paths:
  - migrations

# Allow versioned migrations below the latest applied version
out_of_order: false
"#;

const EXAMPLE_MIGRATION: &str = r#"-- V1__create_example.sql
-- Rename or replace this with your first migration.
CREATE TABLE example (
    id INTEGER PRIMARY KEY,
    name VARCHAR NOT NULL
);
"#;

pub async fn execute(args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let root = Path::new(&global.project_dir);
    let config_path = root.join("schemaflow.yml");
    if config_path.exists() {
        bail!("{} already exists", config_path.display());
    }

    let name = args
        .name
        .clone()
        .or_else(|| {
            root.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "schemaflow".to_string());

    let migrations_dir = root.join("migrations");
    std::fs::create_dir_all(&migrations_dir)?;
    std::fs::write(&config_path, CONFIG_TEMPLATE.replace("{name}", &name))?;

    let example = migrations_dir.join("V1__create_example.sql");
    if !example.exists() {
        std::fs::write(&example, EXAMPLE_MIGRATION)?;
    }

    println!("Initialized schemaflow project '{}'", name);
    println!("  created {}", config_path.display());
    println!("  created {}", example.display());
    println!("Run 'sf migrate' to apply migrations.");
    Ok(())
}

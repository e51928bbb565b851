//! Validate command implementation

use anyhow::Result;
use sf_migrate::Migrator;

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common;

pub async fn execute(_args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let config = common::load_config(global)?;
    let migrations = common::load_migration_set(&config, global)?;
    let db = common::open_database(&config, global)?;
    let migrator = Migrator::new(db, &config)?;

    let report = migrator.validate(&migrations).await?;

    for missing in &report.missing {
        println!("  warning: applied migration is no longer resolved: {}", missing);
    }
    println!(
        "Validation passed: {} applied, {} pending",
        report.applied, report.pending
    );
    Ok(())
}

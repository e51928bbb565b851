//! Info command implementation

use anyhow::Result;
use sf_migrate::Migrator;

use crate::cli::{GlobalArgs, InfoArgs, OutputFormat};
use crate::commands::common;

pub async fn execute(args: &InfoArgs, global: &GlobalArgs) -> Result<()> {
    let config = common::load_config(global)?;
    let migrations = common::load_migration_set(&config, global)?;
    let db = common::open_database(&config, global)?;
    let migrator = Migrator::new(db, &config)?;

    let rows = migrator.info(&migrations).await?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Pretty => {
            println!("{:<12} {:<40} {:<12}", "Version", "Description", "Status");
            for row in &rows {
                println!(
                    "{:<12} {:<40} {:<12}",
                    row.version.as_deref().unwrap_or("-"),
                    row.description,
                    row.status.to_string()
                );
            }
        }
    }

    Ok(())
}

//! Migrate command implementation

use anyhow::Result;
use sf_migrate::Migrator;

use crate::cli::{GlobalArgs, MigrateArgs, OutputFormat};
use crate::commands::common;

pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let config = common::load_config(global)?;
    let migrations = common::load_migration_set(&config, global)?;
    let db = common::open_database(&config, global)?;
    let migrator = Migrator::new(db, &config)?;

    if args.dry_run {
        let report = migrator.validate(&migrations).await?;
        println!(
            "{} applied, {} pending (dry run, nothing applied)",
            report.applied, report.pending
        );
        return Ok(());
    }

    let summary = migrator.migrate(&migrations).await?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Pretty => {
            if summary.applied.is_empty() {
                println!("Schema is up to date");
            } else {
                for applied in &summary.applied {
                    println!(
                        "  applied {} ({} statements, {}ms)",
                        applied.name, applied.statements, applied.execution_time_ms
                    );
                }
                println!(
                    "Applied {} migrations in {}ms",
                    summary.applied.len(),
                    summary.total_time_ms
                );
            }
            if global.verbose {
                if summary.below_baseline > 0 {
                    println!(
                        "  {} migrations at or below the baseline were ignored",
                        summary.below_baseline
                    );
                }
                if summary.out_of_order > 0 {
                    println!("  {} migrations applied out of order", summary.out_of_order);
                }
            }
        }
    }

    Ok(())
}

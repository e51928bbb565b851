//! Baseline command implementation

use anyhow::Result;
use sf_migrate::Migrator;

use crate::cli::{BaselineArgs, GlobalArgs};
use crate::commands::common;

pub async fn execute(args: &BaselineArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = common::load_config(global)?;
    if let Some(version) = &args.version {
        config.baseline_version = version.clone();
    }

    let db = common::open_database(&config, global)?;
    let migrator = Migrator::new(db, &config)?;
    migrator.baseline().await?;

    println!("Baseline recorded at version {}", config.baseline_version);
    Ok(())
}

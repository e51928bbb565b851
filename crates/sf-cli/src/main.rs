//! Schemaflow CLI - database schema migrations with an auditable history ledger

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod discover;

use cli::Cli;
use commands::{baseline, info, init, migrate, validate};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Init(args) => init::execute(args, &cli.global).await,
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global).await,
        cli::Commands::Info(args) => info::execute(args, &cli.global).await,
        cli::Commands::Validate(args) => validate::execute(args, &cli.global).await,
        cli::Commands::Baseline(args) => baseline::execute(args, &cli.global).await,
    }
}

//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Schemaflow - database schema migrations with a versioned history ledger
#[derive(Parser, Debug)]
#[command(name = "sf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new schemaflow project
    Init(InitArgs),

    /// Apply all pending migrations
    Migrate(MigrateArgs),

    /// Show the status of every migration
    Info(InfoArgs),

    /// Validate resolved migrations against the history ledger
    Validate(ValidateArgs),

    /// Mark an existing database as migrated up to the baseline version
    Baseline(BaselineArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name (defaults to the directory name)
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Resolve pending migrations without applying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub output: OutputFormat,
}

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub output: OutputFormat,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

/// Arguments for the baseline command
#[derive(Args, Debug)]
pub struct BaselineArgs {
    /// Override the configured baseline version
    #[arg(long)]
    pub version: Option<String>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    Pretty,
    /// Machine-readable JSON
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

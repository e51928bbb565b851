use super::*;

#[test]
fn test_parse_migrate() {
    let cli = Cli::try_parse_from(["sf", "migrate"]).unwrap();
    match cli.command {
        Commands::Migrate(args) => {
            assert!(!args.dry_run);
            assert_eq!(args.output, OutputFormat::Pretty);
        }
        other => panic!("expected migrate, got {:?}", other),
    }
    assert_eq!(cli.global.project_dir, ".");
    assert!(!cli.global.verbose);
}

#[test]
fn test_parse_migrate_dry_run_json() {
    let cli = Cli::try_parse_from(["sf", "migrate", "--dry-run", "--output", "json"]).unwrap();
    match cli.command {
        Commands::Migrate(args) => {
            assert!(args.dry_run);
            assert_eq!(args.output, OutputFormat::Json);
        }
        other => panic!("expected migrate, got {:?}", other),
    }
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from(["sf", "info", "--project-dir", "/tmp/demo", "-v"]).unwrap();
    assert_eq!(cli.global.project_dir, "/tmp/demo");
    assert!(cli.global.verbose);
}

#[test]
fn test_parse_baseline_with_version() {
    let cli = Cli::try_parse_from(["sf", "baseline", "--version", "3.1"]).unwrap();
    match cli.command {
        Commands::Baseline(args) => assert_eq!(args.version.as_deref(), Some("3.1")),
        other => panic!("expected baseline, got {:?}", other),
    }
}

#[test]
fn test_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["sf", "teleport"]).is_err());
}

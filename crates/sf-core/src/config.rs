//! Configuration types and parsing for schemaflow.yml

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dialect::DialectKind;
use crate::error::{CoreError, CoreResult};
use crate::version::MigrationVersion;

/// Main project configuration from schemaflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directories containing migration SQL files
    #[serde(default = "default_migration_paths")]
    pub migration_paths: Vec<String>,

    /// SQL dialect of the target database
    #[serde(default = "default_dialect")]
    pub dialect: DialectKind,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// History table location
    #[serde(default)]
    pub history: HistoryConfig,

    /// Schemas managed by this project, created on first run when absent
    #[serde(default)]
    pub schemas: Vec<String>,

    /// Recorded in the history table's installed_by column
    #[serde(default = "default_installed_by")]
    pub installed_by: String,

    /// Allow versioned migrations below the latest applied version
    #[serde(default)]
    pub out_of_order: bool,

    /// Insert a baseline marker when creating the history table
    #[serde(default)]
    pub baseline_on_migrate: bool,

    /// Version recorded by the baseline marker
    #[serde(default = "default_baseline_version")]
    pub baseline_version: String,

    /// Description recorded by the baseline marker
    #[serde(default = "default_baseline_description")]
    pub baseline_description: String,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database file path, or ":memory:"
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Where the schema history table lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Schema holding the history table; the database default when unset
    #[serde(default)]
    pub schema: Option<String>,

    /// History table name
    #[serde(default = "default_history_table")]
    pub table: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            schema: None,
            table: default_history_table(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::IoWithPath {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// The configured baseline version, parsed.
    pub fn baseline_version(&self) -> CoreResult<MigrationVersion> {
        MigrationVersion::parse(&self.baseline_version)
    }
}

fn default_migration_paths() -> Vec<String> {
    vec!["migrations".to_string()]
}

fn default_dialect() -> DialectKind {
    DialectKind::DuckDb
}

fn default_db_path() -> String {
    "schemaflow.duckdb".to_string()
}

fn default_history_table() -> String {
    "schemaflow_history".to_string()
}

fn default_installed_by() -> String {
    "schemaflow".to_string()
}

fn default_baseline_version() -> String {
    "1".to_string()
}

fn default_baseline_description() -> String {
    "<< Baseline >>".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("name: demo").unwrap();
        assert_eq!(config.name, "demo");
        assert_eq!(config.migration_paths, vec!["migrations"]);
        assert_eq!(config.dialect, DialectKind::DuckDb);
        assert_eq!(config.database.path, "schemaflow.duckdb");
        assert_eq!(config.history.table, "schemaflow_history");
        assert!(config.history.schema.is_none());
        assert!(!config.out_of_order);
        assert!(!config.baseline_on_migrate);
    }

    #[test]
    fn test_full_config_parses() {
        let yaml = r#"
name: warehouse
migration_paths:
  - db/migrations
dialect: sqlserver
database:
  path: ":memory:"
history:
  schema: audit
  table: schema_history
schemas:
  - audit
  - staging
installed_by: deployer
out_of_order: true
baseline_on_migrate: true
baseline_version: "3.1"
baseline_description: existing production schema
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.dialect, DialectKind::SqlServer);
        assert_eq!(config.history.schema.as_deref(), Some("audit"));
        assert_eq!(config.schemas, vec!["audit", "staging"]);
        assert!(config.out_of_order);
        assert_eq!(config.baseline_version().unwrap().to_string(), "3.1");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("name: demo\nunknown_key: 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: from-disk").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.name, "from-disk");
    }

    #[test]
    fn test_load_missing_file_has_path_context() {
        let err = Config::load(Path::new("/nonexistent/schemaflow.yml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/schemaflow.yml"));
    }
}

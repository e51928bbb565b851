//! Error types for sf-core

use thiserror::Error;

/// Core error type for Schemaflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Invalid migration version string
    #[error("[E001] Invalid migration version '{raw}': {reason}")]
    InvalidVersion { raw: String, reason: String },

    /// E002: Two migrations resolved to the same version
    #[error("[E002] Duplicate migration version {version}: {first} and {second}")]
    DuplicateVersion {
        version: String,
        first: String,
        second: String,
    },

    /// E003: Two repeatable migrations share a description
    #[error("[E003] Duplicate repeatable migration '{description}': {first} and {second}")]
    DuplicateDescription {
        description: String,
        first: String,
        second: String,
    },

    /// E004: Migration descriptor is internally inconsistent
    #[error("[E004] Malformed migration '{script}': {reason}")]
    MalformedMigration { script: String, reason: String },

    /// E005: Applied checksum no longer matches the resolved script
    #[error(
        "[E005] Checksum mismatch for {migration}: ledger has {applied}, resolved script has {resolved}"
    )]
    ChecksumMismatch {
        migration: String,
        applied: String,
        resolved: i32,
    },

    /// E006: Versioned migration resolved below the latest applied version
    #[error(
        "[E006] Out-of-order migration: version {version} is below the latest applied version {latest} and was never applied"
    )]
    OutOfOrder { version: String, latest: String },

    /// E007: Failed to read a file, with path context
    #[error("[E007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E008: Config parse error
    #[error("[E008] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E009: IO error
    #[error("[E009] IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

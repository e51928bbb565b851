//! Resolved migration descriptors and the ordered migration set

use crate::checksum::checksum_of;
use crate::error::{CoreError, CoreResult};
use crate::version::MigrationVersion;

/// Whether a migration runs once (versioned) or whenever its content
/// changes (repeatable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationKind {
    Versioned,
    Repeatable,
}

/// A discovered migration, ready to apply.
///
/// Produced by a resolver (the CLI's filesystem scanner, or anything else
/// honoring this shape); the engine only ever consumes these.
#[derive(Debug, Clone)]
pub struct ResolvedMigration {
    pub kind: MigrationKind,
    pub version: Option<MigrationVersion>,
    pub description: String,
    /// Locator recorded in the history table, typically the file name.
    pub script: String,
    /// The full SQL text.
    pub sql: String,
    pub checksum: i32,
}

impl ResolvedMigration {
    pub fn versioned(
        version: MigrationVersion,
        description: impl Into<String>,
        script: impl Into<String>,
        sql: impl Into<String>,
    ) -> Self {
        let sql = sql.into();
        Self {
            kind: MigrationKind::Versioned,
            version: Some(version),
            description: description.into(),
            script: script.into(),
            checksum: checksum_of(&sql),
            sql,
        }
    }

    pub fn repeatable(
        description: impl Into<String>,
        script: impl Into<String>,
        sql: impl Into<String>,
    ) -> Self {
        let sql = sql.into();
        Self {
            kind: MigrationKind::Repeatable,
            version: None,
            description: description.into(),
            script: script.into(),
            checksum: checksum_of(&sql),
            sql,
        }
    }

    /// Human-readable identifier used in logs and errors.
    pub fn display_name(&self) -> String {
        match &self.version {
            Some(version) => format!("version {} - {}", version, self.description),
            None => format!("repeatable - {}", self.description),
        }
    }
}

/// The full set of resolved migrations, validated and ordered.
///
/// Versioned migrations are sorted ascending by version, repeatables by
/// description. Duplicate versions and duplicate repeatable descriptions
/// are rejected at construction.
#[derive(Debug, Default)]
pub struct MigrationSet {
    versioned: Vec<ResolvedMigration>,
    repeatable: Vec<ResolvedMigration>,
}

impl MigrationSet {
    pub fn new(migrations: Vec<ResolvedMigration>) -> CoreResult<Self> {
        let mut versioned = Vec::new();
        let mut repeatable = Vec::new();

        for migration in migrations {
            match (migration.kind, &migration.version) {
                (MigrationKind::Versioned, Some(_)) => versioned.push(migration),
                (MigrationKind::Repeatable, None) => repeatable.push(migration),
                (MigrationKind::Versioned, None) => {
                    return Err(CoreError::MalformedMigration {
                        script: migration.script,
                        reason: "versioned migration without a version".to_string(),
                    });
                }
                (MigrationKind::Repeatable, Some(_)) => {
                    return Err(CoreError::MalformedMigration {
                        script: migration.script,
                        reason: "repeatable migration with a version".to_string(),
                    });
                }
            }
        }

        versioned.sort_by(|a, b| a.version.cmp(&b.version));
        repeatable.sort_by(|a, b| a.description.cmp(&b.description));

        for pair in versioned.windows(2) {
            if pair[0].version == pair[1].version {
                return Err(CoreError::DuplicateVersion {
                    version: pair[0]
                        .version
                        .as_ref()
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                    first: pair[0].script.clone(),
                    second: pair[1].script.clone(),
                });
            }
        }

        for pair in repeatable.windows(2) {
            if pair[0].description == pair[1].description {
                return Err(CoreError::DuplicateDescription {
                    description: pair[0].description.clone(),
                    first: pair[0].script.clone(),
                    second: pair[1].script.clone(),
                });
            }
        }

        Ok(Self {
            versioned,
            repeatable,
        })
    }

    pub fn versioned(&self) -> &[ResolvedMigration] {
        &self.versioned
    }

    pub fn repeatable(&self) -> &[ResolvedMigration] {
        &self.repeatable
    }

    pub fn len(&self) -> usize {
        self.versioned.len() + self.repeatable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versioned.is_empty() && self.repeatable.is_empty()
    }

    pub fn contains_version(&self, version: &MigrationVersion) -> bool {
        self.versioned
            .iter()
            .any(|m| m.version.as_ref() == Some(version))
    }
}

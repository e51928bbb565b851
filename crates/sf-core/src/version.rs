//! Migration version keys and their total order

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A versioned migration's key: dot-separated numeric components.
///
/// Underscores are normalized to dots on parse (so `2_1` reads as `2.1`).
/// Ordering is component-wise with zero padding, which makes `1.0` equal to
/// `1` and puts `2.1` between `2` and `3`. The normalized spelling is kept
/// for display.
#[derive(Debug, Clone)]
pub struct MigrationVersion {
    parts: Vec<u64>,
    display: String,
}

impl MigrationVersion {
    /// Parse a version string such as `1`, `2.1`, or `4_2_0`.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let normalized = raw.trim().replace('_', ".");
        if normalized.is_empty() {
            return Err(CoreError::InvalidVersion {
                raw: raw.to_string(),
                reason: "version must not be empty".to_string(),
            });
        }

        let mut parts = Vec::new();
        for component in normalized.split('.') {
            let value = component.parse::<u64>().map_err(|_| CoreError::InvalidVersion {
                raw: raw.to_string(),
                reason: format!("component '{}' is not a number", component),
            })?;
            parts.push(value);
        }

        Ok(Self {
            parts,
            display: normalized,
        })
    }

    /// Components with trailing zeros removed, so `1.0` and `1` agree for
    /// equality and hashing.
    fn significant(&self) -> &[u64] {
        let mut len = self.parts.len();
        while len > 0 && self.parts[len - 1] == 0 {
            len -= 1;
        }
        &self.parts[..len]
    }
}

impl PartialEq for MigrationVersion {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for MigrationVersion {}

impl Hash for MigrationVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl Ord for MigrationVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for MigrationVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

impl FromStr for MigrationVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;

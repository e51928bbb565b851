//! Statement delimiters

use std::fmt;

/// The token that terminates a statement in a script.
///
/// Most dialects end statements with `;` anywhere on a line; some (SQL
/// Server's `GO`) only recognize the delimiter when it is the sole content
/// of its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter {
    pub token: String,
    pub alone_on_line: bool,
}

impl Delimiter {
    pub fn new(token: impl Into<String>, alone_on_line: bool) -> Self {
        Self {
            token: token.into(),
            alone_on_line,
        }
    }

    /// The standard `;` delimiter.
    pub fn semicolon() -> Self {
        Self::new(";", false)
    }

    /// SQL Server's batch separator.
    pub fn go() -> Self {
        Self::new("GO", true)
    }

    /// Whether a whole line is this delimiter (for alone-on-line tokens).
    pub fn matches_line(&self, line: &str) -> bool {
        self.alone_on_line && line.trim().eq_ignore_ascii_case(&self.token)
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token)
    }
}

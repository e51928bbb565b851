//! Dialect capability profiles
//!
//! Each supported database contributes one `DialectProfile`: a fixed record
//! of lexical rules and capability flags consumed by the script tokenizer,
//! the history-table SQL generator, and the applier. Dialect variation is
//! data, not a trait hierarchy.

use serde::{Deserialize, Serialize};

use crate::delimiter::Delimiter;

/// Supported dialect names, as they appear in `schemaflow.yml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    DuckDb,
    Postgres,
    MySql,
    SqlServer,
    Sqlite,
}

impl DialectKind {
    pub fn profile(self) -> DialectProfile {
        match self {
            DialectKind::DuckDb => DialectProfile::duckdb(),
            DialectKind::Postgres => DialectProfile::postgres(),
            DialectKind::MySql => DialectProfile::mysql(),
            DialectKind::SqlServer => DialectProfile::sqlserver(),
            DialectKind::Sqlite => DialectProfile::sqlite(),
        }
    }
}

/// How identifiers are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `"name"`, embedded quotes doubled
    DoubleQuote,
    /// `[name]`, embedded `]` doubled
    Brackets,
    /// `` `name` ``, embedded backticks doubled
    Backticks,
}

/// The capability record for one database dialect.
#[derive(Debug, Clone)]
pub struct DialectProfile {
    pub name: &'static str,
    pub default_delimiter: Delimiter,
    /// Whether DDL may run inside a transaction and roll back cleanly.
    pub supports_ddl_transactions: bool,
    pub quote_style: QuoteStyle,
    pub boolean_true: &'static str,
    pub boolean_false: &'static str,
    /// Keywords that open a procedural block; delimiters inside a block are
    /// not statement boundaries.
    pub block_open_keywords: &'static [&'static str],
    pub block_close_keywords: &'static [&'static str],
    /// Whether a `DELIMITER <token>` line redefines the active delimiter.
    pub supports_delimiter_directive: bool,
    /// Whether `$tag$ ... $tag$` dollar-quoted literals are recognized.
    pub supports_dollar_quotes: bool,
    pub min_supported_version: &'static str,
}

impl DialectProfile {
    pub fn duckdb() -> Self {
        Self {
            name: "duckdb",
            default_delimiter: Delimiter::semicolon(),
            supports_ddl_transactions: true,
            quote_style: QuoteStyle::DoubleQuote,
            boolean_true: "true",
            boolean_false: "false",
            block_open_keywords: &[],
            block_close_keywords: &[],
            supports_delimiter_directive: false,
            supports_dollar_quotes: true,
            min_supported_version: "0.9",
        }
    }

    pub fn postgres() -> Self {
        Self {
            name: "postgres",
            default_delimiter: Delimiter::semicolon(),
            supports_ddl_transactions: true,
            quote_style: QuoteStyle::DoubleQuote,
            boolean_true: "true",
            boolean_false: "false",
            // Procedural bodies arrive dollar-quoted, so no block keywords.
            block_open_keywords: &[],
            block_close_keywords: &[],
            supports_delimiter_directive: false,
            supports_dollar_quotes: true,
            min_supported_version: "9.5",
        }
    }

    pub fn mysql() -> Self {
        Self {
            name: "mysql",
            default_delimiter: Delimiter::semicolon(),
            supports_ddl_transactions: false,
            quote_style: QuoteStyle::Backticks,
            boolean_true: "1",
            boolean_false: "0",
            block_open_keywords: &["BEGIN", "CASE", "IF", "LOOP", "REPEAT", "WHILE"],
            block_close_keywords: &["END"],
            supports_delimiter_directive: true,
            supports_dollar_quotes: false,
            min_supported_version: "5.1",
        }
    }

    pub fn sqlserver() -> Self {
        Self {
            name: "sqlserver",
            default_delimiter: Delimiter::go(),
            supports_ddl_transactions: true,
            quote_style: QuoteStyle::Brackets,
            boolean_true: "1",
            boolean_false: "0",
            block_open_keywords: &["BEGIN", "CASE"],
            block_close_keywords: &["END"],
            supports_delimiter_directive: false,
            supports_dollar_quotes: false,
            min_supported_version: "10.0",
        }
    }

    pub fn sqlite() -> Self {
        Self {
            name: "sqlite",
            default_delimiter: Delimiter::semicolon(),
            supports_ddl_transactions: true,
            quote_style: QuoteStyle::DoubleQuote,
            boolean_true: "1",
            boolean_false: "0",
            // Trigger bodies use BEGIN ... END.
            block_open_keywords: &["BEGIN", "CASE"],
            block_close_keywords: &["END"],
            supports_delimiter_directive: false,
            supports_dollar_quotes: false,
            min_supported_version: "3.7",
        }
    }

    /// Quote an identifier for this dialect.
    pub fn quote(&self, ident: &str) -> String {
        match self.quote_style {
            QuoteStyle::DoubleQuote => format!("\"{}\"", ident.replace('"', "\"\"")),
            QuoteStyle::Brackets => format!("[{}]", ident.replace(']', "]]")),
            QuoteStyle::Backticks => format!("`{}`", ident.replace('`', "``")),
        }
    }

    /// Quote a schema-qualified table reference.
    pub fn quote_qualified(&self, schema: Option<&str>, name: &str) -> String {
        match schema {
            Some(schema) => format!("{}.{}", self.quote(schema), self.quote(name)),
            None => self.quote(name),
        }
    }

    pub fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            self.boolean_true
        } else {
            self.boolean_false
        }
    }

    pub fn is_block_open(&self, word: &str) -> bool {
        self.block_open_keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(word))
    }

    pub fn is_block_close(&self, word: &str) -> bool {
        self.block_close_keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(word))
    }
}

/// Escape a value for use inside a single-quoted SQL string literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_double() {
        let d = DialectProfile::duckdb();
        assert_eq!(d.quote("users"), r#""users""#);
        assert_eq!(d.quote(r#"my"table"#), r#""my""table""#);
    }

    #[test]
    fn test_quote_brackets() {
        let d = DialectProfile::sqlserver();
        assert_eq!(d.quote("users"), "[users]");
        assert_eq!(d.quote("we]ird"), "[we]]ird]");
    }

    #[test]
    fn test_quote_backticks() {
        let d = DialectProfile::mysql();
        assert_eq!(d.quote("users"), "`users`");
        assert_eq!(d.quote("a`b"), "`a``b`");
    }

    #[test]
    fn test_quote_qualified() {
        let d = DialectProfile::duckdb();
        assert_eq!(d.quote_qualified(None, "history"), r#""history""#);
        assert_eq!(
            d.quote_qualified(Some("audit"), "history"),
            r#""audit"."history""#
        );
    }

    #[test]
    fn test_boolean_literals() {
        assert_eq!(DialectProfile::duckdb().boolean_literal(true), "true");
        assert_eq!(DialectProfile::sqlserver().boolean_literal(false), "0");
    }

    #[test]
    fn test_block_keywords_case_insensitive() {
        let d = DialectProfile::sqlserver();
        assert!(d.is_block_open("begin"));
        assert!(d.is_block_close("End"));
        assert!(!d.is_block_open("SELECT"));
    }

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal("plain"), "plain");
        assert_eq!(escape_literal("O'Brien"), "O''Brien");
    }

    #[test]
    fn test_sqlserver_default_delimiter_is_go() {
        let d = DialectProfile::sqlserver();
        assert_eq!(d.default_delimiter.token, "GO");
        assert!(d.default_delimiter.alone_on_line);
    }
}

//! sf-sql - SQL script splitting for Schemaflow
//!
//! Splits heterogeneous SQL scripts into executable statements without
//! parsing the SQL itself: only statement boundaries matter. Dialect
//! lexical rules (quoting, block keywords, delimiters) come from
//! `sf_core::DialectProfile`.

pub mod context;
pub mod error;
pub mod tokenizer;

pub use context::LexicalContext;
pub use error::{ScriptError, ScriptResult};
pub use tokenizer::{ScriptTokenizer, StatementFragment};

//! Error types for sf-sql

use thiserror::Error;

/// Script splitting errors
#[derive(Error, Debug)]
pub enum ScriptError {
    /// S001: internal consistency failure; aborts the current parse.
    /// This signals a tokenizer or dialect-rule defect, not malformed input.
    #[error("[S001] Parser bug: unable to decrease block depth below zero")]
    BlockDepthUnderflow,
}

/// Result type alias for ScriptError
pub type ScriptResult<T> = Result<T, ScriptError>;

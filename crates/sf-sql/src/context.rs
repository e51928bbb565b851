//! Mutable lexical parse state

use sf_core::Delimiter;

use crate::error::{ScriptError, ScriptResult};

/// State carried through a single pass over a script: parenthesis depth,
/// procedural block depth, and the active statement delimiter.
///
/// The delimiter may be replaced mid-script by a redefinition directive;
/// all subsequent scanning honors the latest value.
#[derive(Debug, Clone)]
pub struct LexicalContext {
    parens_depth: usize,
    block_depth: usize,
    delimiter: Delimiter,
}

impl LexicalContext {
    pub fn new(delimiter: Delimiter) -> Self {
        Self {
            parens_depth: 0,
            block_depth: 0,
            delimiter,
        }
    }

    pub fn increase_parens_depth(&mut self) {
        self.parens_depth += 1;
    }

    /// Stray closing parens saturate at zero; only block depth underflow is
    /// a consistency failure.
    pub fn decrease_parens_depth(&mut self) {
        self.parens_depth = self.parens_depth.saturating_sub(1);
    }

    pub fn parens_depth(&self) -> usize {
        self.parens_depth
    }

    pub fn increase_block_depth(&mut self) {
        self.block_depth += 1;
    }

    pub fn decrease_block_depth(&mut self) -> ScriptResult<()> {
        if self.block_depth == 0 {
            return Err(ScriptError::BlockDepthUnderflow);
        }
        self.block_depth -= 1;
        Ok(())
    }

    pub fn block_depth(&self) -> usize {
        self.block_depth
    }

    /// Whether a delimiter occurrence here would be a statement boundary.
    pub fn at_statement_level(&self) -> bool {
        self.parens_depth == 0 && self.block_depth == 0
    }

    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    pub fn set_delimiter(&mut self, delimiter: Delimiter) {
        self.delimiter = delimiter;
    }
}

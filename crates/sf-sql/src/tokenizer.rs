//! Statement tokenizer
//!
//! Single-pass, character-level scan that splits a script into statement
//! fragments at delimiter boundaries. String and comment literals are
//! consumed atomically, parenthesized and procedural-block regions suppress
//! delimiter recognition, and a `DELIMITER <token>` line (for dialects that
//! support it) swaps the active delimiter for the rest of the script.

use sf_core::{Delimiter, DialectProfile, QuoteStyle};

use crate::context::LexicalContext;
use crate::error::{ScriptError, ScriptResult};

/// One executable statement cut from a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFragment {
    /// The statement text, trimmed, without its terminating delimiter.
    pub sql: String,
    /// 1-based line of the fragment's first non-whitespace character.
    pub start_line: usize,
    /// The delimiter that was active when the fragment was closed.
    pub delimiter: Delimiter,
}

/// Lazy statement iterator over a script.
///
/// Restartable only by constructing a new tokenizer over the same input.
/// After an error the iterator is exhausted.
pub struct ScriptTokenizer<'a> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    line_start: bool,
    context: LexicalContext,
    profile: &'a DialectProfile,
    failed: bool,
}

impl<'a> ScriptTokenizer<'a> {
    pub fn new(script: &str, profile: &'a DialectProfile) -> Self {
        Self {
            chars: script.chars().collect(),
            pos: 0,
            line: 1,
            line_start: true,
            context: LexicalContext::new(profile.default_delimiter.clone()),
            profile,
            failed: false,
        }
    }

    /// Split the whole script eagerly.
    pub fn tokenize(script: &str, profile: &DialectProfile) -> ScriptResult<Vec<StatementFragment>> {
        ScriptTokenizer::new(script, profile).collect()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = *self.chars.get(self.pos)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.line_start = true;
        } else {
            self.line_start = false;
        }
        Some(c)
    }

    /// The rest of the current line, excluding the newline.
    fn current_line(&self) -> String {
        self.chars[self.pos..]
            .iter()
            .take_while(|&&c| c != '\n')
            .collect()
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Case-insensitive match of `token` at the current position, requiring
    /// a word boundary after alphanumeric tokens so `GO` never matches the
    /// start of `GOTO`.
    fn matches_token(&self, token: &str) -> bool {
        let mut offset = 0;
        for expected in token.chars() {
            match self.peek(offset) {
                Some(c) if c.eq_ignore_ascii_case(&expected) => offset += 1,
                _ => return false,
            }
        }
        if token.chars().last().is_some_and(|c| c.is_alphanumeric()) {
            if let Some(next) = self.peek(offset) {
                if next.is_alphanumeric() || next == '_' {
                    return false;
                }
            }
        }
        true
    }

    fn mark_content(&self, start_line: &mut Option<usize>) {
        if start_line.is_none() {
            *start_line = Some(self.line);
        }
    }

    fn push_char(&mut self, c: char, buf: &mut String, start_line: &mut Option<usize>) {
        if !c.is_whitespace() && start_line.is_none() {
            *start_line = Some(self.line);
        }
        buf.push(c);
        self.bump();
    }

    fn consume_line_comment(&mut self, buf: &mut String) {
        while let Some(c) = self.bump() {
            buf.push(c);
            if c == '\n' {
                break;
            }
        }
    }

    fn consume_block_comment(&mut self, buf: &mut String) {
        // Opening "/*" already verified by the caller.
        buf.push('/');
        buf.push('*');
        self.bump();
        self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            if self.peek(0) == Some('*') && self.peek(1) == Some('/') {
                buf.push('*');
                buf.push('/');
                self.bump();
                self.bump();
                depth -= 1;
            } else if self.peek(0) == Some('/') && self.peek(1) == Some('*') {
                buf.push('/');
                buf.push('*');
                self.bump();
                self.bump();
                depth += 1;
            } else {
                match self.bump() {
                    Some(c) => buf.push(c),
                    None => break,
                }
            }
        }
    }

    /// Consume a `'...'` literal, honoring the doubled-quote escape.
    /// An unterminated literal runs to end of input.
    fn consume_string(&mut self, buf: &mut String) {
        buf.push('\'');
        self.bump();
        while let Some(c) = self.bump() {
            buf.push(c);
            if c == '\'' {
                if self.peek(0) == Some('\'') {
                    buf.push('\'');
                    self.bump();
                } else {
                    break;
                }
            }
        }
    }

    /// Consume a quoted identifier for the dialect's quote style.
    fn consume_quoted_ident(&mut self, open: char, close: char, buf: &mut String) {
        buf.push(open);
        self.bump();
        while let Some(c) = self.bump() {
            buf.push(c);
            if c == close {
                if self.peek(0) == Some(close) {
                    buf.push(close);
                    self.bump();
                } else {
                    break;
                }
            }
        }
    }

    /// Try to consume a `$tag$ ... $tag$` literal. Returns false when the
    /// current `$` does not open a valid dollar quote.
    fn try_consume_dollar_quote(&mut self, buf: &mut String) -> bool {
        let mut tag = String::from("$");
        let mut offset = 1;
        loop {
            match self.peek(offset) {
                Some('$') => {
                    tag.push('$');
                    break;
                }
                Some(c) if c == '_' || c.is_alphabetic() || (offset > 1 && c.is_numeric()) => {
                    tag.push(c);
                    offset += 1;
                }
                _ => return false,
            }
        }

        for _ in 0..tag.chars().count() {
            if let Some(c) = self.bump() {
                buf.push(c);
            }
        }
        while self.pos < self.chars.len() {
            if self.matches_dollar_tag(&tag) {
                for _ in 0..tag.chars().count() {
                    if let Some(c) = self.bump() {
                        buf.push(c);
                    }
                }
                return true;
            }
            if let Some(c) = self.bump() {
                buf.push(c);
            }
        }
        true
    }

    fn matches_dollar_tag(&self, tag: &str) -> bool {
        tag.chars()
            .enumerate()
            .all(|(i, expected)| self.peek(i) == Some(expected))
    }

    /// `DELIMITER <token>` on a line of its own; returns the new token.
    fn parse_delimiter_directive(line: &str) -> Option<String> {
        let trimmed = line.trim();
        let keyword = trimmed.get(..9)?;
        if !keyword.eq_ignore_ascii_case("DELIMITER") {
            return None;
        }
        if !trimmed[9..].starts_with(|c: char| c.is_whitespace()) {
            return None;
        }
        let rest = trimmed[9..].trim();
        if rest.is_empty() || rest.chars().any(char::is_whitespace) {
            return None;
        }
        Some(rest.to_string())
    }

    fn consume_word(&mut self, buf: &mut String, start_line: &mut Option<usize>) -> String {
        let mut word = String::new();
        self.mark_content(start_line);
        while let Some(c) = self.peek(0) {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                buf.push(c);
                self.bump();
            } else {
                break;
            }
        }
        word
    }

    /// Emit the buffered text as a fragment, or nothing when it contains
    /// only whitespace and comments.
    fn emit(&self, buf: &mut String, start_line: &mut Option<usize>) -> Option<StatementFragment> {
        let text = std::mem::take(buf);
        let line = start_line.take();
        let trimmed = text.trim();
        if is_blank(trimmed) {
            return None;
        }
        Some(StatementFragment {
            sql: trimmed.to_string(),
            start_line: line.unwrap_or(self.line),
            delimiter: self.context.delimiter().clone(),
        })
    }

    fn next_fragment(&mut self) -> Option<ScriptResult<StatementFragment>> {
        if self.failed {
            return None;
        }

        let mut buf = String::new();
        let mut start_line: Option<usize> = None;

        loop {
            if self.pos >= self.chars.len() {
                // Trailing delimiter is optional at end of input.
                return self.emit(&mut buf, &mut start_line).map(Ok);
            }

            if self.line_start {
                let line = self.current_line();
                if self.profile.supports_delimiter_directive {
                    if let Some(token) = Self::parse_delimiter_directive(&line) {
                        self.context.set_delimiter(Delimiter::new(token, false));
                        self.skip_line();
                        continue;
                    }
                }
                if self.context.at_statement_level() && self.context.delimiter().matches_line(&line)
                {
                    self.skip_line();
                    match self.emit(&mut buf, &mut start_line) {
                        Some(fragment) => return Some(Ok(fragment)),
                        None => continue,
                    }
                }
                self.line_start = false;
            }

            let delimiter = self.context.delimiter().clone();
            if !delimiter.alone_on_line
                && self.context.at_statement_level()
                && self.matches_token(&delimiter.token)
            {
                for _ in 0..delimiter.token.chars().count() {
                    self.bump();
                }
                match self.emit(&mut buf, &mut start_line) {
                    Some(fragment) => return Some(Ok(fragment)),
                    None => continue,
                }
            }

            let Some(c) = self.peek(0) else {
                continue;
            };

            match c {
                '-' if self.peek(1) == Some('-') => {
                    self.mark_content(&mut start_line);
                    self.consume_line_comment(&mut buf);
                }
                '/' if self.peek(1) == Some('*') => {
                    self.mark_content(&mut start_line);
                    self.consume_block_comment(&mut buf);
                }
                '\'' => {
                    self.mark_content(&mut start_line);
                    self.consume_string(&mut buf);
                }
                '$' if self.profile.supports_dollar_quotes => {
                    self.mark_content(&mut start_line);
                    if !self.try_consume_dollar_quote(&mut buf) {
                        self.push_char('$', &mut buf, &mut start_line);
                    }
                }
                '"' if self.profile.quote_style == QuoteStyle::DoubleQuote => {
                    self.mark_content(&mut start_line);
                    self.consume_quoted_ident('"', '"', &mut buf);
                }
                '[' if self.profile.quote_style == QuoteStyle::Brackets => {
                    self.mark_content(&mut start_line);
                    self.consume_quoted_ident('[', ']', &mut buf);
                }
                '`' if self.profile.quote_style == QuoteStyle::Backticks => {
                    self.mark_content(&mut start_line);
                    self.consume_quoted_ident('`', '`', &mut buf);
                }
                '(' => {
                    self.context.increase_parens_depth();
                    self.push_char('(', &mut buf, &mut start_line);
                }
                ')' => {
                    self.context.decrease_parens_depth();
                    self.push_char(')', &mut buf, &mut start_line);
                }
                c if c.is_alphabetic() || c == '_' => {
                    let word = self.consume_word(&mut buf, &mut start_line);
                    if self.profile.is_block_open(&word) {
                        self.context.increase_block_depth();
                    } else if self.profile.is_block_close(&word) {
                        if let Err(err) = self.context.decrease_block_depth() {
                            self.failed = true;
                            return Some(Err(err));
                        }
                    }
                }
                c => {
                    self.push_char(c, &mut buf, &mut start_line);
                }
            }
        }
    }
}

impl Iterator for ScriptTokenizer<'_> {
    type Item = ScriptResult<StatementFragment>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_fragment()
    }
}

/// Whether trimmed statement text holds nothing but whitespace and comments.
fn is_blank(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '-' && chars.get(i + 1) == Some(&'-') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            let mut depth = 0usize;
            loop {
                if i + 1 < chars.len() && chars[i] == '/' && chars[i + 1] == '*' {
                    depth += 1;
                    i += 2;
                } else if i + 1 < chars.len() && chars[i] == '*' && chars[i + 1] == '/' {
                    depth -= 1;
                    i += 2;
                    if depth == 0 {
                        break;
                    }
                } else if i >= chars.len() {
                    break;
                } else {
                    i += 1;
                }
            }
        } else {
            return false;
        }
    }
    true
}

#[cfg(test)]
#[path = "tokenizer_test.rs"]
mod tests;

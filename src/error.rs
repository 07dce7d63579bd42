//! Error and diagnostics layer.
//!
//! One error type, two severities: user-facing parse errors (bad input
//! shape, always actionable, always carrying a corrective usage example
//! where one exists) and internal errors (invariants the parser itself
//! should have guaranteed, phrased as a tool defect rather than a usage
//! mistake).
//!
//! Line and column numbers are 1-based throughout the crate, matching
//! editor conventions. Position fields are `None` when no offending node
//! was available.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    ParseError,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserError {
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl ParserError {
    /// User parse error with no position (no offending node available).
    pub fn parse(message: impl Into<String>, file: &str) -> Self {
        ParserError {
            severity: Severity::ParseError,
            message: message.into(),
            file: file.to_string(),
            line: None,
            column: None,
        }
    }

    /// User parse error positioned at a byte offset into `source`.
    pub fn parse_at(message: impl Into<String>, file: &str, source: &str, offset: u32) -> Self {
        let (line, column) = line_col(source, offset);
        ParserError {
            severity: Severity::ParseError,
            message: message.into(),
            file: file.to_string(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Internal invariant violation positioned at a byte offset.
    pub fn internal_at(message: impl Into<String>, file: &str, source: &str, offset: u32) -> Self {
        let (line, column) = line_col(source, offset);
        ParserError {
            severity: Severity::InternalError,
            message: message.into(),
            file: file.to_string(),
            line: Some(line),
            column: Some(column),
        }
    }

    pub fn internal(message: impl Into<String>, file: &str) -> Self {
        ParserError {
            severity: Severity::InternalError,
            message: message.into(),
            file: file.to_string(),
            line: None,
            column: None,
        }
    }
}

impl std::fmt::Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.severity {
            Severity::ParseError => "Parse error",
            Severity::InternalError => "Internal error (this is a bug in the tool)",
        };
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(f, "{}: {} ({}:{}:{})", kind, self.message, self.file, line, column)
            }
            _ => write!(f, "{}: {} ({})", kind, self.message, self.file),
        }
    }
}

impl std::error::Error for ParserError {}

/// Non-fatal diagnostic collected during a parse. Currently only emitted
/// when component symbol resolution fails and the parse degrades to an
/// empty-metadata result instead of aborting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub message: String,
    pub file: String,
}

impl ParseWarning {
    pub fn new(message: impl Into<String>, file: impl Into<String>) -> Self {
        ParseWarning {
            message: message.into(),
            file: file.into(),
        }
    }
}

/// 1-based line and column for a byte offset into `source`.
pub fn line_col(source: &str, offset: u32) -> (u32, u32) {
    let offset = (offset as usize).min(source.len());
    let before = &source[..offset];
    let line = before.bytes().filter(|b| *b == b'\n').count() as u32 + 1;
    let column = match before.rfind('\n') {
        Some(idx) => (offset - idx - 1) as u32 + 1,
        None => offset as u32 + 1,
    };
    (line, column)
}

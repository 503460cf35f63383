//! phplex_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Lexical errors never abort a scan. The scanner hands each one to a
//! [`DiagnosticSink`] as a [`Diagnostic`] carrying the position of the
//! offending lexeme and a message from the [`messages`] catalog.

mod sink;

pub use sink::{DiagnosticSink, StderrSink, WriterSink};

use phplex_core::{LineAndColumn, TextSpan};
use serde::Serialize;
use std::fmt;

/// A diagnostic message template with a code.
///
/// Every catalog entry is an error; nothing the scanner reports is merely
/// advisory.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code, printed as `PL<code>`.
    pub code: u32,
    /// The message text.
    pub message: &'static str,
}

/// The lexical error taxonomy.
///
/// Both kinds are non-fatal: the offending lexeme is dropped from the token
/// sequence and the scan carries on from wherever the cursor stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
pub enum LexErrorKind {
    /// An opening quote with no matching closing quote before end of input.
    #[error("{}", messages::UNTERMINATED_STRING.message)]
    UnterminatedString,
    /// An opening `/*` with no matching `*/` before end of input.
    #[error("{}", messages::UNTERMINATED_BLOCK_COMMENT.message)]
    UnterminatedBlockComment,
}

impl LexErrorKind {
    /// The catalog entry for this kind of error.
    pub fn message(self) -> &'static DiagnosticMessage {
        match self {
            LexErrorKind::UnterminatedString => &messages::UNTERMINATED_STRING,
            LexErrorKind::UnterminatedBlockComment => &messages::UNTERMINATED_BLOCK_COMMENT,
        }
    }
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// The diagnostic code.
    pub code: u32,
    /// The resolved message text.
    pub message_text: String,
    /// 1-based line of the start of the offending lexeme.
    pub line: u32,
    /// 1-based column of the start of the offending lexeme.
    pub column: u32,
    /// Bytes consumed while trying to complete the lexeme.
    pub span: TextSpan,
}

impl Diagnostic {
    /// Create a lexical diagnostic for a lexeme starting at `position`.
    pub fn lexical(kind: LexErrorKind, position: LineAndColumn, span: TextSpan) -> Self {
        let message = kind.message();
        Self {
            kind,
            code: message.code,
            message_text: message.message.to_string(),
            line: position.line,
            column: position.column,
            span,
        }
    }

    /// The start position of the offending lexeme.
    pub fn position(&self) -> LineAndColumn {
        LineAndColumn::new(self.line, self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexical Error ({}:{}): {}",
            self.line, self.column, self.message_text
        )
    }
}

/// A collection of diagnostics accumulated during a scan.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $msg:expr) => {
            DiagnosticMessage { code: $code, message: $msg }
        };
    }

    // Scanner errors (1000-1099)
    pub const UNTERMINATED_STRING: DiagnosticMessage = diag!(1001, "Unterminated string");
    pub const UNTERMINATED_BLOCK_COMMENT: DiagnosticMessage = diag!(1002, "Unterminated block comment");
}

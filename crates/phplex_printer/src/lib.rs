//! phplex_printer: Reports over a scanned token sequence.
//!
//! The text report is a flat token table followed by a hierarchy view that
//! prints every lexeme on its own line, indented by the bracket nesting seen
//! so far. The JSON report carries the tokens together with the diagnostics.

use phplex_diagnostics::DiagnosticCollection;
use phplex_scanner::{ScanResult, Token, TokenSequence};
use serde::Serialize;
use std::io::{self, Write};

/// First line of the hierarchy view.
pub const HIERARCHY_HEADER: &str = "--- Hierarchical Structure ---";
/// Last line of the hierarchy view.
pub const HIERARCHY_FOOTER: &str = "-----------------------------";

const INDENT: &str = "  ";

/// Errors raised while writing a report.
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format of [`write_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Options for [`write_report`].
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub format: ReportFormat,
    /// Print the token table (text format only).
    pub show_table: bool,
    /// Print the hierarchy view (text format only).
    pub show_hierarchy: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            show_table: true,
            show_hierarchy: true,
        }
    }
}

/// Write the report for a finished scan.
pub fn write_report<W: Write>(
    result: &ScanResult,
    mut writer: W,
    options: &ReportOptions,
) -> Result<(), PrintError> {
    match options.format {
        ReportFormat::Text => {
            if options.show_table {
                write_token_table(&result.tokens, &mut writer)?;
            }
            if options.show_hierarchy {
                if options.show_table {
                    writeln!(writer)?;
                }
                write_hierarchy(&result.tokens, &mut writer)?;
            }
        }
        ReportFormat::Json => {
            let report = JsonReport {
                tokens: &result.tokens,
                diagnostics: &result.diagnostics,
            };
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    tokens: &'a TokenSequence,
    diagnostics: &'a DiagnosticCollection,
}

/// One `Token(<Kind>, "<lexeme>", Line: <l>, Col: <c>)` line per token.
///
/// Lexemes are printed raw: quotes and newlines inside them are not escaped.
pub fn write_token_table<W: Write>(tokens: &TokenSequence, mut writer: W) -> Result<(), PrintError> {
    for token in tokens {
        writeln!(
            writer,
            "Token({}, \"{}\", Line: {}, Col: {})",
            token.kind(),
            token.lexeme(),
            token.line(),
            token.column()
        )?;
    }
    Ok(())
}

/// Every lexeme on its own line, two spaces per indentation level, between
/// a header and a footer line.
pub fn write_hierarchy<W: Write>(tokens: &TokenSequence, mut writer: W) -> Result<(), PrintError> {
    writeln!(writer, "{HIERARCHY_HEADER}")?;
    for (token, level) in tokens.iter().zip(indentation_levels(tokens)) {
        writeln!(writer, "{}{}", INDENT.repeat(level), token.lexeme())?;
    }
    writeln!(writer, "{HIERARCHY_FOOTER}")?;
    Ok(())
}

/// The indentation level each token prints at in the hierarchy view.
pub fn indentation_levels(tokens: &TokenSequence) -> Vec<usize> {
    let mut nesting = Nesting::default();
    tokens.iter().map(|token| nesting.level_for(token)).collect()
}

/// Running bracket depth.
///
/// Openers print at the current level and then indent; closers dedent
/// first. The test is on the lexeme text alone, so a string literal whose
/// content is `{` counts as an opener. The depth is signed: a stray closer
/// takes it below zero, and negative depths print without indentation.
#[derive(Debug, Default)]
struct Nesting {
    depth: isize,
}

impl Nesting {
    fn level_for(&mut self, token: &Token) -> usize {
        match token.lexeme() {
            "{" | "(" => {
                let level = self.level();
                self.depth += 1;
                level
            }
            "}" | ")" => {
                self.depth -= 1;
                self.level()
            }
            _ => self.level(),
        }
    }

    fn level(&self) -> usize {
        self.depth.max(0) as usize
    }
}

//! Tokens and the sequence a scan produces.

use phplex_core::{LineAndColumn, TextSpan};
use serde::Serialize;
use std::fmt;

/// Every kind of token the scanner can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    /// An identifier-shaped lexeme found in the keyword set.
    Keyword,
    IntegerLiteral,
    /// Digits followed by `.`, with or without fractional digits.
    FloatLiteral,
    /// A run of text outside any code region.
    #[serde(rename = "HTMLText")]
    HtmlText,
    /// Quoted text; the lexeme excludes the quotes.
    StringLiteral,
    /// A single operator character.
    Operator,
    /// One of `( ) { } [ ] ; , .`
    Separator,
    /// A line or block comment; the lexeme excludes the comment markers.
    Comment,
    Whitespace,
    /// `<?php`
    #[serde(rename = "PHPTagOpen")]
    PhpTagOpen,
    /// `?>`
    #[serde(rename = "PHPTagClose")]
    PhpTagClose,
    /// `$` followed by an identifier; the lexeme includes the `$`.
    Variable,
    /// Reserved; the recognizer falls back to `Operator` instead.
    Unknown,
}

impl TokenKind {
    /// The spelling used in reports.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "Identifier",
            TokenKind::Keyword => "Keyword",
            TokenKind::IntegerLiteral => "IntegerLiteral",
            TokenKind::FloatLiteral => "FloatLiteral",
            TokenKind::HtmlText => "HTMLText",
            TokenKind::StringLiteral => "StringLiteral",
            TokenKind::Operator => "Operator",
            TokenKind::Separator => "Separator",
            TokenKind::Comment => "Comment",
            TokenKind::Whitespace => "Whitespace",
            TokenKind::PhpTagOpen => "PHPTagOpen",
            TokenKind::PhpTagClose => "PHPTagClose",
            TokenKind::Variable => "Variable",
            TokenKind::Unknown => "Unknown",
        }
    }

    /// Whether the lexeme of this kind drops delimiters that were consumed
    /// from the source.
    pub fn strips_delimiters(self) -> bool {
        matches!(self, TokenKind::StringLiteral | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One lexical unit.
///
/// `line` and `column` locate the first character consumed for the token.
/// `span` covers every byte consumed for it, delimiters included, so for
/// string literals and comments the span is wider than the lexeme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    line: u32,
    column: u32,
    span: TextSpan,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, start: LineAndColumn, span: TextSpan) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line: start.line,
            column: start.column,
            span,
        }
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[inline]
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[inline]
    pub fn position(&self) -> LineAndColumn {
        LineAndColumn::new(self.line, self.column)
    }

    #[inline]
    pub fn span(&self) -> TextSpan {
        self.span
    }

    /// The raw text this token was scanned from.
    ///
    /// Returns `None` if `source` is not the buffer the token came from.
    pub fn source_text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.span.to_range())
    }
}

/// The tokens of one scan, in emission order.
///
/// Only the scanner appends; consumers get a read-only view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenSequence {
    tokens: Vec<Token>,
}

impl TokenSequence {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub(crate) fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_vec(self) -> Vec<Token> {
        self.tokens
    }

    /// The kind of every token, in order.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(Token::kind).collect()
    }

    /// All lexemes joined in order.
    ///
    /// Equals the scanned input when no lexical error occurred and no token
    /// [strips delimiters](TokenKind::strips_delimiters).
    pub fn concat_lexemes(&self) -> String {
        self.tokens.iter().map(Token::lexeme).collect()
    }
}

impl FromIterator<Token> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        let mut sequence = TokenSequence::new();
        for token in iter {
            sequence.push(token);
        }
        sequence
    }
}

impl IntoIterator for TokenSequence {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, lexeme: &str, start: u32, end: u32) -> Token {
        Token::new(kind, lexeme, LineAndColumn::new(1, start + 1), TextSpan::from_bounds(start, end))
    }

    #[test]
    fn test_kind_names_match_report_spelling() {
        assert_eq!(TokenKind::HtmlText.to_string(), "HTMLText");
        assert_eq!(TokenKind::PhpTagOpen.name(), "PHPTagOpen");
        assert_eq!(TokenKind::PhpTagClose.name(), "PHPTagClose");
        assert_eq!(TokenKind::IntegerLiteral.name(), "IntegerLiteral");
    }

    #[test]
    fn test_source_text_includes_delimiters() {
        let source = "'abc'";
        let tok = token(TokenKind::StringLiteral, "abc", 0, 5);
        assert_eq!(tok.lexeme(), "abc");
        assert_eq!(tok.source_text(source), Some("'abc'"));
        assert_eq!(tok.source_text("x"), None);
    }

    #[test]
    fn test_sequence_collects_in_order() {
        let seq: TokenSequence = vec![
            token(TokenKind::Variable, "$a", 0, 2),
            token(TokenKind::Operator, "=", 2, 3),
            token(TokenKind::IntegerLiteral, "1", 3, 4),
        ]
        .into_iter()
        .collect();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.concat_lexemes(), "$a=1");
        assert_eq!(
            seq.kinds(),
            vec![TokenKind::Variable, TokenKind::Operator, TokenKind::IntegerLiteral]
        );
        assert_eq!(seq.get(1).map(Token::lexeme), Some("="));
    }

    #[test]
    fn test_serialized_kind_uses_report_spelling() {
        let json = serde_json::to_string(&TokenKind::HtmlText).unwrap();
        assert_eq!(json, "\"HTMLText\"");
    }
}

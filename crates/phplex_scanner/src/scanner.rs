//! The mixed-mode scanner.
//!
//! Each top-level iteration first checks the mode switch (`<?php` while in
//! literal text, `?>` while in code). Without a transition, literal text is
//! consumed up to the next open tag as one token, or the recognizer runs on
//! the code region and produces exactly one token.
//!
//! The recognizer is an explicit state machine: [`State`] names the states,
//! and each state has its own transition method returning the next [`Step`].

use crate::char_codes::*;
use crate::cursor::{Mode, ScanCursor};
use crate::keywords::is_keyword;
use crate::token::{Token, TokenKind, TokenSequence};
use phplex_core::{text_pos, LineAndColumn, TextSpan};
use phplex_diagnostics::{Diagnostic, DiagnosticCollection, DiagnosticSink, LexErrorKind};

/// Marker that opens a code region.
pub const OPEN_TAG: &str = "<?php";
/// Marker that closes a code region.
pub const CLOSE_TAG: &str = "?>";

const LINE_COMMENT_START: &str = "//";
const BLOCK_COMMENT_START: &str = "/*";
const BLOCK_COMMENT_END: &str = "*/";

/// States of the code-region recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Dispatch on the first character of the lexeme.
    Start,
    Whitespace,
    Identifier,
    Number,
    FloatFraction,
    String,
    VariableStart,
    VariableName,
    LineCommentStart,
    LineComment,
    BlockCommentStart,
    BlockComment,
    Separator,
    Operator,
}

/// Outcome of one state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Continue in another state.
    Next(State),
    /// The lexeme is complete: a token was emitted or an error was reported.
    Accept,
}

/// Where the lexeme being recognized started.
#[derive(Debug, Clone, Copy)]
struct LexemeStart {
    pos: usize,
    position: LineAndColumn,
}

/// Tokens and diagnostics of a scan that collected its diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub tokens: TokenSequence,
    pub diagnostics: DiagnosticCollection,
}

/// Scan `source`, collecting diagnostics alongside the tokens.
pub fn tokenize(source: &str) -> ScanResult {
    let mut diagnostics = DiagnosticCollection::new();
    let tokens = tokenize_with_sink(source, &mut diagnostics);
    ScanResult {
        tokens,
        diagnostics,
    }
}

/// Scan `source`, reporting diagnostics to `sink` as they are found.
pub fn tokenize_with_sink(source: &str, sink: &mut dyn DiagnosticSink) -> TokenSequence {
    Scanner::new(source, sink).scan_all()
}

/// Converts a buffer of mixed literal text and code into tokens.
///
/// Spans and positions are exact for buffers of up to
/// [`MAX_TEXT_LEN`](phplex_core::MAX_TEXT_LEN) bytes; callers loading input
/// from outside reject anything longer.
///
/// The scanner owns its cursor and the token sequence being built; both are
/// released only when the scan finishes.
pub struct Scanner<'src, S> {
    cursor: ScanCursor<'src>,
    tokens: TokenSequence,
    sink: S,
    error_count: usize,
}

impl<'src, S: DiagnosticSink> Scanner<'src, S> {
    /// Create a scanner positioned at the start of `source`, in literal-text
    /// mode.
    pub fn new(source: &'src str, sink: S) -> Self {
        Self {
            cursor: ScanCursor::new(source),
            tokens: TokenSequence::new(),
            sink,
            error_count: 0,
        }
    }

    /// The current mode.
    pub fn mode(&self) -> Mode {
        self.cursor.mode()
    }

    /// Position of the next unconsumed character.
    pub fn position(&self) -> LineAndColumn {
        self.cursor.position()
    }

    /// Whether the whole buffer has been consumed.
    pub fn is_finished(&self) -> bool {
        self.cursor.is_eof()
    }

    /// Tokens emitted so far.
    pub fn tokens(&self) -> &TokenSequence {
        &self.tokens
    }

    /// Number of lexical errors reported so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Run the scan to the end of input and return the tokens.
    pub fn scan_all(self) -> TokenSequence {
        self.finish().0
    }

    /// Run the scan to the end of input and return the tokens together with
    /// the sink.
    pub fn finish(mut self) -> (TokenSequence, S) {
        let _span = tracing::debug_span!("scan", bytes = self.cursor.rest().len()).entered();
        while self.scan_next() {}
        tracing::debug!(
            tokens = self.tokens.len(),
            errors = self.error_count,
            mode = ?self.cursor.mode(),
            "scan finished"
        );
        (self.tokens, self.sink)
    }

    /// Run one top-level iteration.
    ///
    /// Returns `false` once the end of input has been reached.
    pub fn scan_next(&mut self) -> bool {
        if self.cursor.is_eof() {
            return false;
        }
        let start = self.lexeme_start();
        if self.switch_mode(start) {
            return true;
        }
        match self.cursor.mode() {
            Mode::LiteralText => self.scan_literal_text(start),
            Mode::Code => self.scan_code_token(start),
        }
        true
    }

    // ========================================================================
    // Mode switch and literal text
    // ========================================================================

    /// Consume an open or close marker if one starts at the cursor, flipping
    /// the mode and emitting the marker token.
    fn switch_mode(&mut self, start: LexemeStart) -> bool {
        let (marker, kind, next_mode) = match self.cursor.mode() {
            Mode::LiteralText => (OPEN_TAG, TokenKind::PhpTagOpen, Mode::Code),
            Mode::Code => (CLOSE_TAG, TokenKind::PhpTagClose, Mode::LiteralText),
        };
        if !self.cursor.eat(marker) {
            return false;
        }
        self.cursor.set_mode(next_mode);
        tracing::trace!(
            line = start.position.line,
            column = start.position.column,
            mode = ?next_mode,
            "mode switch"
        );
        self.emit(kind, start, start.pos, self.cursor.pos());
        true
    }

    /// Consume everything up to the next open marker as one `HTMLText` token.
    fn scan_literal_text(&mut self, start: LexemeStart) {
        let end = self.cursor.find(OPEN_TAG).unwrap_or(usize::MAX);
        self.cursor.advance_to(end);
        if self.cursor.pos() > start.pos {
            self.emit(TokenKind::HtmlText, start, start.pos, self.cursor.pos());
        }
    }

    // ========================================================================
    // Recognizer
    // ========================================================================

    /// Recognize one lexeme of the code region.
    fn scan_code_token(&mut self, start: LexemeStart) {
        let mut state = State::Start;
        while let Step::Next(next) = self.step(state, start) {
            state = next;
        }
    }

    fn step(&mut self, state: State, start: LexemeStart) -> Step {
        match state {
            State::Start => self.dispatch(),
            State::Whitespace => self.scan_whitespace(start),
            State::Identifier => self.scan_identifier(start),
            State::Number => self.scan_number(start),
            State::FloatFraction => self.scan_float_fraction(start),
            State::String => self.scan_string(start),
            State::VariableStart => self.scan_variable_start(start),
            State::VariableName => self.scan_variable_name(start),
            State::LineCommentStart => self.enter_comment(LINE_COMMENT_START, State::LineComment),
            State::LineComment => self.scan_line_comment(start),
            State::BlockCommentStart => self.enter_comment(BLOCK_COMMENT_START, State::BlockComment),
            State::BlockComment => self.scan_block_comment(start),
            State::Separator => self.scan_single(TokenKind::Separator, start),
            State::Operator => self.scan_single(TokenKind::Operator, start),
        }
    }

    /// Pick the state for the lexeme starting at the cursor.
    fn dispatch(&mut self) -> Step {
        let Some(ch) = self.cursor.peek() else {
            return Step::Accept;
        };
        let next = match ch {
            c if is_white_space(c) => State::Whitespace,
            c if is_identifier_start(c) => State::Identifier,
            c if is_digit(c) => State::Number,
            c if is_quote(c) => State::String,
            DOLLAR_SIGN => State::VariableStart,
            SLASH if self.cursor.peek_next() == Some(SLASH) => State::LineCommentStart,
            SLASH if self.cursor.peek_next() == Some(ASTERISK) => State::BlockCommentStart,
            c if is_separator(c) => State::Separator,
            _ => State::Operator,
        };
        Step::Next(next)
    }

    fn scan_whitespace(&mut self, start: LexemeStart) -> Step {
        self.cursor.eat_while(is_white_space);
        self.emit(TokenKind::Whitespace, start, start.pos, self.cursor.pos());
        Step::Accept
    }

    fn scan_identifier(&mut self, start: LexemeStart) -> Step {
        self.cursor.eat_while(is_identifier_part);
        let text = self.cursor.slice(start.pos, self.cursor.pos());
        let kind = if is_keyword(text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.emit(kind, start, start.pos, self.cursor.pos());
        Step::Accept
    }

    fn scan_number(&mut self, start: LexemeStart) -> Step {
        self.cursor.eat_while(is_digit);
        if self.cursor.peek() == Some(DOT) {
            self.cursor.advance();
            return Step::Next(State::FloatFraction);
        }
        self.emit(TokenKind::IntegerLiteral, start, start.pos, self.cursor.pos());
        Step::Accept
    }

    /// Digits after the dot; there may be none (`5.`).
    fn scan_float_fraction(&mut self, start: LexemeStart) -> Step {
        self.cursor.eat_while(is_digit);
        self.emit(TokenKind::FloatLiteral, start, start.pos, self.cursor.pos());
        Step::Accept
    }

    /// Raw characters up to the matching quote. No escape processing: a
    /// backslash is an ordinary character.
    fn scan_string(&mut self, start: LexemeStart) -> Step {
        let Some(quote) = self.cursor.advance() else {
            return Step::Accept;
        };
        let content_start = self.cursor.pos();
        self.cursor.eat_while(|c| c != quote);
        let content_end = self.cursor.pos();
        if self.cursor.advance() == Some(quote) {
            self.emit(TokenKind::StringLiteral, start, content_start, content_end);
        } else {
            self.report(LexErrorKind::UnterminatedString, start);
        }
        Step::Accept
    }

    fn scan_variable_start(&mut self, start: LexemeStart) -> Step {
        self.cursor.advance();
        if self.cursor.peek().is_some_and(is_identifier_start) {
            return Step::Next(State::VariableName);
        }
        self.emit(TokenKind::Operator, start, start.pos, self.cursor.pos());
        Step::Accept
    }

    fn scan_variable_name(&mut self, start: LexemeStart) -> Step {
        self.cursor.eat_while(is_identifier_part);
        self.emit(TokenKind::Variable, start, start.pos, self.cursor.pos());
        Step::Accept
    }

    fn enter_comment(&mut self, marker: &str, body: State) -> Step {
        self.cursor.eat(marker);
        Step::Next(body)
    }

    /// Everything up to, not including, the line feed.
    fn scan_line_comment(&mut self, start: LexemeStart) -> Step {
        let content_start = self.cursor.pos();
        self.cursor.eat_while(|c| c != LINE_FEED);
        self.emit(TokenKind::Comment, start, content_start, self.cursor.pos());
        Step::Accept
    }

    fn scan_block_comment(&mut self, start: LexemeStart) -> Step {
        let content_start = self.cursor.pos();
        match self.cursor.find(BLOCK_COMMENT_END) {
            Some(content_end) => {
                self.cursor.advance_to(content_end);
                self.cursor.eat(BLOCK_COMMENT_END);
                self.emit(TokenKind::Comment, start, content_start, content_end);
            }
            None => {
                self.cursor.advance_to(usize::MAX);
                self.report(LexErrorKind::UnterminatedBlockComment, start);
            }
        }
        Step::Accept
    }

    /// Exactly one character; operators never combine.
    fn scan_single(&mut self, kind: TokenKind, start: LexemeStart) -> Step {
        self.cursor.advance();
        self.emit(kind, start, start.pos, self.cursor.pos());
        Step::Accept
    }

    // ========================================================================
    // Emission
    // ========================================================================

    fn lexeme_start(&self) -> LexemeStart {
        LexemeStart {
            pos: self.cursor.pos(),
            position: self.cursor.position(),
        }
    }

    /// Append a token whose lexeme is `lexeme_start..lexeme_end` and whose
    /// span runs from the start of the lexeme to the cursor.
    fn emit(&mut self, kind: TokenKind, start: LexemeStart, lexeme_start: usize, lexeme_end: usize) {
        debug_assert!(self
            .tokens
            .last()
            .map_or(true, |last| last.span().end() as usize <= start.pos));
        let lexeme = self.cursor.slice(lexeme_start, lexeme_end);
        let span = TextSpan::from_bounds(text_pos(start.pos), self.cursor.text_pos());
        self.tokens.push(Token::new(kind, lexeme, start.position, span));
    }

    /// Report a lexical error for the lexeme at `start`. No token is emitted.
    fn report(&mut self, kind: LexErrorKind, start: LexemeStart) {
        self.error_count += 1;
        let span = TextSpan::from_bounds(text_pos(start.pos), self.cursor.text_pos());
        tracing::debug!(
            line = start.position.line,
            column = start.position.column,
            "lexical error: {kind}"
        );
        self.sink.report(Diagnostic::lexical(kind, start.position, span));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .tokens
            .into_iter()
            .map(|t| (t.kind(), t.lexeme().to_string()))
            .collect()
    }

    fn code_kinds(code: &str) -> Vec<TokenKind> {
        let source = format!("{OPEN_TAG}{code}");
        tokenize(&source).tokens.kinds()[1..].to_vec()
    }

    #[test]
    fn test_empty_source() {
        let result = tokenize("");
        assert!(result.tokens.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_literal_text_only() {
        let tokens = scan("<html>\n  <body></body>\n</html>\n");
        assert_eq!(
            tokens,
            vec![(TokenKind::HtmlText, "<html>\n  <body></body>\n</html>\n".to_string())]
        );
    }

    #[test]
    fn test_simple_statement() {
        let tokens = scan("<?php $x = 5; ?>");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::PhpTagOpen, "<?php".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Variable, "$x".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Operator, "=".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::IntegerLiteral, "5".to_string()),
                (TokenKind::Separator, ";".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::PhpTagClose, "?>".to_string()),
            ]
        );
    }

    #[test]
    fn test_dispatch_per_first_character() {
        assert_eq!(code_kinds(" \t"), vec![TokenKind::Whitespace]);
        assert_eq!(code_kinds("_a1"), vec![TokenKind::Identifier]);
        assert_eq!(code_kinds("while"), vec![TokenKind::Keyword]);
        assert_eq!(code_kinds("42"), vec![TokenKind::IntegerLiteral]);
        assert_eq!(code_kinds("4.2"), vec![TokenKind::FloatLiteral]);
        assert_eq!(code_kinds("'s'"), vec![TokenKind::StringLiteral]);
        assert_eq!(code_kinds("$v"), vec![TokenKind::Variable]);
        assert_eq!(code_kinds("// c"), vec![TokenKind::Comment]);
        assert_eq!(code_kinds("/* c */"), vec![TokenKind::Comment]);
        assert_eq!(code_kinds("["), vec![TokenKind::Separator]);
        assert_eq!(code_kinds("/"), vec![TokenKind::Operator]);
    }

    #[test]
    fn test_operators_never_combine() {
        assert_eq!(
            code_kinds("=>"),
            vec![TokenKind::Operator, TokenKind::Operator]
        );
        assert_eq!(
            code_kinds("!=="),
            vec![TokenKind::Operator, TokenKind::Operator, TokenKind::Operator]
        );
    }

    #[test]
    fn test_positions_follow_newlines() {
        let result = tokenize("a\n<?php\n  $b");
        let positions: Vec<_> = result
            .tokens
            .iter()
            .map(|t| (t.kind(), t.line(), t.column()))
            .collect();
        assert_eq!(
            positions,
            vec![
                (TokenKind::HtmlText, 1, 1),
                (TokenKind::PhpTagOpen, 2, 1),
                (TokenKind::Whitespace, 2, 6),
                (TokenKind::Variable, 3, 3),
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment_is_reported() {
        let result = tokenize("<?php /* open");
        assert_eq!(
            result.tokens.kinds(),
            vec![TokenKind::PhpTagOpen, TokenKind::Whitespace]
        );
        let diags = result.diagnostics.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, LexErrorKind::UnterminatedBlockComment);
        assert_eq!((diags[0].line, diags[0].column), (1, 7));
        assert_eq!(diags[0].span, TextSpan::from_bounds(6, 13));
    }

    #[test]
    fn test_scan_next_steps_one_token_at_a_time() {
        let mut scanner = Scanner::new("<p><?php 1", DiagnosticCollection::new());
        assert_eq!(scanner.mode(), Mode::LiteralText);
        assert!(scanner.scan_next());
        assert_eq!(scanner.tokens().len(), 1);
        assert!(scanner.scan_next());
        assert_eq!(scanner.mode(), Mode::Code);
        assert!(scanner.scan_next());
        assert!(scanner.scan_next());
        assert!(scanner.is_finished());
        assert!(!scanner.scan_next());
        let (tokens, diags) = scanner.finish();
        assert_eq!(tokens.len(), 4);
        assert!(diags.is_empty());
    }
}

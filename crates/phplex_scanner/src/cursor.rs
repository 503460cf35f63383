//! Position state over the scanned buffer.

use crate::char_codes::LINE_FEED;
use phplex_core::{text_pos, LineAndColumn, TextPos};
use serde::Serialize;

/// Which kind of region the cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mode {
    /// Outside any `<?php ... ?>` pair; text is copied verbatim.
    LiteralText,
    /// Inside a code region; text is split into lexemes.
    Code,
}

/// Cursor over the input buffer.
///
/// Tracks the byte offset together with the 1-based line and column of the
/// next character, plus the current [`Mode`]. Positions are exact for
/// buffers up to [`MAX_TEXT_LEN`](phplex_core::MAX_TEXT_LEN) bytes and
/// saturate beyond it. Every movement goes through
/// [`advance`](Self::advance) or [`advance_to`](Self::advance_to) so that
/// line and column always agree with the byte offset.
#[derive(Debug, Clone)]
pub struct ScanCursor<'src> {
    text: &'src str,
    pos: usize,
    line: u32,
    column: u32,
    mode: Mode,
}

impl<'src> ScanCursor<'src> {
    /// Create a cursor at the start of `text`, in literal-text mode.
    pub fn new(text: &'src str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            column: 1,
            mode: Mode::LiteralText,
        }
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Current byte offset as a [`TextPos`].
    #[inline]
    pub fn text_pos(&self) -> TextPos {
        text_pos(self.pos)
    }

    /// Line and column of the next character.
    #[inline]
    pub fn position(&self) -> LineAndColumn {
        LineAndColumn::new(self.line, self.column)
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Whether there are no more characters to consume.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// The unconsumed rest of the buffer.
    #[inline]
    pub fn rest(&self) -> &'src str {
        &self.text[self.pos..]
    }

    /// Look at the current character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Look at the character after the current one without consuming anything.
    #[inline]
    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Whether the rest of the buffer starts with `literal`.
    #[inline]
    pub fn starts_with(&self, literal: &str) -> bool {
        self.rest().starts_with(literal)
    }

    /// Consume the current character.
    ///
    /// Returns the consumed character, or `None` if at end of input.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == LINE_FEED {
            self.line = self.line.saturating_add(1);
            self.column = 1;
        } else {
            self.column = self.column.saturating_add(1);
        }
        Some(ch)
    }

    /// Consume `literal` if the rest of the buffer starts with it.
    pub fn eat(&mut self, literal: &str) -> bool {
        if self.starts_with(literal) {
            self.advance_to(self.pos + literal.len());
            true
        } else {
            false
        }
    }

    /// Advance while the predicate holds for the current character.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.advance();
        }
    }

    /// Jump forward to byte offset `end`, which must lie on a character
    /// boundary. Offsets past the end of the buffer clamp to the end.
    pub fn advance_to(&mut self, end: usize) {
        let end = end.min(self.text.len());
        if end <= self.pos {
            return;
        }
        let skipped = &self.text[self.pos..end];
        let bytes = skipped.as_bytes();
        match memchr::memrchr(b'\n', bytes) {
            Some(last_newline) => {
                let newlines = memchr::memchr_iter(b'\n', bytes).count();
                self.line = self.line.saturating_add(text_pos(newlines));
                self.column = text_pos(skipped[last_newline + 1..].chars().count()).saturating_add(1);
            }
            None => {
                self.column = self.column.saturating_add(text_pos(skipped.chars().count()));
            }
        }
        self.pos = end;
    }

    /// Byte offset of the next occurrence of `needle`, searching from the
    /// cursor.
    pub fn find(&self, needle: &str) -> Option<usize> {
        memchr::memmem::find(self.rest().as_bytes(), needle.as_bytes()).map(|i| self.pos + i)
    }

    /// Extract a slice of the buffer by byte offsets.
    pub fn slice(&self, start: usize, end: usize) -> &'src str {
        &self.text[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cursor_starts_in_literal_text() {
        let cursor = ScanCursor::new("hello");
        assert_eq!(cursor.pos(), 0);
        assert_eq!(cursor.position(), LineAndColumn::new(1, 1));
        assert_eq!(cursor.mode(), Mode::LiteralText);
        assert!(!cursor.is_eof());
    }

    #[test]
    fn peek_does_not_advance() {
        let cursor = ScanCursor::new("ab");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn advance_tracks_lines_and_columns() {
        let mut cursor = ScanCursor::new("a\nbc");
        cursor.advance();
        assert_eq!(cursor.position(), LineAndColumn::new(1, 2));
        cursor.advance();
        assert_eq!(cursor.position(), LineAndColumn::new(2, 1));
        cursor.advance();
        assert_eq!(cursor.position(), LineAndColumn::new(2, 2));
        assert_eq!(cursor.advance(), Some('c'));
        assert_eq!(cursor.advance(), None);
        assert!(cursor.is_eof());
    }

    #[test]
    fn advance_counts_multibyte_as_one_column() {
        let mut cursor = ScanCursor::new("\u{00E9}a");
        assert_eq!(cursor.advance(), Some('\u{00E9}'));
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.position(), LineAndColumn::new(1, 2));
    }

    #[test]
    fn advance_to_matches_char_by_char() {
        let text = "ab\ncdé\n\nxyz";
        let mut jumped = ScanCursor::new(text);
        jumped.advance_to(text.len() - 1);
        let mut stepped = ScanCursor::new(text);
        while stepped.pos() < text.len() - 1 {
            stepped.advance();
        }
        assert_eq!(jumped.pos(), stepped.pos());
        assert_eq!(jumped.position(), stepped.position());
        assert_eq!(jumped.position(), LineAndColumn::new(4, 3));
    }

    #[test]
    fn eat_consumes_only_on_match() {
        let mut cursor = ScanCursor::new("<?php echo");
        assert!(!cursor.eat("?>"));
        assert_eq!(cursor.pos(), 0);
        assert!(cursor.eat("<?php"));
        assert_eq!(cursor.pos(), 5);
        assert_eq!(cursor.position(), LineAndColumn::new(1, 6));
    }

    #[test]
    fn find_is_relative_to_the_whole_buffer() {
        let mut cursor = ScanCursor::new("x */ y */");
        cursor.advance_to(4);
        assert_eq!(cursor.find("*/"), Some(7));
        assert_eq!(cursor.find("zz"), None);
    }

    #[test]
    fn empty_source() {
        let cursor = ScanCursor::new("");
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.peek_next(), None);
    }
}

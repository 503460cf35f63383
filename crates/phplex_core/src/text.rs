//! Text span and line/column types for source location tracking.
//!
//! Tokens and diagnostics carry both a byte span into the scanned buffer and
//! a human-facing 1-based line and column.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// Longest buffer whose offsets, lines and columns all fit in a [`TextPos`].
///
/// Callers that load input reject anything longer before scanning.
pub const MAX_TEXT_LEN: usize = TextPos::MAX as usize;

/// Convert a byte offset or count to a [`TextPos`], saturating at
/// `TextPos::MAX` for buffers longer than [`MAX_TEXT_LEN`].
#[inline]
pub fn text_pos(offset: usize) -> TextPos {
    TextPos::try_from(offset).unwrap_or(TextPos::MAX)
}

/// A span in source text, defined by a start position and a length.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Serialize)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    /// Whether this span is empty (zero-length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Convert to a byte range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

/// A 1-based line and column.
///
/// Columns count Unicode scalar values, not bytes, so a multi-byte character
/// advances the column by one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct LineAndColumn {
    pub line: u32,
    pub column: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for LineAndColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A map from byte offsets to line/column positions, built from source text.
///
/// The scanner tracks positions incrementally; the map recomputes them from
/// scratch and is used where only a byte offset is at hand.
#[derive(Debug, Clone)]
pub struct LineMap<'a> {
    text: &'a str,
    /// Byte offsets of the start of each line.
    line_starts: Vec<TextPos>,
}

impl<'a> LineMap<'a> {
    /// Build a line map from source text.
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| text_pos(i + 1)));
        Self { text, line_starts }
    }

    /// Get the line index (0-based) for a byte offset.
    fn line_index_of(&self, pos: TextPos) -> usize {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(line) => line - 1,
        }
    }

    /// Get the 1-based line and column for a byte offset.
    ///
    /// Offsets past the end of the text clamp to the end.
    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let pos = pos.min(text_pos(self.text.len()));
        let index = self.line_index_of(pos);
        let line_start = self.line_starts[index] as usize;
        let column = self
            .text
            .get(line_start..pos as usize)
            .map_or(0, |prefix| prefix.chars().count());
        LineAndColumn {
            line: text_pos(index).saturating_add(1),
            column: text_pos(column).saturating_add(1),
        }
    }

}

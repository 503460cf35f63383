//! phplex_scanner: Tokenizer for PHP source embedded in literal markup.
//!
//! Input is scanned in two modes. Outside `<?php ... ?>` every run of text
//! becomes a single `HTMLText` token; inside, a finite-state recognizer
//! classifies one lexeme per step. The scanner is lossless: whitespace and
//! comments are tokens, and every token records the span it consumed, so the
//! input can be rebuilt from the token sequence when no lexical error occurs.
//!
//! Lexical errors (unterminated strings and block comments) are reported to a
//! [`DiagnosticSink`](phplex_diagnostics::DiagnosticSink) and produce no token.

mod char_codes;
mod cursor;
mod keywords;
mod scanner;
mod token;

pub use cursor::{Mode, ScanCursor};
pub use keywords::{is_keyword, KEYWORDS};
pub use scanner::{tokenize, tokenize_with_sink, ScanResult, Scanner, CLOSE_TAG, OPEN_TAG};
pub use token::{Token, TokenKind, TokenSequence};

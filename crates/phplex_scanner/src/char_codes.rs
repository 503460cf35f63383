//! Character classes used by the recognizer.

pub const LINE_FEED: char = '\n';
pub const SINGLE_QUOTE: char = '\'';
pub const DOUBLE_QUOTE: char = '"';
pub const DOLLAR_SIGN: char = '$';
pub const DOT: char = '.';
pub const SLASH: char = '/';
pub const ASTERISK: char = '*';
pub const UNDERSCORE: char = '_';

/// Single-character separators. Everything else that is not covered by
/// another rule is an operator.
pub const SEPARATORS: &[char] = &['(', ')', '{', '}', '[', ']', ';', ',', '.'];

/// Check if a character is whitespace: space, tab, line feed, vertical tab,
/// form feed or carriage return.
#[inline]
pub fn is_white_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\u{000B}' | '\u{000C}' | '\r')
}

/// Check if a character is a decimal digit.
#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if a character is a quote that opens a string literal.
#[inline]
pub fn is_quote(ch: char) -> bool {
    ch == SINGLE_QUOTE || ch == DOUBLE_QUOTE
}

#[inline]
pub fn is_separator(ch: char) -> bool {
    SEPARATORS.contains(&ch)
}

/// Check if a character can start an identifier.
///
/// Non-ASCII letters are accepted through `XID_Start`. A byte-oriented
/// `isalpha` classifier would see only UTF-8 continuation bytes here and
/// scan `é` as operator characters instead.
#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch == UNDERSCORE
        || ch.is_ascii_alphabetic()
        || (!ch.is_ascii() && unicode_xid::UnicodeXID::is_xid_start(ch))
}

/// Check if a character can be part of an identifier.
///
/// Non-ASCII characters follow `XID_Continue`; see [`is_identifier_start`]
/// for how this departs from a byte-oriented `isalnum` classifier.
#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch == UNDERSCORE
        || ch.is_ascii_alphanumeric()
        || (!ch.is_ascii() && unicode_xid::UnicodeXID::is_xid_continue(ch))
}

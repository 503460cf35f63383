//! Reserved words.

use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Every reserved spelling, case-sensitive.
///
/// `yield from` is listed for completeness; an identifier-shaped lexeme can
/// never contain a space, so it never matches.
pub const KEYWORDS: &[&str] = &[
    "if", "else", "elseif", "while", "do", "for", "foreach", "break", "continue",
    "switch", "case", "default", "function", "return", "echo", "print",
    "global", "static", "var", "const", "public", "private", "protected", "final",
    "class", "interface", "trait", "extends", "implements", "abstract",
    "new", "clone", "instanceof", "use", "namespace", "require", "require_once",
    "include", "include_once", "try", "catch", "finally", "throw",
    "match", "readonly", "enum", "fn", "yield", "yield from",
    "true", "false", "null", "and", "or", "xor", "isset", "empty", "unset",
    "__halt_compiler", "goto", "declare", "enddeclare", "endif", "endwhile",
    "endforeach", "endfor", "endswitch", "list",
];

static KEYWORD_SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();

fn keyword_set() -> &'static FxHashSet<&'static str> {
    KEYWORD_SET.get_or_init(|| KEYWORDS.iter().copied().collect())
}

/// Whether an identifier-shaped lexeme is a reserved word.
pub fn is_keyword(text: &str) -> bool {
    keyword_set().contains(text)
}

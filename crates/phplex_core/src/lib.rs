//! phplex_core: Source position primitives shared by the phplex crates.
//!
//! Provides byte-offset spans and the mapping from byte offsets to the
//! 1-based line/column pairs reported on tokens and diagnostics.

pub mod text;

// Re-export commonly used types
pub use text::{text_pos, LineAndColumn, LineMap, TextPos, TextSpan, MAX_TEXT_LEN};

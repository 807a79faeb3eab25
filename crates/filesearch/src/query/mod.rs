//! Criteria evaluation helpers: name patterns, content scanning, and the
//! text-file heuristic.

pub mod content;
pub mod pattern;
pub mod text_file;

pub use content::{find_first_match, ContentMatch};
pub use pattern::NamePattern;
pub use text_file::is_text_file;

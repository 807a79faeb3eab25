//! Filename pattern matching.

use glob::Pattern;
use regex::Regex;

/// A name pattern compiled once per search: shell glob (`*`, `?`, `[...]`)
/// by default, regex searched anywhere in the name when requested.
///
/// Case-insensitive matching lowercases both the pattern (at compile time)
/// and the candidate name. A pattern that fails to compile matches nothing;
/// the failure is logged, not raised.
#[derive(Debug)]
pub struct NamePattern {
    case_sensitive: bool,
    kind: PatternKind,
}

#[derive(Debug)]
enum PatternKind {
    Glob(Pattern),
    Regex(Regex),
    /// Failed to compile; matches nothing.
    Invalid,
}

impl NamePattern {
    pub fn compile(pattern: &str, case_sensitive: bool, regex: bool) -> Self {
        let source = if case_sensitive {
            pattern.to_string()
        } else {
            pattern.to_lowercase()
        };
        let kind = if regex {
            match Regex::new(&source) {
                Ok(compiled) => PatternKind::Regex(compiled),
                Err(error) => {
                    log::warn!("invalid regex pattern '{pattern}': {error}");
                    PatternKind::Invalid
                }
            }
        } else {
            match Pattern::new(&source) {
                Ok(compiled) => PatternKind::Glob(compiled),
                Err(error) => {
                    log::warn!("invalid glob pattern '{pattern}': {error}");
                    PatternKind::Invalid
                }
            }
        };
        Self {
            case_sensitive,
            kind,
        }
    }

    /// Matches against a base filename.
    pub fn matches(&self, filename: &str) -> bool {
        let lowered;
        let candidate = if self.case_sensitive {
            filename
        } else {
            lowered = filename.to_lowercase();
            &lowered
        };
        match &self.kind {
            PatternKind::Glob(pattern) => pattern.matches(candidate),
            PatternKind::Regex(pattern) => pattern.is_match(candidate),
            PatternKind::Invalid => false,
        }
    }
}

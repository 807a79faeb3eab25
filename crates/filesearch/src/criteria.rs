//! Compound search criteria.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// The compound query evaluated by [`SearchEngine::search_files`].
///
/// All fields except `pattern` are optional; the default matches every file.
/// Empty strings in `content_search` and `file_type` are treated as absent.
///
/// [`SearchEngine::search_files`]: crate::engine::SearchEngine::search_files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Filename pattern: shell glob by default, regex when `regex` is set.
    pub pattern: String,
    /// Substring to look for in file contents; forces the filesystem strategy.
    pub content_search: Option<String>,
    /// Extension suffix filter, e.g. `".txt"` (case-insensitive).
    pub file_type: Option<String>,
    /// Inclusive lower size bound in bytes.
    pub size_min: Option<u64>,
    /// Inclusive upper size bound in bytes.
    pub size_max: Option<u64>,
    /// Inclusive lower modified-date bound.
    pub date_from: Option<DateTime<Local>>,
    /// Inclusive upper modified-date bound.
    pub date_to: Option<DateTime<Local>>,
    pub case_sensitive: bool,
    /// Interpret `pattern` (and the content fallback check) as a regex.
    pub regex: bool,
    /// Result cap; the walk stops once reached.
    pub max_results: usize,
    /// Prefer the indexed strategy when no content search is requested.
    pub use_index: bool,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            pattern: "*".to_string(),
            content_search: None,
            file_type: None,
            size_min: None,
            size_max: None,
            date_from: None,
            date_to: None,
            case_sensitive: false,
            regex: false,
            max_results: 1000,
            use_index: true,
        }
    }
}

impl SearchCriteria {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    pub fn content_search(mut self, needle: impl Into<String>) -> Self {
        self.content_search = Some(needle.into());
        self
    }

    pub fn file_type(mut self, suffix: impl Into<String>) -> Self {
        self.file_type = Some(suffix.into());
        self
    }

    pub fn size_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.size_min = min;
        self.size_max = max;
        self
    }

    pub fn date_range(
        mut self,
        from: Option<DateTime<Local>>,
        to: Option<DateTime<Local>>,
    ) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn regex(mut self, regex: bool) -> Self {
        self.regex = regex;
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn use_index(mut self, use_index: bool) -> Self {
        self.use_index = use_index;
        self
    }

    /// The content term, with empty strings normalized away.
    pub(crate) fn content_needle(&self) -> Option<&str> {
        self.content_search.as_deref().filter(|s| !s.is_empty())
    }
}

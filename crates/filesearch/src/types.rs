//! Result and bookkeeping types returned by the search engine.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// How a result qualified for inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The filename satisfied the criteria.
    Filename,
    /// A line of the file contents matched the content term.
    Content,
}

/// One search match. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Absolute path of the matched file.
    pub path: PathBuf,
    /// Base name of the file.
    pub name: String,
    /// Size in bytes at match time.
    pub size: u64,
    /// Last-modified timestamp at match time.
    pub modified: DateTime<Local>,
    /// Containing directory.
    pub directory: PathBuf,
    /// Whether the match came from the filename or the contents.
    pub match_kind: MatchKind,
    /// First matching line (trimmed, at most 200 characters) for content matches.
    pub match_line: Option<String>,
    /// 1-based line number of `match_line`.
    pub match_line_number: Option<usize>,
}

/// One recorded search invocation. Purely observational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub pattern: String,
    pub content_search: Option<String>,
    pub file_type: Option<String>,
    pub root_path: PathBuf,
    pub timestamp: DateTime<Local>,
}

/// Snapshot of engine state and configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub indexed_files: usize,
    pub search_history_count: usize,
    pub indexing_enabled: bool,
    pub max_workers: usize,
    pub chunk_size: usize,
    pub max_file_size_for_content_search: u64,
}

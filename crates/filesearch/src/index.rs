//! In-memory filename index with modification-time staleness tracking.
//!
//! The index maps lowercased word tokens extracted from base names to the
//! set of paths whose filename produced that token. It only ever grows;
//! staleness is detected per-path at query time by comparing the recorded
//! modification time against the file on disk, never by purging old tokens.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;

static WORD_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("static pattern"));

/// Splits text into lowercased word-character runs.
fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_TOKEN
        .find_iter(&lowered)
        .map(|token| token.as_str().to_string())
        .collect()
}

#[derive(Debug, Default)]
struct IndexInner {
    /// token -> posting set of paths whose filename produced the token.
    index: HashMap<String, HashSet<PathBuf>>,
    /// path -> modification time recorded at index time.
    file_timestamps: HashMap<PathBuf, SystemTime>,
}

/// Inverted index over filename tokens.
///
/// All reads and mutations take the interior lock, so concurrent index
/// building from multiple search calls cannot race. Share one index across
/// engines by handing the same `Arc<SearchIndex>` to each of them.
#[derive(Debug, Default)]
pub struct SearchIndex {
    inner: Mutex<IndexInner>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only when `path` has a recorded timestamp that is at least as
    /// recent as the file's current modification time on disk. A missing or
    /// inaccessible file is reported as not indexed, never as an error.
    pub fn is_indexed(&self, path: &Path) -> bool {
        let inner = self.inner.lock();
        let Some(recorded) = inner.file_timestamps.get(path) else {
            return false;
        };
        match fs::metadata(path).and_then(|metadata| metadata.modified()) {
            Ok(current) => *recorded >= current,
            Err(_) => false,
        }
    }

    /// Tokenizes the base name of `path` and inserts the path into the
    /// posting set of every token, recording the current modification time.
    /// Filesystem errors (e.g. the file was deleted mid-scan) are logged and
    /// leave the index unchanged.
    pub fn add_file(&self, path: &Path) {
        let modified = match fs::metadata(path).and_then(|metadata| metadata.modified()) {
            Ok(modified) => modified,
            Err(error) => {
                log::warn!("failed to index {}: {}", path.display(), error);
                return;
            }
        };
        let Some(name) = path.file_name() else {
            return;
        };
        let tokens = tokenize(&name.to_string_lossy());

        let mut inner = self.inner.lock();
        for token in tokens {
            inner
                .index
                .entry(token)
                .or_default()
                .insert(path.to_path_buf());
        }
        inner.file_timestamps.insert(path.to_path_buf(), modified);
    }

    /// Looks up `query` in the index.
    ///
    /// Each query token matches every indexed token that contains it as a
    /// substring (partial-word matching); the posting sets of those indexed
    /// tokens are unioned per query token and intersected across query
    /// tokens. A query with no word tokens yields the empty set.
    pub fn search(&self, query: &str) -> HashSet<PathBuf> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return HashSet::new();
        }

        let inner = self.inner.lock();
        let mut result: Option<HashSet<PathBuf>> = None;
        for token in &query_tokens {
            let mut matches: HashSet<PathBuf> = HashSet::new();
            for (indexed_token, paths) in &inner.index {
                if indexed_token.contains(token.as_str()) {
                    matches.extend(paths.iter().cloned());
                }
            }
            result = Some(match result {
                None => matches,
                Some(accumulated) => accumulated.intersection(&matches).cloned().collect(),
            });
            if result.as_ref().is_some_and(HashSet::is_empty) {
                break;
            }
        }
        result.unwrap_or_default()
    }

    /// Number of files with a recorded timestamp.
    pub fn len(&self) -> usize {
        self.inner.lock().file_timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards all tokens and timestamps in place, so shared handles
    /// observe the reset.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.index.clear();
        inner.file_timestamps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(b"x").unwrap();
        path
    }

    #[test]
    fn tokenize_splits_on_non_word_characters() {
        assert_eq!(tokenize("Annual-Report_2024.txt"), ["annual", "report", "2024", "txt"]);
        assert!(tokenize("*").is_empty());
    }

    #[test]
    fn added_file_is_indexed() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "report.txt");
        let index = SearchIndex::new();
        assert!(!index.is_indexed(&path));
        index.add_file(&path);
        assert!(index.is_indexed(&path));
    }

    #[test]
    fn advancing_mtime_makes_entry_stale() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "report.txt");
        let index = SearchIndex::new();
        index.add_file(&path);
        assert!(index.is_indexed(&path));

        let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(10))
            .unwrap();
        assert!(!index.is_indexed(&path));
    }

    #[test]
    fn missing_file_is_not_indexed() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "gone.txt");
        let index = SearchIndex::new();
        index.add_file(&path);
        fs::remove_file(&path).unwrap();
        assert!(!index.is_indexed(&path));
    }

    #[test]
    fn search_matches_partial_tokens() {
        let dir = TempDir::new().unwrap();
        let report = touch(&dir, "annual_report.txt");
        let notes = touch(&dir, "notes.md");
        let index = SearchIndex::new();
        index.add_file(&report);
        index.add_file(&notes);

        // "port" is a substring of the indexed token "report"
        let hits = index.search("port");
        assert_eq!(hits, HashSet::from([report.clone()]));

        // every query token must be matched by some token of the file
        assert!(index.search("annual notes").is_empty());
        assert_eq!(index.search("annual txt"), HashSet::from([report]));
    }

    #[test]
    fn search_without_word_tokens_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "a.txt");
        let index = SearchIndex::new();
        index.add_file(&path);
        assert!(index.search("*").is_empty());
        assert!(index.search("").is_empty());
    }

    #[test]
    fn insertion_order_does_not_affect_results() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "alpha_report.txt");
        let b = touch(&dir, "beta_report.txt");
        let c = touch(&dir, "gamma.log");

        let forward = SearchIndex::new();
        for path in [&a, &b, &c] {
            forward.add_file(path);
        }
        let reverse = SearchIndex::new();
        for path in [&c, &b, &a] {
            reverse.add_file(path);
        }

        assert_eq!(forward.search("report"), reverse.search("report"));
        assert_eq!(forward.search("txt"), reverse.search("txt"));
    }

    #[test]
    fn add_file_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "report.txt");
        let index = SearchIndex::new();
        index.add_file(&path);
        let before = index.search("report");
        index.add_file(&path);
        assert_eq!(index.search("report"), before);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn clear_resets_contents_in_place() {
        let dir = TempDir::new().unwrap();
        let path = touch(&dir, "report.txt");
        let index = SearchIndex::new();
        index.add_file(&path);
        index.clear();
        assert!(index.is_empty());
        assert!(index.search("report").is_empty());
        assert!(!index.is_indexed(&path));
    }

    #[test]
    fn add_file_tolerates_missing_files() {
        let index = SearchIndex::new();
        index.add_file(Path::new("/nonexistent/file.txt"));
        assert!(index.is_empty());
    }
}

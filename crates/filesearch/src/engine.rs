//! Search orchestration: strategy selection, criteria evaluation, progress,
//! cancellation, and history.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

use crate::cancel::CancelFlag;
use crate::criteria::SearchCriteria;
use crate::error::{Result, SearchError};
use crate::index::SearchIndex;
use crate::query::{content, NamePattern};
use crate::types::{EngineStats, HistoryEntry, MatchKind, SearchResult};
use crate::walk::{self, WalkState};

/// Progress observer invoked with `(processed, total)`.
///
/// Cadence: every 100 candidates in the indexed strategy and during index
/// refresh, every 50 files in the filesystem walk. Invoked from whatever
/// thread runs the search.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Sync);

/// Bounded search history length; oldest entries are evicted first.
const MAX_HISTORY: usize = 50;

/// Progress cadence for indexed-candidate processing.
const INDEXED_PROGRESS_EVERY: usize = 100;

/// Progress cadence for the filesystem walk.
const WALK_PROGRESS_EVERY: usize = 50;

/// Engine construction knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Accepted for future parallel strategies; the per-request walk itself
    /// stays sequential and deterministic.
    pub max_workers: usize,
    /// Chunk size in bytes for content reads.
    pub chunk_size: usize,
    /// Files larger than this are excluded from content matching entirely.
    pub max_file_size_for_content_search: u64,
    /// When false, searches never consult or populate the index.
    pub indexing_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            chunk_size: 8192,
            max_file_size_for_content_search: 10 * 1024 * 1024,
            indexing_enabled: true,
        }
    }
}

/// Which execution path a search request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Refresh the index for the subtree, query it, re-validate candidates.
    Indexed,
    /// Walk the directory tree directly, filtering each file inline.
    Filesystem,
}

impl Strategy {
    /// Content search always forces the filesystem strategy, because the
    /// index only covers filenames.
    pub fn select(criteria: &SearchCriteria, indexing_enabled: bool) -> Self {
        if criteria.use_index && indexing_enabled && criteria.content_needle().is_none() {
            Strategy::Indexed
        } else {
            Strategy::Filesystem
        }
    }
}

/// Cancellable, multi-criteria, optionally-indexed file finder.
///
/// An engine owns one [`SearchIndex`] (shareable across engines via
/// [`SearchEngine::with_index`]), one cancellation flag, one
/// search-serializing lock, and a bounded history. All state is
/// process-local; nothing is persisted across runs.
pub struct SearchEngine {
    config: EngineConfig,
    index: Arc<SearchIndex>,
    cancel: CancelFlag,
    search_lane: Mutex<()>,
    history: Mutex<VecDeque<HistoryEntry>>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_index(config, Arc::new(SearchIndex::new()))
    }

    /// Builds an engine around an existing index handle, so several engines
    /// can share one index explicitly.
    pub fn with_index(config: EngineConfig, index: Arc<SearchIndex>) -> Self {
        Self {
            config,
            index,
            cancel: CancelFlag::new(),
            search_lane: Mutex::new(()),
            history: Mutex::new(VecDeque::new()),
        }
    }

    /// The engine's index handle, for sharing with other engines.
    pub fn index_handle(&self) -> Arc<SearchIndex> {
        Arc::clone(&self.index)
    }

    /// Requests cancellation of the in-flight search. Observed cooperatively
    /// at loop boundaries; the flag is cleared when the next search starts.
    pub fn cancel_search(&self) {
        self.cancel.cancel();
        log::info!("search cancellation requested");
    }

    /// Executes one compound search request against the subtree at `root`.
    ///
    /// Root validation happens before anything else: a missing root fails
    /// with [`SearchError::RootNotFound`], a non-directory with
    /// [`SearchError::NotADirectory`], with no side effects. Past
    /// validation, the request is appended to the bounded history and one of
    /// two strategies runs (see [`Strategy::select`]).
    ///
    /// One search runs at a time per engine; a second caller blocks until
    /// the first completes. Any pending cancellation from a prior run is
    /// cleared at entry.
    ///
    /// Cancellation behavior differs by strategy, matching the system this
    /// engine was built for: the filesystem strategy returns
    /// [`SearchError::Cancelled`], while the indexed strategy stops silently
    /// and returns the results accepted so far.
    pub fn search_files(
        &self,
        root: &Path,
        criteria: &SearchCriteria,
        progress: Option<ProgressFn>,
    ) -> Result<Vec<SearchResult>> {
        let metadata = fs::metadata(root).map_err(|error| match error.kind() {
            std::io::ErrorKind::NotFound => SearchError::RootNotFound(root.to_path_buf()),
            _ => SearchError::Io(error),
        })?;
        if !metadata.is_dir() {
            return Err(SearchError::NotADirectory(root.to_path_buf()));
        }

        let _lane = self.search_lane.lock();
        self.cancel.clear();
        let started = Instant::now();

        self.push_history(HistoryEntry {
            pattern: criteria.pattern.clone(),
            content_search: criteria.content_search.clone(),
            file_type: criteria.file_type.clone(),
            root_path: root.to_path_buf(),
            timestamp: Local::now(),
        });

        let results = match Strategy::select(criteria, self.config.indexing_enabled) {
            Strategy::Indexed => self.search_with_index(root, criteria, progress),
            Strategy::Filesystem => self.search_filesystem(root, criteria, progress)?,
        };

        log::info!(
            "search completed in {:.2?}, found {} results",
            started.elapsed(),
            results.len()
        );
        Ok(results)
    }

    /// Lightweight filename-only search.
    ///
    /// With indexing enabled this returns raw index hits (no re-validation
    /// against other criteria) capped at `max_results`. Otherwise it walks
    /// the tree matching `query` as a case-insensitive substring of
    /// directory and file names.
    pub fn quick_search(
        &self,
        root: &Path,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(SearchError::RootNotFound(root.to_path_buf()));
        }

        if self.config.indexing_enabled {
            let mut hits: Vec<PathBuf> = self.index.search(query).into_iter().collect();
            hits.truncate(max_results);
            return Ok(hits);
        }

        let query_lower = query.to_lowercase();
        let mut results = Vec::new();
        self.quick_scan(root, &query_lower, max_results, &mut results);
        Ok(results)
    }

    /// Snapshot copy of the search history, oldest first.
    pub fn search_history(&self) -> Vec<HistoryEntry> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }

    /// Resets the index to empty. Shared handles observe the reset.
    pub fn clear_index(&self) {
        self.index.clear();
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            indexed_files: self.index.len(),
            search_history_count: self.history.lock().len(),
            indexing_enabled: self.config.indexing_enabled,
            max_workers: self.config.max_workers,
            chunk_size: self.config.chunk_size,
            max_file_size_for_content_search: self.config.max_file_size_for_content_search,
        }
    }

    // ------------------------------------------------------------------
    // Indexed strategy
    // ------------------------------------------------------------------

    fn search_with_index(
        &self,
        root: &Path,
        criteria: &SearchCriteria,
        progress: Option<ProgressFn>,
    ) -> Vec<SearchResult> {
        self.refresh_index(root, progress);
        if self.cancel.is_cancelled() {
            return Vec::new();
        }

        let candidates = self.index.search(&criteria.pattern);
        let total = candidates.len();
        let name_pattern =
            NamePattern::compile(&criteria.pattern, criteria.case_sensitive, criteria.regex);

        let mut results = Vec::new();
        for (processed, path) in candidates.iter().enumerate() {
            if self.cancel.is_cancelled() || results.len() >= criteria.max_results {
                break;
            }
            // Index hits are substring-on-token over-approximations, so
            // every candidate re-runs the full criteria check against a
            // fresh stat; paths deleted since indexing are skipped.
            if let Some(result) = validate_candidate(path, criteria, &name_pattern) {
                results.push(result);
            }
            if let Some(callback) = progress {
                if processed % INDEXED_PROGRESS_EVERY == 0 {
                    callback(processed, total);
                }
            }
        }
        results
    }

    /// Walks the subtree and indexes every file whose recorded state is
    /// stale. Cancellation mid-refresh returns silently, leaving the index
    /// partially updated.
    fn refresh_index(&self, root: &Path, progress: Option<ProgressFn>) {
        if !self.config.indexing_enabled {
            return;
        }

        let mut pending: Vec<PathBuf> = Vec::new();
        walk::walk_files(root, &self.cancel, &mut |path| {
            if !self.index.is_indexed(path) {
                pending.push(path.to_path_buf());
            }
            WalkState::Continue
        });
        if self.cancel.is_cancelled() {
            return;
        }

        let total = pending.len();
        for (processed, path) in pending.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return;
            }
            self.index.add_file(path);
            if let Some(callback) = progress {
                if processed % INDEXED_PROGRESS_EVERY == 0 {
                    callback(processed, total);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Filesystem strategy
    // ------------------------------------------------------------------

    fn search_filesystem(
        &self,
        root: &Path,
        criteria: &SearchCriteria,
        progress: Option<ProgressFn>,
    ) -> Result<Vec<SearchResult>> {
        let total = if progress.is_some() {
            walk::estimate_file_count(root, &self.cancel)
        } else {
            0
        };

        let name_pattern =
            NamePattern::compile(&criteria.pattern, criteria.case_sensitive, criteria.regex);
        let content_needle = criteria.content_needle();
        // A file whose contents miss the term can still qualify when its
        // name matches the term as a pattern.
        let content_name_pattern = content_needle
            .map(|needle| NamePattern::compile(needle, criteria.case_sensitive, criteria.regex));

        let mut results = Vec::new();
        let mut processed = 0usize;

        let outcome = walk::walk_files(root, &self.cancel, &mut |path| {
            if self.cancel.is_cancelled() || results.len() >= criteria.max_results {
                return WalkState::Stop;
            }
            processed += 1;
            if let Some(callback) = progress {
                if processed % WALK_PROGRESS_EVERY == 0 {
                    callback(processed, total);
                }
            }
            match self.process_file(
                path,
                criteria,
                &name_pattern,
                content_needle,
                content_name_pattern.as_ref(),
            ) {
                Ok(Some(result)) => {
                    results.push(result);
                    // opportunistic: future indexed searches benefit
                    if self.config.indexing_enabled {
                        self.index.add_file(path);
                    }
                }
                Ok(None) => {}
                Err(error) => {
                    log::debug!("cannot access file {}: {}", path.display(), error);
                }
            }
            WalkState::Continue
        });

        if self.cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        if let walk::WalkOutcome::Failed(error) = outcome {
            return Err(SearchError::SearchFailed(format!(
                "filesystem walk failed: {error}"
            )));
        }
        Ok(results)
    }

    /// Evaluates all criteria against one file, short-circuiting in fixed
    /// order: name pattern, extension, size bounds, date bounds, content.
    /// Per-item I/O errors bubble up to be skipped by the caller.
    fn process_file(
        &self,
        path: &Path,
        criteria: &SearchCriteria,
        name_pattern: &NamePattern,
        content_needle: Option<&str>,
        content_name_pattern: Option<&NamePattern>,
    ) -> std::io::Result<Option<SearchResult>> {
        let Some(name) = path.file_name().map(|name| name.to_string_lossy().into_owned()) else {
            return Ok(None);
        };
        if !name_pattern.matches(&name) {
            return Ok(None);
        }
        if !extension_matches(&name, criteria.file_type.as_deref()) {
            return Ok(None);
        }

        let metadata = fs::metadata(path)?;
        let size = metadata.len();
        if criteria.size_min.is_some_and(|min| size < min) {
            return Ok(None);
        }
        if criteria.size_max.is_some_and(|max| size > max) {
            return Ok(None);
        }

        let modified: DateTime<Local> = metadata.modified()?.into();
        if criteria.date_from.is_some_and(|from| modified < from) {
            return Ok(None);
        }
        if criteria.date_to.is_some_and(|to| modified > to) {
            return Ok(None);
        }

        let mut match_kind = MatchKind::Filename;
        let mut match_line = None;
        let mut match_line_number = None;
        if let Some(needle) = content_needle {
            if size > self.config.max_file_size_for_content_search {
                log::debug!("skipping content search for large file: {}", path.display());
            } else if let Some(found) = content::find_first_match(
                path,
                needle,
                criteria.case_sensitive,
                self.config.chunk_size,
                &self.cancel,
            ) {
                match_kind = MatchKind::Content;
                match_line = Some(found.line);
                match_line_number = Some(found.line_number);
            } else if !content_name_pattern.is_some_and(|pattern| pattern.matches(&name)) {
                return Ok(None);
            }
        }

        Ok(Some(SearchResult {
            path: path.to_path_buf(),
            name,
            size,
            modified,
            directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            match_kind,
            match_line,
            match_line_number,
        }))
    }

    // ------------------------------------------------------------------
    // Quick search fallback
    // ------------------------------------------------------------------

    /// Substring scan over directory and file names. No hidden-directory
    /// pruning here; directory names are checked before file names within
    /// each directory, then subdirectories are descended in entry order.
    fn quick_scan(
        &self,
        dir: &Path,
        query_lower: &str,
        max_results: usize,
        results: &mut Vec<PathBuf>,
    ) {
        if self.cancel.is_cancelled() || results.len() >= max_results {
            return;
        }
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        let mut subdirs = Vec::new();
        let mut files = Vec::new();
        for entry in entries.filter_map(|entry| entry.ok()) {
            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => subdirs.push(entry),
                Ok(_) => files.push(entry),
                Err(_) => {}
            }
        }

        for entry in subdirs.iter().chain(files.iter()) {
            if entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .contains(query_lower)
            {
                results.push(entry.path());
                if results.len() >= max_results {
                    return;
                }
            }
        }

        for subdir in subdirs {
            self.quick_scan(&subdir.path(), query_lower, max_results, results);
        }
    }

    fn push_history(&self, entry: HistoryEntry) {
        let mut history = self.history.lock();
        history.push_back(entry);
        while history.len() > MAX_HISTORY {
            history.pop_front();
        }
    }
}

/// Case-insensitive extension suffix check; `suffix` may be given with or
/// without the leading dot.
fn extension_matches(name: &str, suffix: Option<&str>) -> bool {
    match suffix {
        Some(suffix) if !suffix.is_empty() => {
            name.to_lowercase().ends_with(&suffix.to_lowercase())
        }
        _ => true,
    }
}

/// Full criteria re-check for an index candidate, against a fresh stat.
fn validate_candidate(
    path: &Path,
    criteria: &SearchCriteria,
    name_pattern: &NamePattern,
) -> Option<SearchResult> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    if !name_pattern.matches(&name) {
        return None;
    }
    if !extension_matches(&name, criteria.file_type.as_deref()) {
        return None;
    }

    let metadata = fs::metadata(path).ok()?;
    let size = metadata.len();
    if criteria.size_min.is_some_and(|min| size < min) {
        return None;
    }
    if criteria.size_max.is_some_and(|max| size > max) {
        return None;
    }

    let modified: DateTime<Local> = metadata.modified().ok()?.into();
    if criteria.date_from.is_some_and(|from| modified < from) {
        return None;
    }
    if criteria.date_to.is_some_and(|to| modified > to) {
        return None;
    }

    Some(SearchResult {
        path: path.to_path_buf(),
        name,
        size,
        modified,
        directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        match_kind: MatchKind::Filename,
        match_line: None,
        match_line_number: None,
    })
}

//! Filename and content search core for a desktop file manager.
//!
//! Two components, leaf-first:
//!
//! - [`SearchIndex`]: an in-memory inverted index mapping lowercased
//!   filename tokens to sets of paths, with per-file modification-time
//!   bookkeeping to detect staleness.
//! - [`SearchEngine`]: executes compound search requests over a directory
//!   subtree, choosing between an indexed strategy (refresh, query,
//!   re-validate) and a direct filesystem walk with streaming content
//!   search, honoring cooperative cancellation and progress reporting.
//!
//! ```no_run
//! use filesearch::{SearchCriteria, SearchEngine};
//!
//! let engine = SearchEngine::new();
//! let criteria = SearchCriteria::new("*.txt").content_search("TODO");
//! let results = engine.search_files("/home/user/docs".as_ref(), &criteria, None)?;
//! for result in &results {
//!     println!("{} ({:?})", result.path.display(), result.match_kind);
//! }
//! # Ok::<(), filesearch::SearchError>(())
//! ```

pub mod cancel;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod index;
pub mod query;
pub mod types;
pub mod walk;

pub use cancel::CancelFlag;
pub use criteria::SearchCriteria;
pub use engine::{EngineConfig, ProgressFn, SearchEngine, Strategy};
pub use error::{Result, SearchError};
pub use index::SearchIndex;
pub use types::{EngineStats, HistoryEntry, MatchKind, SearchResult};

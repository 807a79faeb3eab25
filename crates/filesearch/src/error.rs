use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Root path does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("Root path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Search cancelled")]
    Cancelled,

    #[error("Search operation failed: {0}")]
    SearchFailed(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

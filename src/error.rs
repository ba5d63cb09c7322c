/// Error types shared by the gallery modules
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while listing, caching or modifying gallery items
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("listing cache error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("settings error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("path escapes the output directory: {0}")]
    OutsideRoot(String),

    #[error("item not found: {0}")]
    NotFound(String),

    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    #[error("a file named {} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;

//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O and document-engine errors, and names the one
//! planning failure front ends report on their own (a missing folder).
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document engine error: {0}")]
    Engine(#[from] crate::io::EngineError),

    #[error("Folder does not exist: {}", path.display())]
    FolderNotFound { path: PathBuf },
}

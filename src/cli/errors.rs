use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Folder does not exist: {}", .0.display())]
    InvalidFolder(PathBuf),

    #[cfg(not(feature = "gui"))]
    #[error("GUI feature is not enabled. Rebuild with --features gui or pass --folder/--files")]
    GuiUnavailable,

    #[error("{0}")]
    Library(#[from] hwpdf::Error),
}

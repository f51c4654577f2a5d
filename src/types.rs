//! Shared types and enums used across hwpdf.
//! Includes `ExportFormat`, the per-item `ConversionOutcome` with its
//! `OutcomeStatus`, and the runner's `RunState`.
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Target format handed to the document engine's save call
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
        }
    }

    /// Filter name understood by `soffice --convert-to`
    pub fn soffice_filter(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Pdf => write!(f, "PDF"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
    Skipped,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutcomeStatus::Succeeded => "succeeded",
            OutcomeStatus::Failed => "failed",
            OutcomeStatus::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

/// Result of one input file, reported as soon as it is known
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ConversionOutcome {
    pub input: PathBuf,
    pub status: OutcomeStatus,
    pub error: Option<String>,
}

impl ConversionOutcome {
    pub fn succeeded(input: &Path) -> Self {
        Self {
            input: input.to_path_buf(),
            status: OutcomeStatus::Succeeded,
            error: None,
        }
    }

    pub fn failed(input: &Path, error: impl std::fmt::Display) -> Self {
        Self {
            input: input.to_path_buf(),
            status: OutcomeStatus::Failed,
            error: Some(error.to_string()),
        }
    }

    pub fn skipped(input: &Path, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_path_buf(),
            status: OutcomeStatus::Skipped,
            error: Some(reason.into()),
        }
    }
}

/// Lifecycle of a batch run. `Completed` and `Cancelled` are terminal.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Display name of a path, falling back to the whole path when it has no file name
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! Input discovery and job planning: which files to convert, where their
//! output goes, and which inputs are dropped because the PDF already exists.
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::job::{CancelToken, ConversionJob};
use super::params::ConversionParams;
use crate::error::{Error, Result};
use crate::types::ExportFormat;

/// Source document extensions, matched case-insensitively
pub const SOURCE_EXTENSIONS: [&str; 2] = ["hwp", "hwpx"];

pub fn is_source_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SOURCE_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// The input path with its extension replaced by the export format's
pub fn output_path_for(input: &Path, format: ExportFormat) -> PathBuf {
    input.with_extension(format.extension())
}

/// Source documents directly inside `folder`, sorted by file name
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(Error::FolderNotFound {
            path: folder.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && is_source_document(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} source documents in {:?}", files.len(), folder);
    Ok(files)
}

/// Make `files` absolute (relative ones against `folder`, or the current
/// directory) and drop repeated entries, keeping the first.
pub fn resolve_inputs(folder: Option<&Path>, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(files.len());
    for file in files {
        let joined = match folder {
            Some(base) if file.is_relative() => base.join(file),
            _ => file.clone(),
        };
        let absolute = std::path::absolute(&joined)?;
        if seen.insert(absolute.clone()) {
            resolved.push(absolute);
        } else {
            debug!("Ignoring repeated input: {:?}", absolute);
        }
    }
    Ok(resolved)
}

/// Expand dropped paths: directories are scanned, files kept if they are
/// source documents. Unreadable directories are logged and skipped.
pub fn collect_dropped(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            match scan_folder(path) {
                Ok(found) => files.extend(found),
                Err(e) => warn!("Skipping dropped folder {:?}: {}", path, e),
            }
        } else if path.is_file() && is_source_document(path) {
            files.push(path.clone());
        }
    }
    let mut seen = HashSet::new();
    files.retain(|p| seen.insert(p.clone()));
    files
}

/// Inputs whose output file already exists
pub fn existing_outputs(inputs: &[PathBuf], format: ExportFormat) -> Vec<PathBuf> {
    inputs
        .iter()
        .filter(|p| output_path_for(p, format).exists())
        .cloned()
        .collect()
}

/// True when every path lives in the same directory
pub fn same_parent(paths: &[PathBuf]) -> bool {
    let mut parents = paths.iter().map(|p| p.parent());
    match parents.next() {
        Some(first) => parents.all(|p| p == first),
        None => true,
    }
}

/// Why a plan has nothing to convert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoInputFiles,
    AllAlreadyConverted { count: usize },
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoInputFiles => write!(f, "No HWP/HWPX files were found."),
            EmptyReason::AllAlreadyConverted { count } => write!(
                f,
                "All {} file(s) already have a PDF; use overwrite to convert them again.",
                count
            ),
        }
    }
}

/// The outcome of discovery: what will be converted and what was left out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPlan {
    pub files: Vec<PathBuf>,
    /// Inputs left out because their output already exists
    pub skipped: Vec<PathBuf>,
    /// Number of candidate inputs before the overwrite policy was applied
    pub discovered: usize,
}

impl JobPlan {
    /// Apply the overwrite policy to `candidates`
    pub fn build(candidates: Vec<PathBuf>, overwrite: bool, format: ExportFormat) -> Self {
        let discovered = candidates.len();
        if overwrite {
            return Self {
                files: candidates,
                skipped: Vec::new(),
                discovered,
            };
        }
        let (skipped, files): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|p| output_path_for(p, format).exists());
        Self {
            files,
            skipped,
            discovered,
        }
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        if !self.files.is_empty() {
            None
        } else if self.discovered == 0 {
            Some(EmptyReason::NoInputFiles)
        } else {
            Some(EmptyReason::AllAlreadyConverted {
                count: self.skipped.len(),
            })
        }
    }

    pub fn into_job(self, cancel: CancelToken) -> ConversionJob {
        ConversionJob::with_cancel_token(self.files, cancel)
    }
}

/// Discover inputs from a folder and/or an explicit file list. An explicit,
/// non-empty file list takes precedence over scanning the folder.
pub fn plan(folder: Option<&Path>, files: &[PathBuf], params: &ConversionParams) -> Result<JobPlan> {
    let folder = folder.map(std::path::absolute).transpose()?;
    if let Some(dir) = &folder {
        if !dir.is_dir() {
            return Err(Error::FolderNotFound { path: dir.clone() });
        }
    }

    let candidates = if !files.is_empty() {
        resolve_inputs(folder.as_deref(), files)?
    } else if let Some(dir) = &folder {
        scan_folder(dir)?
    } else {
        Vec::new()
    };

    Ok(JobPlan::build(candidates, params.overwrite, params.format))
}

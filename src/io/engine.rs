//! The document engine boundary.
//!
//! A `DocumentEngine` is the external application that actually renders a
//! document to PDF. The batch runner only ever talks to it through this trait,
//! so any engine (or a fake one in tests) can be plugged in.
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::ExportFormat;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("document engine '{binary}' is not available: {reason}")]
    Unavailable { binary: String, reason: String },

    #[error("no document is open")]
    NoDocument,

    #[error("engine has already been shut down")]
    ShutDown,

    #[error("input file not found: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("conversion failed (exit code {code:?}): {stderr}")]
    ConversionFailed { code: Option<i32>, stderr: String },

    #[error("engine produced no output for {}: {detail}", path.display())]
    OutputMissing { path: PathBuf, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Capability set of an external document engine: open a file, save it in
/// another format, shut down. Any call may fail.
pub trait DocumentEngine {
    fn open(&mut self, input: &Path) -> Result<(), EngineError>;

    fn save_as(&mut self, output: &Path, format: ExportFormat) -> Result<(), EngineError>;

    /// Release the engine. Called exactly once per batch run.
    fn quit(&mut self) -> Result<(), EngineError>;
}

/// Deferred engine acquisition. The runner only acquires an engine once it
/// knows there is work to do.
pub trait EngineProvider {
    fn acquire(&self) -> Result<Box<dyn DocumentEngine>, EngineError>;
}

impl<F, E> EngineProvider for F
where
    F: Fn() -> Result<E, EngineError>,
    E: DocumentEngine + 'static,
{
    fn acquire(&self) -> Result<Box<dyn DocumentEngine>, EngineError> {
        Ok(Box::new(self()?))
    }
}

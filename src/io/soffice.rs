//! LibreOffice-backed document engine.
//!
//! Each conversion runs `soffice --headless --convert-to pdf` against a private
//! user profile, so a desktop LibreOffice session that is already open is not
//! disturbed. The converted file is staged in a temporary directory and then
//! moved next to the input.
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tempfile::TempDir;
use tracing::{debug, info, trace};

use super::engine::{DocumentEngine, EngineError, EngineProvider};
use crate::types::ExportFormat;

/// Environment variable naming the `soffice` binary to use
pub const SOFFICE_ENV: &str = "HWPDF_SOFFICE";
pub const DEFAULT_SOFFICE: &str = "soffice";

/// Pick the engine binary: explicit path, then `HWPDF_SOFFICE`, then `soffice` on PATH.
pub fn resolve_binary(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| {
            std::env::var_os(SOFFICE_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOFFICE))
}

/// Characters left as-is in a file URL path
const URL_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b':')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// `-env:UserInstallation` wants a file URL, with forward slashes even on Windows.
fn file_url(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    let encoded = utf8_percent_encode(&s, URL_PATH);
    if s.starts_with('/') {
        format!("file://{}", encoded)
    } else {
        format!("file:///{}", encoded)
    }
}

#[derive(Debug)]
pub struct SofficeEngine {
    binary: PathBuf,
    profile: Option<TempDir>,
    current: Option<PathBuf>,
}

impl SofficeEngine {
    /// Probe the binary with `--version` and set up a private profile directory.
    pub fn launch(binary: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let binary = binary.into();
        let unavailable = |reason: String| EngineError::Unavailable {
            binary: binary.display().to_string(),
            reason,
        };

        let output = Command::new(&binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| unavailable(e.to_string()))?;
        if !output.status.success() {
            return Err(unavailable(format!(
                "`--version` exited with {}",
                output.status
            )));
        }
        info!(
            "Using document engine: {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );

        let profile = tempfile::Builder::new()
            .prefix("hwpdf-profile-")
            .tempdir()?;
        debug!("Engine profile directory: {:?}", profile.path());

        Ok(Self {
            binary,
            profile: Some(profile),
            current: None,
        })
    }
}

impl DocumentEngine for SofficeEngine {
    fn open(&mut self, input: &Path) -> Result<(), EngineError> {
        if self.profile.is_none() {
            return Err(EngineError::ShutDown);
        }
        if !input.is_file() {
            return Err(EngineError::InputMissing(input.to_path_buf()));
        }
        trace!("Opened document: {:?}", input);
        self.current = Some(input.to_path_buf());
        Ok(())
    }

    fn save_as(&mut self, output: &Path, format: ExportFormat) -> Result<(), EngineError> {
        let profile = self.profile.as_ref().ok_or(EngineError::ShutDown)?;
        let input = self.current.as_ref().ok_or(EngineError::NoDocument)?;
        let stem = input
            .file_stem()
            .ok_or_else(|| EngineError::InputMissing(input.clone()))?;

        let staging = tempfile::Builder::new().prefix("hwpdf-out-").tempdir()?;
        debug!("Converting {:?} to {} via {:?}", input, format, self.binary);

        let result = Command::new(&self.binary)
            .arg(format!("-env:UserInstallation={}", file_url(profile.path())))
            .args(["--headless", "--norestore", "--convert-to"])
            .arg(format.soffice_filter())
            .arg("--outdir")
            .arg(staging.path())
            .arg(input)
            .stdin(Stdio::null())
            .output()?;

        let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
        if !result.status.success() {
            return Err(EngineError::ConversionFailed {
                code: result.status.code(),
                stderr,
            });
        }

        let mut produced_name = OsString::from(stem);
        produced_name.push(".");
        produced_name.push(format.extension());
        let produced = staging.path().join(produced_name);
        // soffice exits 0 when the import filter rejects a file
        if !produced.is_file() {
            return Err(EngineError::OutputMissing {
                path: output.to_path_buf(),
                detail: if stderr.is_empty() {
                    "no diagnostic from engine".to_string()
                } else {
                    stderr
                },
            });
        }

        if fs::rename(&produced, output).is_err() {
            fs::copy(&produced, output)?;
        }
        trace!("Saved {:?}", output);
        Ok(())
    }

    fn quit(&mut self) -> Result<(), EngineError> {
        self.current = None;
        match self.profile.take() {
            Some(profile) => profile.close().map_err(EngineError::from),
            None => Err(EngineError::ShutDown),
        }
    }
}

/// Launches a fresh `SofficeEngine` on each acquisition
#[derive(Debug, Clone)]
pub struct SofficeProvider {
    pub binary: PathBuf,
}

impl SofficeProvider {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl EngineProvider for SofficeProvider {
    fn acquire(&self) -> Result<Box<dyn DocumentEngine>, EngineError> {
        Ok(Box::new(SofficeEngine::launch(&self.binary)?))
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use tracing::Level;

use super::logging::LogEntry;
use super::processing::GuiError;
use crate::core::job::CancelToken;
use crate::core::observer::RunEvent;
use crate::core::params::ConversionParams;

/// How the last run ended, for the status line
#[derive(Clone, Debug, PartialEq)]
pub enum RunSummary {
    Completed { succeeded: usize, failed: usize },
    Cancelled,
    EngineError(String),
}

pub struct HwpdfGui {
    // Inputs
    pub selected_files: Vec<PathBuf>,

    // Settings
    pub params: ConversionParams,
    /// Text field behind `params.engine`; empty means the default engine
    pub engine_path: String,

    // Status
    pub info_message: String,
    pub progress: u8,
    pub is_processing: bool,
    pub stop_requested: bool,
    pub succeeded: usize,
    pub failed: usize,
    pub last_summary: Option<RunSummary>,
    pub processing_start_time: Option<Instant>,
    pub last_processing_duration: Option<Duration>,

    // Dialogs
    /// Inputs whose PDF exists, while the overwrite prompt is open
    pub pending_duplicates: Option<Vec<PathBuf>>,
    pub warning: Option<String>,

    // Background run
    pub cancel_token: Option<CancelToken>,
    pub event_receiver: Option<Receiver<RunEvent>>,

    pub log_messages: Vec<LogEntry>,
}

impl Default for HwpdfGui {
    fn default() -> Self {
        Self {
            selected_files: Vec::new(),
            params: ConversionParams::default(),
            engine_path: String::new(),
            info_message: "Drop HWP/HWPX files or folders here, or click Open.".to_string(),
            progress: 0,
            is_processing: false,
            stop_requested: false,
            succeeded: 0,
            failed: 0,
            last_summary: None,
            processing_start_time: None,
            last_processing_duration: None,
            pending_duplicates: None,
            warning: None,
            cancel_token: None,
            event_receiver: None,
            log_messages: Vec::new(),
        }
    }
}

/// Header comment written before the JSON body of a settings file
const PRESET_HEADER: &str = "// hwpdf settings preset\n// Input files are not stored in presets\n";

pub fn format_log_file(entries: &[LogEntry]) -> String {
    let mut content = String::new();
    content.push_str("=== hwpdf log ===\n");
    content.push_str(&format!("Generated: {}\n", chrono::Local::now().to_rfc3339()));
    content.push_str(&format!("Entries: {}\n", entries.len()));
    content.push_str("=================\n\n");
    for entry in entries {
        let level = match entry.level {
            Level::ERROR => "ERROR",
            Level::WARN => "WARN",
            Level::INFO => "INFO",
            Level::DEBUG => "DEBUG",
            Level::TRACE => "TRACE",
        };
        content.push_str(&format!(
            "[{}] {} {}: {}\n",
            entry.timestamp, level, entry.target, entry.message
        ));
    }
    content
}

/// Parse a settings file, skipping the comment header
pub fn parse_preset(content: &str) -> Result<ConversionParams, GuiError> {
    let json_start = content
        .find('{')
        .ok_or_else(|| GuiError::Preset("no JSON content found".to_string()))?;
    Ok(serde_json::from_str(&content[json_start..])?)
}

pub fn render_preset(params: &ConversionParams) -> Result<String, GuiError> {
    let mut content = String::from(PRESET_HEADER);
    content.push_str(&format!("// Version: {}\n\n", env!("CARGO_PKG_VERSION")));
    content.push_str(&serde_json::to_string_pretty(params)?);
    Ok(content)
}

impl HwpdfGui {
    /// Sync `params.engine` with the text field
    pub fn apply_engine_path(&mut self) {
        let trimmed = self.engine_path.trim();
        self.params.engine = if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        };
    }

    pub fn save_logs_to_file(&self) -> Result<PathBuf, GuiError> {
        if self.log_messages.is_empty() {
            return Err(GuiError::NothingToSave);
        }
        let save_path = rfd::FileDialog::new()
            .add_filter("Log files", &["log", "txt"])
            .set_file_name("hwpdf.log")
            .save_file()
            .ok_or(GuiError::NoLocation)?;

        fs::write(&save_path, format_log_file(&self.log_messages))?;
        tracing::info!(
            "Log saved to: {:?} ({} entries)",
            save_path,
            self.log_messages.len()
        );
        Ok(save_path)
    }

    pub fn save_preset(&mut self) -> Result<PathBuf, GuiError> {
        self.apply_engine_path();
        let save_path = rfd::FileDialog::new()
            .add_filter("hwpdf settings", &["json"])
            .set_file_name("hwpdf_settings.json")
            .save_file()
            .ok_or(GuiError::NoLocation)?;

        fs::write(&save_path, render_preset(&self.params)?)?;
        Ok(save_path)
    }

    pub fn load_preset(&mut self) -> Result<PathBuf, GuiError> {
        let load_path = rfd::FileDialog::new()
            .add_filter("hwpdf settings", &["json"])
            .pick_file()
            .ok_or(GuiError::NoLocation)?;
        self.load_preset_from(&load_path)?;
        Ok(load_path)
    }

    pub fn load_preset_from(&mut self, path: &Path) -> Result<(), GuiError> {
        let params = parse_preset(&fs::read_to_string(path)?)?;
        self.engine_path = params
            .engine
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.params = params;
        Ok(())
    }

    pub fn status_text(&self) -> String {
        if self.is_processing {
            return match self.processing_start_time {
                Some(start) => format!("Converting... {:.1?}", start.elapsed()),
                None => "Converting...".to_string(),
            };
        }
        match self.last_processing_duration {
            Some(duration) => format!("Last run: {:.2?}", duration),
            None => "Ready".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_survives_header() {
        let params = ConversionParams {
            overwrite: true,
            engine: Some(PathBuf::from("/opt/lo/soffice")),
            ..Default::default()
        };
        let text = render_preset(&params).unwrap();
        assert!(text.starts_with("// hwpdf settings preset"));
        assert_eq!(parse_preset(&text).unwrap(), params);
    }

    #[test]
    fn preset_without_json_is_rejected() {
        assert!(matches!(
            parse_preset("// nothing here"),
            Err(GuiError::Preset(_))
        ));
    }

    #[test]
    fn empty_engine_path_means_default() {
        let mut gui = HwpdfGui::default();
        gui.engine_path = "  ".to_string();
        gui.apply_engine_path();
        assert_eq!(gui.params.engine, None);

        gui.engine_path = "/usr/bin/soffice".to_string();
        gui.apply_engine_path();
        assert_eq!(gui.params.engine, Some(PathBuf::from("/usr/bin/soffice")));
    }

    #[test]
    fn log_file_lists_entries() {
        let text = format_log_file(&[LogEntry::run_line("(1/1) Converted: a.hwp")]);
        assert!(text.contains("INFO run: (1/1) Converted: a.hwp"));
        assert!(text.contains("Entries: 1"));
    }
}

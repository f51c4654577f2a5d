use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::time::Instant;

use eframe::egui;
use thiserror::Error;
use tracing::{debug, info};

use super::logging::{LogEntry, push_bounded};
use super::models::{HwpdfGui, RunSummary};
use crate::api::run_plan;
use crate::core::discovery::{JobPlan, collect_dropped, existing_outputs, same_parent};
use crate::core::job::CancelToken;
use crate::core::observer::{ChannelObserver, RunEvent};
use crate::io::SofficeProvider;
use crate::types::{OutcomeStatus, RunState};

/// GUI-specific errors
#[derive(Debug, Error)]
pub enum GuiError {
    #[error("Nothing to save")]
    NothingToSave,

    #[error("No location selected")]
    NoLocation,

    #[error("Invalid settings file: {0}")]
    Preset(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Answer to the "PDF already exists" prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverwriteChoice {
    OverwriteAll,
    Skip,
    Cancel,
}

impl HwpdfGui {
    /// Selection can change only while idle and no overwrite prompt is open
    pub fn can_select(&self) -> bool {
        !self.is_processing && self.pending_duplicates.is_none()
    }

    pub fn open_files(&mut self) {
        if !self.can_select() {
            return;
        }
        let Some(files) = rfd::FileDialog::new()
            .add_filter("HWP documents", &["hwp", "hwpx", "HWP", "HWPX"])
            .add_filter("All files", &["*"])
            .pick_files()
        else {
            return;
        };
        if files.is_empty() {
            return;
        }
        if !same_parent(&files) {
            self.warning = Some("Select files from a single folder.".to_string());
            return;
        }
        self.set_files(files);
    }

    pub fn handle_dropped(&mut self, paths: Vec<PathBuf>) {
        if !self.can_select() || paths.is_empty() {
            return;
        }
        let files = collect_dropped(&paths);
        if files.is_empty() {
            debug!("Drop contained no HWP/HWPX files: {:?}", paths);
            return;
        }
        self.set_files(files);
    }

    pub fn set_files(&mut self, files: Vec<PathBuf>) {
        info!("Selected {} file(s)", files.len());
        self.info_message = format!("{} file(s) selected", files.len());
        self.selected_files = files;
        self.pending_duplicates = None;
        self.progress = 0;
        self.succeeded = 0;
        self.failed = 0;
        self.last_summary = None;
        self.log_messages.clear();
    }

    pub fn can_start(&self) -> bool {
        !self.is_processing && !self.selected_files.is_empty() && self.pending_duplicates.is_none()
    }

    /// Start converting the selection, asking first if some PDFs already exist
    pub fn start_conversion(&mut self, ctx: &egui::Context) {
        if !self.can_start() {
            return;
        }
        self.apply_engine_path();

        let duplicates = existing_outputs(&self.selected_files, self.params.format);
        if !duplicates.is_empty() && !self.params.overwrite {
            self.pending_duplicates = Some(duplicates);
            return;
        }
        let plan = JobPlan::build(self.selected_files.clone(), true, self.params.format);
        self.launch(plan, ctx);
    }

    pub fn resolve_duplicates(&mut self, choice: OverwriteChoice, ctx: &egui::Context) {
        let Some(duplicates) = self.pending_duplicates.take() else {
            return;
        };
        if let Some(plan) = self.plan_for_choice(choice, &duplicates) {
            self.launch(plan, ctx);
        }
    }

    /// The job an answer to the overwrite prompt leads to; None for Cancel
    pub fn plan_for_choice(
        &self,
        choice: OverwriteChoice,
        duplicates: &[PathBuf],
    ) -> Option<JobPlan> {
        match choice {
            OverwriteChoice::Cancel => None,
            OverwriteChoice::OverwriteAll => Some(JobPlan::build(
                self.selected_files.clone(),
                true,
                self.params.format,
            )),
            OverwriteChoice::Skip => {
                let (skipped, files): (Vec<_>, Vec<_>) = self
                    .selected_files
                    .iter()
                    .cloned()
                    .partition(|f| duplicates.contains(f));
                Some(JobPlan {
                    discovered: self.selected_files.len(),
                    files,
                    skipped,
                })
            }
        }
    }

    fn launch(&mut self, plan: JobPlan, ctx: &egui::Context) {
        self.is_processing = true;
        self.stop_requested = false;
        self.progress = 0;
        self.succeeded = 0;
        self.failed = 0;
        self.last_summary = None;
        self.processing_start_time = Some(Instant::now());
        self.last_processing_duration = None;
        self.info_message = format!("Converting {} file(s)...", plan.files.len());

        let cancel = CancelToken::new();
        self.cancel_token = Some(cancel.clone());
        let (tx, rx) = mpsc::channel();
        self.event_receiver = Some(rx);

        let params = self.params.clone();
        let provider = SofficeProvider::new(params.engine_binary());
        let repaint = ctx.clone();

        std::thread::spawn(move || {
            let observer = ChannelObserver::new(tx).with_notify(move || repaint.request_repaint());
            if let Err(e) = run_plan(plan, provider, &params, cancel, &observer) {
                observer.send(RunEvent::Failed(e.to_string()));
            }
        });
        info!("Conversion started in background thread");
    }

    pub fn stop_conversion(&mut self) {
        if !self.is_processing || self.stop_requested {
            return;
        }
        if let Some(cancel) = &self.cancel_token {
            cancel.cancel();
            self.stop_requested = true;
            self.info_message = "Stopping after the current file...".to_string();
        }
    }

    /// Drain worker events; returns true when anything changed
    pub fn poll_events(&mut self) -> bool {
        let Some(receiver) = &self.event_receiver else {
            return false;
        };

        let mut events = Vec::new();
        let mut disconnected = false;
        loop {
            match receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        let changed = !events.is_empty();
        for event in events {
            self.apply_event(event);
        }
        if disconnected && self.is_processing {
            self.finish(RunSummary::EngineError(
                "conversion worker stopped unexpectedly".to_string(),
            ));
        }
        changed || disconnected
    }

    pub fn apply_event(&mut self, event: RunEvent) {
        match event {
            RunEvent::Log(line) => push_bounded(&mut self.log_messages, [LogEntry::run_line(&line)]),
            RunEvent::Progress(percent) => self.progress = self.progress.max(percent),
            RunEvent::Outcome(outcome) => match outcome.status {
                OutcomeStatus::Succeeded => self.succeeded += 1,
                OutcomeStatus::Failed => self.failed += 1,
                OutcomeStatus::Skipped => {}
            },
            RunEvent::Finished(RunState::Cancelled) => self.finish(RunSummary::Cancelled),
            RunEvent::Finished(_) => self.finish(RunSummary::Completed {
                succeeded: self.succeeded,
                failed: self.failed,
            }),
            RunEvent::Failed(message) => {
                push_bounded(
                    &mut self.log_messages,
                    [LogEntry::new(
                        tracing::Level::ERROR,
                        message.clone(),
                        "engine".to_string(),
                    )],
                );
                self.finish(RunSummary::EngineError(message));
            }
        }
    }

    fn finish(&mut self, summary: RunSummary) {
        if let Some(start) = self.processing_start_time.take() {
            self.last_processing_duration = Some(start.elapsed());
        }
        self.info_message = match &summary {
            RunSummary::Cancelled => "Conversion was cancelled.".to_string(),
            RunSummary::Completed { succeeded, failed: 0 } => {
                format!("All {} file(s) converted successfully.", succeeded)
            }
            RunSummary::Completed { succeeded, failed } => {
                format!("Finished: {} converted, {} failed.", succeeded, failed)
            }
            RunSummary::EngineError(message) => {
                format!("Could not start the document engine: {}", message)
            }
        };
        self.last_summary = Some(summary);
        self.is_processing = false;
        self.stop_requested = false;
        self.cancel_token = None;
        self.event_receiver = None;
    }
}

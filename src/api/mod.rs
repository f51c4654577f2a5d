//! High-level, ergonomic library API: plan a batch from a folder or file list,
//! run it against an engine, and get a `BatchReport` tally. Both front ends go
//! through these entry points.
use std::cell::Cell;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::discovery::{self, JobPlan};
use crate::core::job::CancelToken;
use crate::core::observer::RunObserver;
use crate::core::params::ConversionParams;
use crate::core::runner::BatchRunner;
use crate::error::Result;
use crate::io::{EngineProvider, SofficeProvider};
use crate::types::{ConversionOutcome, OutcomeStatus, RunState, display_name};

/// Batch conversion report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub state: RunState,
}

impl BatchReport {
    fn record(&mut self, status: OutcomeStatus) {
        match status {
            OutcomeStatus::Succeeded => self.succeeded += 1,
            OutcomeStatus::Failed => self.failed += 1,
            OutcomeStatus::Skipped => self.skipped += 1,
        }
    }
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "converted={} failed={} skipped={}",
            self.succeeded, self.failed, self.skipped
        )?;
        if self.state == RunState::Cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

/// Passes everything through to `inner` while counting outcomes
struct TallyObserver<'a> {
    inner: &'a dyn RunObserver,
    report: Cell<BatchReport>,
}

impl RunObserver for TallyObserver<'_> {
    fn log(&self, line: &str) {
        self.inner.log(line);
    }

    fn progress(&self, percent: u8) {
        self.inner.progress(percent);
    }

    fn outcome(&self, outcome: &ConversionOutcome) {
        let mut report = self.report.get();
        report.record(outcome.status);
        self.report.set(report);
        self.inner.outcome(outcome);
    }

    fn finished(&self, state: RunState) {
        let mut report = self.report.get();
        report.state = state;
        self.report.set(report);
        self.inner.finished(state);
    }
}

pub fn skipped_line(input: &Path) -> String {
    format!("Skipped (PDF already exists): {}", display_name(input))
}

/// Discover inputs (see [`discovery::plan`])
pub fn plan_job(
    folder: Option<&Path>,
    files: &[PathBuf],
    params: &ConversionParams,
) -> Result<JobPlan> {
    discovery::plan(folder, files, params)
}

/// Report skipped inputs and the empty-plan reason, then run the plan.
///
/// Per-item failures end up in the report; the only error is a failure to
/// acquire the engine.
pub fn run_plan<P: EngineProvider>(
    plan: JobPlan,
    provider: P,
    params: &ConversionParams,
    cancel: CancelToken,
    observer: &dyn RunObserver,
) -> Result<BatchReport> {
    let tally = TallyObserver {
        inner: observer,
        report: Cell::new(BatchReport::default()),
    };

    for input in &plan.skipped {
        tally.log(&skipped_line(input));
        tally.outcome(&ConversionOutcome::skipped(input, "output already exists"));
    }
    if let Some(reason) = plan.empty_reason() {
        tally.log(&reason.to_string());
    }

    info!(
        "Starting batch: {} to convert, {} skipped",
        plan.files.len(),
        plan.skipped.len()
    );
    let job = plan.into_job(cancel);
    BatchRunner::new(provider)
        .with_format(params.format)
        .run(job, &tally)?;

    Ok(tally.report.get())
}

/// Plan and run a batch with the LibreOffice engine configured in `params`
pub fn convert_paths(
    folder: Option<&Path>,
    files: &[PathBuf],
    params: &ConversionParams,
    cancel: CancelToken,
    observer: &dyn RunObserver,
) -> Result<BatchReport> {
    let plan = plan_job(folder, files, params)?;
    let provider = SofficeProvider::new(params.engine_binary());
    run_plan(plan, provider, params, cancel, observer)
}

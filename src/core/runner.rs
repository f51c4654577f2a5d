//! Sequential, cancellable batch conversion.
//!
//! The runner walks a `ConversionJob` in order, converting one file at a time
//! through a `DocumentEngine`. A failing item is logged and the batch moves on.
//! Cancellation is honoured between items only; an item that has started
//! always runs to completion.
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::discovery::output_path_for;
use super::job::ConversionJob;
use super::observer::RunObserver;
use crate::error::Result;
use crate::io::{DocumentEngine, EngineError, EngineProvider};
use crate::types::{ConversionOutcome, ExportFormat, RunState, display_name};

pub const NOTHING_TO_CONVERT: &str = "Nothing to convert.";
pub const CANCELLED: &str = "(cancelled) Conversion stopped by user.";

pub fn starting_line(index: usize, total: usize, input: &Path) -> String {
    format!("({}/{}) Converting: {}", index, total, display_name(input))
}

pub fn completed_line(index: usize, total: usize, input: &Path) -> String {
    format!("({}/{}) Converted: {}", index, total, display_name(input))
}

pub fn failed_line(index: usize, total: usize, input: &Path, err: &EngineError) -> String {
    format!(
        "({}/{}) Failed: {} -> {}",
        index,
        total,
        display_name(input),
        err
    )
}

fn convert_one(
    engine: &mut dyn DocumentEngine,
    input: &Path,
    format: ExportFormat,
) -> std::result::Result<PathBuf, EngineError> {
    let output = output_path_for(input, format);
    engine.open(input)?;
    engine.save_as(&output, format)?;
    Ok(output)
}

pub struct BatchRunner<P: EngineProvider> {
    provider: P,
    format: ExportFormat,
    state: RunState,
}

impl<P: EngineProvider> BatchRunner<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            format: ExportFormat::Pdf,
            state: RunState::Idle,
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run `job` to completion or cancellation.
    ///
    /// Returns the terminal state. The only error is a failure to acquire the
    /// engine, in which case no completion signal is sent.
    pub fn run(&mut self, mut job: ConversionJob, observer: &dyn RunObserver) -> Result<RunState> {
        self.state = RunState::Running;
        let total = job.total();

        if job.is_empty() {
            info!("{}", NOTHING_TO_CONVERT);
            observer.log(NOTHING_TO_CONVERT);
            return Ok(self.finish(RunState::Completed, observer));
        }

        let mut engine = match self.provider.acquire() {
            Ok(engine) => engine,
            Err(e) => {
                debug!("Could not start the document engine: {}", e);
                self.state = RunState::Idle;
                return Err(e.into());
            }
        };

        let cancel = job.cancel_token();
        let mut state = RunState::Completed;

        for index in 1..=total {
            if cancel.is_cancelled() {
                info!(
                    "Cancellation observed after {} of {} item(s)",
                    job.completed(),
                    total
                );
                observer.log(CANCELLED);
                state = RunState::Cancelled;
                break;
            }

            let input = job.files()[index - 1].clone();
            observer.log(&starting_line(index, total, &input));

            match convert_one(engine.as_mut(), &input, self.format) {
                Ok(output) => {
                    debug!("Converted {:?} -> {:?}", input, output);
                    observer.log(&completed_line(index, total, &input));
                    observer.outcome(&ConversionOutcome::succeeded(&input));
                }
                Err(e) => {
                    debug!("Error converting {:?}: {}", input, e);
                    observer.log(&failed_line(index, total, &input, &e));
                    observer.outcome(&ConversionOutcome::failed(&input, &e));
                }
            }

            job.mark_completed();
            observer.progress(job.percent());
        }

        if let Err(e) = engine.quit() {
            warn!("Document engine teardown failed (ignored): {}", e);
        }

        Ok(self.finish(state, observer))
    }

    fn finish(&mut self, state: RunState, observer: &dyn RunObserver) -> RunState {
        self.state = state;
        observer.finished(state);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        opened: Vec<PathBuf>,
        quits: usize,
    }

    struct ScriptedEngine {
        calls: Rc<RefCell<Calls>>,
        fail_quit: bool,
    }

    impl DocumentEngine for ScriptedEngine {
        fn open(&mut self, input: &Path) -> std::result::Result<(), EngineError> {
            self.calls.borrow_mut().opened.push(input.to_path_buf());
            Ok(())
        }

        fn save_as(&mut self, _: &Path, _: ExportFormat) -> std::result::Result<(), EngineError> {
            Ok(())
        }

        fn quit(&mut self) -> std::result::Result<(), EngineError> {
            self.calls.borrow_mut().quits += 1;
            if self.fail_quit {
                Err(EngineError::Other("quit refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        lines: RefCell<Vec<String>>,
        finished: RefCell<Vec<RunState>>,
    }

    impl RunObserver for Recorder {
        fn log(&self, line: &str) {
            self.lines.borrow_mut().push(line.to_string());
        }

        fn progress(&self, _: u8) {}

        fn finished(&self, state: RunState) {
            self.finished.borrow_mut().push(state);
        }
    }

    #[test]
    fn teardown_failure_still_finishes_once() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let shared = calls.clone();
        let provider = move || -> std::result::Result<ScriptedEngine, EngineError> {
            Ok(ScriptedEngine {
                calls: shared.clone(),
                fail_quit: true,
            })
        };
        let recorder = Recorder::default();
        let mut runner = BatchRunner::new(provider);

        let job = ConversionJob::new(vec![PathBuf::from("/docs/a.hwp")]);
        let state = runner.run(job, &recorder).unwrap();

        assert_eq!(state, RunState::Completed);
        assert_eq!(runner.state(), RunState::Completed);
        assert_eq!(calls.borrow().opened, vec![PathBuf::from("/docs/a.hwp")]);
        assert_eq!(calls.borrow().quits, 1);
        assert_eq!(*recorder.finished.borrow(), vec![RunState::Completed]);
    }

    #[test]
    fn acquisition_failure_propagates_without_finishing() {
        let provider =
            || -> std::result::Result<ScriptedEngine, EngineError> { Err(EngineError::NoDocument) };
        let recorder = Recorder::default();
        let mut runner = BatchRunner::new(provider);

        let job = ConversionJob::new(vec![PathBuf::from("/docs/a.hwp")]);
        let err = runner.run(job, &recorder).unwrap_err();

        assert!(matches!(err, crate::Error::Engine(EngineError::NoDocument)));
        assert!(recorder.finished.borrow().is_empty());
        assert_eq!(runner.state(), RunState::Idle);
    }

    #[test]
    fn line_formats() {
        let input = Path::new("/docs/report.hwpx");
        assert_eq!(starting_line(2, 5, input), "(2/5) Converting: report.hwpx");
        assert_eq!(completed_line(2, 5, input), "(2/5) Converted: report.hwpx");
        assert_eq!(
            failed_line(2, 5, input, &EngineError::NoDocument),
            "(2/5) Failed: report.hwpx -> no document is open"
        );
    }
}

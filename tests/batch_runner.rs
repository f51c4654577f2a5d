use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc;

use hwpdf::core::runner::{CANCELLED, NOTHING_TO_CONVERT};
use hwpdf::{
    BatchRunner, CancelToken, ChannelObserver, ConversionJob, ConversionOutcome, ConversionParams,
    DocumentEngine, EngineError, ExportFormat, JobPlan, OutcomeStatus, RunEvent, RunObserver,
    RunState,
};

/// Fake engine: records calls, fails on chosen file names, and can trip a
/// cancel token after a given number of saves.
#[derive(Default)]
struct FakeState {
    opened: Vec<PathBuf>,
    saved: Vec<PathBuf>,
    quits: usize,
}

struct FakeEngine {
    state: Rc<RefCell<FakeState>>,
    fail_on: Vec<String>,
    cancel_after: Option<(usize, CancelToken)>,
}

impl DocumentEngine for FakeEngine {
    fn open(&mut self, input: &Path) -> Result<(), EngineError> {
        self.state.borrow_mut().opened.push(input.to_path_buf());
        let name = input.file_name().unwrap().to_string_lossy().into_owned();
        if self.fail_on.contains(&name) {
            return Err(EngineError::Other(format!("cannot open {}", name)));
        }
        Ok(())
    }

    fn save_as(&mut self, output: &Path, format: ExportFormat) -> Result<(), EngineError> {
        assert_eq!(format, ExportFormat::Pdf);
        let mut state = self.state.borrow_mut();
        state.saved.push(output.to_path_buf());
        if let Some((after, token)) = &self.cancel_after {
            if state.saved.len() == *after {
                token.cancel();
            }
        }
        Ok(())
    }

    fn quit(&mut self) -> Result<(), EngineError> {
        self.state.borrow_mut().quits += 1;
        Ok(())
    }
}

#[derive(Default)]
struct Recorder {
    lines: RefCell<Vec<String>>,
    progress: RefCell<Vec<u8>>,
    outcomes: RefCell<Vec<ConversionOutcome>>,
    finished: RefCell<Vec<RunState>>,
}

impl RunObserver for Recorder {
    fn log(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }

    fn progress(&self, percent: u8) {
        self.progress.borrow_mut().push(percent);
    }

    fn outcome(&self, outcome: &ConversionOutcome) {
        self.outcomes.borrow_mut().push(outcome.clone());
    }

    fn finished(&self, state: RunState) {
        self.finished.borrow_mut().push(state);
    }
}

impl Recorder {
    fn count(&self, needle: &str) -> usize {
        self.lines
            .borrow()
            .iter()
            .filter(|l| l.contains(needle))
            .count()
    }
}

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| PathBuf::from("/docs").join(n)).collect()
}

fn fake_provider(
    state: Rc<RefCell<FakeState>>,
    fail_on: &[&str],
    cancel_after: Option<(usize, CancelToken)>,
) -> impl Fn() -> Result<FakeEngine, EngineError> {
    let fail_on: Vec<String> = fail_on.iter().map(|s| s.to_string()).collect();
    move || {
        Ok(FakeEngine {
            state: state.clone(),
            fail_on: fail_on.clone(),
            cancel_after: cancel_after.clone(),
        })
    }
}

#[test]
fn failing_item_does_not_abort_the_batch() {
    let state = Rc::new(RefCell::new(FakeState::default()));
    let mut runner = BatchRunner::new(fake_provider(state.clone(), &["b.hwp"], None));
    let recorder = Recorder::default();

    let job = ConversionJob::new(paths(&["a.hwp", "b.hwp", "c.hwpx"]));
    let result = runner.run(job, &recorder).unwrap();

    assert_eq!(result, RunState::Completed);
    assert_eq!(recorder.count("Failed:"), 1);
    assert_eq!(
        recorder.lines.borrow()[3],
        "(2/3) Failed: b.hwp -> cannot open b.hwp"
    );
    assert_eq!(recorder.count("(3/3) Converting: c.hwpx"), 1);
    assert_eq!(recorder.count("(3/3) Converted: c.hwpx"), 1);
    assert_eq!(*recorder.progress.borrow(), vec![33, 66, 100]);
    assert_eq!(*recorder.finished.borrow(), vec![RunState::Completed]);

    let statuses: Vec<OutcomeStatus> = recorder.outcomes.borrow().iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![OutcomeStatus::Succeeded, OutcomeStatus::Failed, OutcomeStatus::Succeeded]
    );
    assert_eq!(
        state.borrow().saved,
        vec![PathBuf::from("/docs/a.pdf"), PathBuf::from("/docs/c.pdf")]
    );
    assert_eq!(state.borrow().quits, 1);
}

#[test]
fn cancellation_after_first_item_stops_before_the_next() {
    let state = Rc::new(RefCell::new(FakeState::default()));
    let job = ConversionJob::new(paths(&["a.hwp", "b.hwp", "c.hwp"]));
    let token = job.cancel_token();
    let mut runner = BatchRunner::new(fake_provider(state.clone(), &[], Some((1, token))));
    let recorder = Recorder::default();

    let result = runner.run(job, &recorder).unwrap();

    assert_eq!(result, RunState::Cancelled);
    assert_eq!(recorder.count("Converting:"), 1);
    assert_eq!(recorder.count("(2/3)"), 0);
    assert_eq!(recorder.count("(3/3)"), 0);
    assert_eq!(recorder.count(CANCELLED), 1);
    assert_eq!(*recorder.progress.borrow(), vec![33]);
    assert_eq!(*recorder.finished.borrow(), vec![RunState::Cancelled]);
    assert_eq!(state.borrow().quits, 1);
}

#[test]
fn cancelled_before_start_converts_nothing() {
    let state = Rc::new(RefCell::new(FakeState::default()));
    let job = ConversionJob::new(paths(&["a.hwp", "b.hwp"]));
    job.cancel_token().cancel();
    let mut runner = BatchRunner::new(fake_provider(state.clone(), &[], None));
    let recorder = Recorder::default();

    assert_eq!(runner.run(job, &recorder).unwrap(), RunState::Cancelled);
    assert!(state.borrow().opened.is_empty());
    assert_eq!(*recorder.lines.borrow(), vec![CANCELLED.to_string()]);
    assert!(recorder.progress.borrow().is_empty());
    assert_eq!(state.borrow().quits, 1);
}

#[test]
fn empty_job_never_touches_the_engine() {
    let acquired = Rc::new(RefCell::new(0usize));
    let counter = acquired.clone();
    let state = Rc::new(RefCell::new(FakeState::default()));
    let inner = fake_provider(state, &[], None);
    let provider = move || {
        *counter.borrow_mut() += 1;
        inner()
    };
    let mut runner = BatchRunner::new(provider);
    let recorder = Recorder::default();

    let result = runner.run(ConversionJob::new(Vec::new()), &recorder).unwrap();

    assert_eq!(result, RunState::Completed);
    assert_eq!(*acquired.borrow(), 0);
    assert_eq!(*recorder.lines.borrow(), vec![NOTHING_TO_CONVERT.to_string()]);
    assert_eq!(*recorder.finished.borrow(), vec![RunState::Completed]);
}

#[test]
fn line_and_progress_bounds_hold_for_many_sizes() {
    for total in 1..=12usize {
        for cancel_at in 0..=total {
            let state = Rc::new(RefCell::new(FakeState::default()));
            let names: Vec<String> = (0..total).map(|i| format!("f{}.hwp", i)).collect();
            let job = ConversionJob::new(names.iter().map(|n| PathBuf::from("/d").join(n)).collect());
            let cancel_after = (cancel_at > 0).then(|| (cancel_at, job.cancel_token()));
            let mut runner = BatchRunner::new(fake_provider(state, &["f1.hwp"], cancel_after));
            let recorder = Recorder::default();

            runner.run(job, &recorder).unwrap();

            let starts = recorder.count("Converting:");
            let cancels = recorder.count(CANCELLED);
            assert!(starts + cancels <= total + 1);

            let progress = recorder.progress.borrow();
            assert!(progress.windows(2).all(|w| w[0] <= w[1]));
            assert!(progress.iter().all(|p| *p <= 100));
            assert_eq!(recorder.finished.borrow().len(), 1);
        }
    }
}

#[test]
fn overwrite_false_excludes_existing_output_before_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.hwp");
    let b = dir.path().join("b.hwp");
    std::fs::write(&a, b"a").unwrap();
    std::fs::write(&b, b"b").unwrap();
    std::fs::write(dir.path().join("a.pdf"), b"old").unwrap();

    let params = ConversionParams::default();
    let plan = hwpdf::plan_job(None, &[a.clone(), b.clone()], &params).unwrap();
    assert_eq!(plan.skipped, vec![a]);
    let job = plan.into_job(CancelToken::new());
    assert_eq!(job.total(), 1);
    assert_eq!(job.files(), &[b]);
}

#[test]
fn repeated_runs_produce_the_same_log_shape() {
    let run_once = || {
        let state = Rc::new(RefCell::new(FakeState::default()));
        let plan = JobPlan::build(paths(&["a.hwp", "b.hwpx"]), true, ExportFormat::Pdf);
        let mut runner = BatchRunner::new(fake_provider(state, &[], None));
        let recorder = Recorder::default();
        runner.run(plan.into_job(CancelToken::new()), &recorder).unwrap();
        let lines = recorder.lines.borrow().clone();
        let progress = recorder.progress.borrow().clone();
        (lines, progress)
    };

    assert_eq!(run_once(), run_once());
}

#[test]
fn channel_observer_delivers_a_single_finished_event_across_threads() {
    let (tx, rx) = mpsc::channel();
    let job = ConversionJob::new(paths(&["a.hwp", "b.hwp"]));

    let worker = std::thread::spawn(move || {
        struct Quiet;
        impl DocumentEngine for Quiet {
            fn open(&mut self, _: &Path) -> Result<(), EngineError> {
                Ok(())
            }
            fn save_as(&mut self, _: &Path, _: ExportFormat) -> Result<(), EngineError> {
                Ok(())
            }
            fn quit(&mut self) -> Result<(), EngineError> {
                Ok(())
            }
        }
        let observer = ChannelObserver::new(tx);
        BatchRunner::new(|| Ok::<_, EngineError>(Quiet))
            .run(job, &observer)
            .unwrap()
    });

    assert_eq!(worker.join().unwrap(), RunState::Completed);
    let events: Vec<RunEvent> = rx.iter().collect();
    let finished = events
        .iter()
        .filter(|e| matches!(e, RunEvent::Finished(_)))
        .count();
    assert_eq!(finished, 1);
    assert_eq!(events.last(), Some(&RunEvent::Finished(RunState::Completed)));
    assert!(events.contains(&RunEvent::Progress(100)));
}

//! The presentation boundary of a batch run: everything a front end learns
//! about a run arrives through a `RunObserver`.
use std::sync::mpsc::Sender;

use crate::types::{ConversionOutcome, RunState};

/// Sinks for a batch run. Implementations must be cheap hand-offs; the runner
/// calls them on its own thread.
pub trait RunObserver {
    /// A human-readable log line
    fn log(&self, line: &str);

    /// Percentage in `0..=100`, non-decreasing within a run
    fn progress(&self, percent: u8);

    /// Per-item result, reported as soon as it is known
    fn outcome(&self, _outcome: &ConversionOutcome) {}

    /// Terminal signal, emitted exactly once per run
    fn finished(&self, state: RunState);
}

/// Message form of the observer callbacks, for front ends that live on another thread
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Log(String),
    Progress(u8),
    Outcome(ConversionOutcome),
    Finished(RunState),
    /// The run could not start (engine acquisition failed)
    Failed(String),
}

/// Forwards observer callbacks over an mpsc channel. Send errors (receiver
/// gone) are ignored.
pub struct ChannelObserver {
    tx: Sender<RunEvent>,
    notify: Option<Box<dyn Fn() + Send + Sync>>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<RunEvent>) -> Self {
        Self { tx, notify: None }
    }

    /// Call `notify` after every event, e.g. to wake up a UI event loop
    pub fn with_notify(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Some(Box::new(notify));
        self
    }

    pub fn send(&self, event: RunEvent) {
        let _ = self.tx.send(event);
        if let Some(notify) = &self.notify {
            notify();
        }
    }
}

impl RunObserver for ChannelObserver {
    fn log(&self, line: &str) {
        self.send(RunEvent::Log(line.to_string()));
    }

    fn progress(&self, percent: u8) {
        self.send(RunEvent::Progress(percent));
    }

    fn outcome(&self, outcome: &ConversionOutcome) {
        self.send(RunEvent::Outcome(outcome.clone()));
    }

    fn finished(&self, state: RunState) {
        self.send(RunEvent::Finished(state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    #[test]
    fn forwards_events_in_order_and_notifies() {
        let (tx, rx) = mpsc::channel();
        let wakeups = Arc::new(AtomicUsize::new(0));
        let counter = wakeups.clone();
        let observer = ChannelObserver::new(tx).with_notify(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        observer.log("hello");
        observer.progress(50);
        observer.finished(RunState::Completed);

        let events: Vec<RunEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                RunEvent::Log("hello".to_string()),
                RunEvent::Progress(50),
                RunEvent::Finished(RunState::Completed),
            ]
        );
        assert_eq!(wakeups.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn dropped_receiver_is_not_an_error() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        ChannelObserver::new(tx).log("nobody listens");
    }
}

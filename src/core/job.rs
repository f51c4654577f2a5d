use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag shared between a front end and the runner.
/// The runner only checks it between items.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A fixed, ordered list of inputs for a single run. Consumed by the runner.
#[derive(Debug)]
pub struct ConversionJob {
    files: Vec<PathBuf>,
    cancel: CancelToken,
    completed: usize,
}

impl ConversionJob {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self::with_cancel_token(files, CancelToken::new())
    }

    pub fn with_cancel_token(files: Vec<PathBuf>, cancel: CancelToken) -> Self {
        Self {
            files,
            cancel,
            completed: 0,
        }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub(crate) fn mark_completed(&mut self) {
        debug_assert!(self.completed < self.files.len());
        self.completed = (self.completed + 1).min(self.files.len());
    }

    /// Percentage of items done, rounded down
    pub fn percent(&self) -> u8 {
        percent(self.completed, self.total())
    }
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_down() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 66);
        assert_eq!(percent(3, 3), 100);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let job = ConversionJob::new(vec![PathBuf::from("/a.hwp")]);
        let token = job.cancel_token();
        assert!(!job.cancel_token().is_cancelled());
        token.cancel();
        assert!(job.cancel_token().is_cancelled());
    }

    #[test]
    fn completed_never_exceeds_total() {
        let mut job = ConversionJob::new(vec![PathBuf::from("/a.hwp")]);
        job.mark_completed();
        assert_eq!(job.completed(), 1);
        assert_eq!(job.percent(), 100);
    }
}

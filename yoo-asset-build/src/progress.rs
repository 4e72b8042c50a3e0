//! Progress reporting for long-running build tasks

/// Receives progress at fixed checkpoints of a build task
pub trait ProgressReporter: Send + Sync {
    /// `current` of `total` steps of `title` are done
    fn report(&self, title: &str, current: usize, total: usize);

    /// The task finished or stopped reporting
    fn finish(&self) {}
}

/// Discards all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _title: &str, _current: usize, _total: usize) {}
}

impl<F> ProgressReporter for F
where
    F: Fn(&str, usize, usize) + Send + Sync,
{
    fn report(&self, title: &str, current: usize, total: usize) {
        self(title, current, total)
    }
}

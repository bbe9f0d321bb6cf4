//! ProgressObserver - optional progress reporting hook
//!
//! The engine invokes the observer synchronously at coarse milestones with a
//! non-decreasing percentage and a short phase label. Correctness never
//! depends on it; absence is a no-op.

/// Sink for `(phase, percent)` progress events.
///
/// Implementations must be cheap and must not block: the engine calls this
/// from inside its single-threaded transform.
pub trait ProgressObserver: Send + Sync {
    /// Report a milestone. `percent` is in 0..=100 and never decreases within
    /// one engine run.
    fn report(&self, phase: &str, percent: f64);
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn report(&self, _phase: &str, _percent: f64) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(&str, f64) + Send + Sync,
{
    fn report(&self, phase: &str, percent: f64) {
        self(phase, percent)
    }
}

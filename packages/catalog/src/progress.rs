//! Progress reporting for loaders that walk many files.
//!
//! Loaders report through [`ProgressCallback`] so they stay independent of
//! how (or whether) progress is drawn. The CLI supplies an `indicatif`
//! implementation; tests and library callers use [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from a long-running load.
pub trait ProgressCallback: Send + Sync {
    /// Sets the total units of work.
    fn set_total(&self, total: u64);

    /// Sets the absolute position.
    fn set_position(&self, pos: u64);

    /// Advances by `delta` units.
    fn inc(&self, delta: u64);

    /// Replaces the message shown next to the indicator.
    fn set_message(&self, msg: String);

    /// Marks the work complete with a final message.
    fn finish(&self, msg: String);

    /// Marks the work complete and removes the indicator.
    fn finish_and_clear(&self);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn set_position(&self, _pos: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// A shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_progress_accepts_every_update() {
        let progress = null_progress();
        progress.set_total(3);
        progress.inc(1);
        progress.set_position(2);
        progress.set_message("Hospital.csv".to_string());
        progress.finish("done".to_string());
        progress.finish_and_clear();
    }
}

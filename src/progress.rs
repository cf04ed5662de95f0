//! Progress reporting.
//!
//! The extraction loop knows nothing about how progress is shown. After every
//! processed frame it hands a [`ProgressInfo`] to a [`ProgressCallback`],
//! synchronously and on the extraction thread, before touching the next
//! frame. A terminal progress bar, a log line, or a GUI widget each subscribe
//! by implementing the trait.
//!
//! [`ChannelProgress`] forwards every update into an [`mpsc`] channel, so a
//! UI thread can drain updates at its own pace without the loop knowing.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framedump::{ExtractionConfig, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{} ({} written)", info.percentage_label(), info.frames_written);
//!     }
//! }
//!
//! let config = ExtractionConfig::new().with_progress(Arc::new(PrintProgress));
//! ```

use std::{
    sync::{Arc, mpsc::Sender},
    time::{Duration, Instant},
};

/// A snapshot taken right after one frame was processed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInfo {
    /// Frames processed so far, written or skipped. Equals the last frame
    /// index plus one.
    pub current: u64,
    /// The source's frame-count estimate. Zero when unknown.
    pub total: u64,
    /// `current / total * 100`, or `None` when `total` is zero.
    ///
    /// Not clamped: a container that under-reports its frame count pushes
    /// this past 100.
    pub percentage: Option<f64>,
    /// Frames encoded to disk so far.
    pub frames_written: u64,
    /// Frames dropped as near-duplicates so far.
    pub frames_skipped: u64,
    /// Wall-clock time since the loop started.
    pub elapsed: Duration,
}

impl ProgressInfo {
    /// The percentage with two decimals, e.g. `"42.17%"`, or `"--"` when the
    /// total is unknown.
    pub fn percentage_label(&self) -> String {
        match self.percentage {
            Some(percentage) => format!("{percentage:.2}%"),
            None => "--".to_string(),
        }
    }
}

/// Receives progress updates during extraction.
///
/// Callbacks observe only; they cannot stop the loop. `Send + Sync` so one
/// can be built on a UI thread and handed to a worker.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards every update. The default when nothing is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Forwards updates into a channel.
///
/// Send errors are ignored: a receiver that went away (a closed window)
/// does not stop the extraction.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: Sender<ProgressInfo>,
}

impl ChannelProgress {
    pub fn new(sender: Sender<ProgressInfo>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let _ = self.sender.send(info.clone());
    }
}

/// Builds snapshots and delivers them to the configured callback.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: u64) -> Self {
        Self {
            callback,
            total,
            start_time: Instant::now(),
        }
    }

    pub(crate) fn report(&self, current: u64, frames_written: u64, frames_skipped: u64) {
        let percentage =
            (self.total > 0).then(|| current as f64 / self.total as f64 * 100.0);

        self.callback.on_progress(&ProgressInfo {
            current,
            total: self.total,
            percentage,
            frames_written,
            frames_skipped,
            elapsed: self.start_time.elapsed(),
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn last_frame_of_accurate_estimate_is_exactly_one_hundred() {
        let (sender, receiver) = mpsc::channel();
        let tracker = ProgressTracker::new(Arc::new(ChannelProgress::new(sender)), 7);
        tracker.report(7, 7, 0);

        let info = receiver.recv().unwrap();
        assert_eq!(info.percentage, Some(100.0));
        assert_eq!(info.percentage_label(), "100.00%");
    }

    #[test]
    fn under_reported_total_exceeds_one_hundred() {
        let (sender, receiver) = mpsc::channel();
        let tracker = ProgressTracker::new(Arc::new(ChannelProgress::new(sender)), 4);
        tracker.report(5, 5, 0);
        assert_eq!(receiver.recv().unwrap().percentage_label(), "125.00%");
    }

    #[test]
    fn unknown_total_has_no_percentage() {
        let (sender, receiver) = mpsc::channel();
        let tracker = ProgressTracker::new(Arc::new(ChannelProgress::new(sender)), 0);
        tracker.report(3, 2, 1);

        let info = receiver.recv().unwrap();
        assert_eq!(info.percentage, None);
        assert_eq!(info.percentage_label(), "--");
        assert_eq!((info.frames_written, info.frames_skipped), (2, 1));
    }

    #[test]
    fn label_rounds_to_two_decimals() {
        let (sender, receiver) = mpsc::channel();
        let tracker = ProgressTracker::new(Arc::new(ChannelProgress::new(sender)), 3);
        tracker.report(1, 1, 0);
        assert_eq!(receiver.recv().unwrap().percentage_label(), "33.33%");
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (sender, receiver) = mpsc::channel();
        drop(receiver);
        ChannelProgress::new(sender).on_progress(&ProgressInfo {
            current: 1,
            total: 1,
            percentage: Some(100.0),
            frames_written: 1,
            frames_skipped: 0,
            elapsed: Duration::ZERO,
        });
    }
}

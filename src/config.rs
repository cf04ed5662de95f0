//! Extraction configuration.
//!
//! [`ExtractionConfig`] threads the duplicate-skip toggle and the progress
//! callback through [`FrameExtractor`](crate::FrameExtractor) and
//! [`extract_video`](crate::extract_video).
//!
//! ```no_run
//! use std::sync::{Arc, mpsc};
//!
//! use framedump::{ChannelProgress, ExtractionConfig};
//!
//! let (sender, _receiver) = mpsc::channel();
//! let config = ExtractionConfig::new()
//!     .with_skip_near_duplicates(true)
//!     .with_progress(Arc::new(ChannelProgress::new(sender)));
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::progress::{NoOpProgress, ProgressCallback};

/// Settings for one extraction run.
///
/// A default config writes every frame and reports progress nowhere.
#[derive(Clone)]
pub struct ExtractionConfig {
    pub(crate) skip_near_duplicates: bool,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for ExtractionConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractionConfig")
            .field("skip_near_duplicates", &self.skip_near_duplicates)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionConfig {
    pub fn new() -> Self {
        Self {
            skip_near_duplicates: false,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Drop frames whose SSIM against the preceding input frame exceeds
    /// [`DEFAULT_SIMILARITY_THRESHOLD`](crate::similarity::DEFAULT_SIMILARITY_THRESHOLD).
    /// Dropped frames still consume their index.
    #[must_use]
    pub fn with_skip_near_duplicates(mut self, skip: bool) -> Self {
        self.skip_near_duplicates = skip;
        self
    }

    /// Attach a progress callback, invoked once per processed frame.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    pub fn skip_near_duplicates(&self) -> bool {
        self.skip_near_duplicates
    }
}

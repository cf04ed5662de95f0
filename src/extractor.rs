//! The extraction loop.
//!
//! [`FrameExtractor::run`] pulls frames from a [`FrameSource`] until it runs
//! dry, writing each kept frame as `frame_NNNN.jpg` and reporting progress
//! after every frame. [`extract_video`] wraps it for the common case of a
//! file on disk and the `extracted_frames/<name>/` layout.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use framedump::{DEFAULT_OUTPUT_ROOT, ExtractionConfig, extract_video};
//!
//! let config = ExtractionConfig::new().with_skip_near_duplicates(true);
//! let summary = extract_video(Path::new("input.mp4"), Path::new(DEFAULT_OUTPUT_ROOT), &config)?;
//! println!("Extracted {} frames to {}", summary.frames_written, summary.output_dir.display());
//! # Ok::<(), framedump::FramedumpError>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crate::{
    config::ExtractionConfig,
    error::FramedumpError,
    output::{output_dir_for, write_frame},
    progress::ProgressTracker,
    similarity::DuplicateFilter,
    source::{FrameSource, VideoSource},
};

/// What one completed run did.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSummary {
    /// Directory the frames were written to.
    pub output_dir: PathBuf,
    /// Frames pulled from the source. The last index used is this minus one.
    pub frames_processed: u64,
    /// Frames encoded to disk.
    pub frames_written: u64,
    /// Frames dropped as near-duplicates.
    pub frames_skipped: u64,
    /// What the source claimed its frame count was before the run.
    pub frame_count_estimate: u64,
    /// Wall-clock duration of the loop.
    pub elapsed: Duration,
}

/// Runs the decode, filter, write loop.
#[derive(Debug, Clone, Default)]
pub struct FrameExtractor {
    config: ExtractionConfig,
}

impl FrameExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Drain `source` into `output_dir`.
    ///
    /// `output_dir` is created if missing. Existing files with the same
    /// names are overwritten; other files are left alone. Every frame takes
    /// the next index, whether it is written or skipped, and progress is
    /// reported after each one before the next frame is pulled.
    ///
    /// # Errors
    ///
    /// Creating the directory or encoding a frame can fail with
    /// [`FramedumpError::IoError`] or [`FramedumpError::ImageError`]. Frames
    /// written before the failure stay on disk.
    pub fn run<S>(&self, source: &mut S, output_dir: &Path) -> Result<ExtractionSummary, FramedumpError>
    where
        S: FrameSource + ?Sized,
    {
        fs::create_dir_all(output_dir)?;

        let frame_count_estimate = source.frame_count_estimate();
        let tracker = ProgressTracker::new(self.config.progress.clone(), frame_count_estimate);
        let mut filter = self
            .config
            .skip_near_duplicates
            .then(DuplicateFilter::default);
        if let Some(filter) = &filter {
            log::debug!("Skipping frames with SSIM above {}", filter.threshold());
        }

        let start_time = Instant::now();
        let mut index = 0u64;
        let mut frames_written = 0u64;
        let mut frames_skipped = 0u64;

        while let Some(frame) = source.next_frame() {
            let verdict = filter.as_mut().map(|filter| filter.check(&frame));

            match verdict {
                Some(verdict) if verdict.is_duplicate() => {
                    log::trace!("Skipping frame {index} (ssim {:?})", verdict.score());
                    frames_skipped += 1;
                }
                _ => {
                    let path = write_frame(&frame, output_dir, index)?;
                    log::trace!("Wrote frame {index} to {}", path.display());
                    frames_written += 1;
                }
            }

            index += 1;
            tracker.report(index, frames_written, frames_skipped);
        }

        let summary = ExtractionSummary {
            output_dir: output_dir.to_path_buf(),
            frames_processed: index,
            frames_written,
            frames_skipped,
            frame_count_estimate,
            elapsed: start_time.elapsed(),
        };

        log::info!(
            "Extracted {} of {} frames to {} ({} skipped) in {:?}",
            summary.frames_written,
            summary.frames_processed,
            summary.output_dir.display(),
            summary.frames_skipped,
            summary.elapsed,
        );

        Ok(summary)
    }
}

/// Extract every frame of `video_path` into `output_root/<file stem>/`.
///
/// The output directory is created first, then the video is opened, so a
/// path that fails to open leaves the (empty) directory behind and nothing
/// else.
///
/// # Errors
///
/// [`FramedumpError::SourceOpen`] or [`FramedumpError::NoVideoStream`] when
/// the video cannot be opened, plus anything [`FrameExtractor::run`] returns.
pub fn extract_video(
    video_path: &Path,
    output_root: &Path,
    config: &ExtractionConfig,
) -> Result<ExtractionSummary, FramedumpError> {
    let output_dir = output_dir_for(video_path, output_root);
    fs::create_dir_all(&output_dir)?;

    let mut source = VideoSource::open(video_path).inspect_err(|error| {
        log::error!("Error opening video file: {error}");
    })?;

    FrameExtractor::new(config.clone()).run(&mut source, &output_dir)
}

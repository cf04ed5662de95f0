//! # framedump
//!
//! Dump every frame of a video file to numbered JPEG stills, optionally
//! dropping frames that are near-duplicates of the frame before them.
//!
//! Decoding is done by FFmpeg through
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next); frames are handled as
//! [`image::RgbImage`] values.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use framedump::{DEFAULT_OUTPUT_ROOT, ExtractionConfig, extract_video};
//!
//! // Writes extracted_frames/input/frame_0000.jpg, frame_0001.jpg, ...
//! let summary = extract_video(
//!     Path::new("input.mp4"),
//!     Path::new(DEFAULT_OUTPUT_ROOT),
//!     &ExtractionConfig::new().with_skip_near_duplicates(true),
//! )?;
//! println!("{} written, {} skipped", summary.frames_written, summary.frames_skipped);
//! # Ok::<(), framedump::FramedumpError>(())
//! ```
//!
//! ## How it works
//!
//! - Frames are numbered by their position in the decoded stream. A skipped
//!   frame still uses up its number, so output names can have gaps.
//! - With duplicate skipping on, each frame is compared to the frame decoded
//!   immediately before it (skipped or not) using SSIM on luminance. A score
//!   above 0.95 drops the frame.
//! - Progress is reported after every frame through a
//!   [`ProgressCallback`]; [`ChannelProgress`] turns it into a channel for
//!   UI threads.
//! - Once a file is open, decode errors end the stream quietly. Only a
//!   failure to open is an error.
//!
//! ## Binaries
//!
//! - `framedump`: command line, with a terminal progress bar.
//! - `framedump-gui`: a small desktop window (feature `gui`).
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod config;
mod conversion;
pub mod error;
pub mod extractor;
pub mod ffmpeg;
pub mod metadata;
pub mod output;
pub mod platform;
pub mod progress;
pub mod similarity;
pub mod source;

pub use config::ExtractionConfig;
pub use error::FramedumpError;
pub use extractor::{ExtractionSummary, FrameExtractor, extract_video};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use metadata::VideoMetadata;
pub use output::{
    DEFAULT_OUTPUT_ROOT, FRAME_EXTENSION, VIDEO_EXTENSIONS, frame_file_name, output_dir_for,
};
pub use platform::open_in_file_browser;
pub use progress::{ChannelProgress, ProgressCallback, ProgressInfo};
pub use similarity::{DEFAULT_SIMILARITY_THRESHOLD, DuplicateFilter, FrameVerdict, ssim};
pub use source::{FrameSource, MemorySource, VideoSource};

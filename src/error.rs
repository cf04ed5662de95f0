//! Error types for the `framedump` crate.
//!
//! [`FramedumpError`] is returned by every fallible operation. Only a failure
//! to open the source is reported as a distinct condition; decode failures
//! after that point end the stream instead of surfacing here.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use image_compare::CompareError;
use thiserror::Error;

/// The unified error type for all `framedump` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramedumpError {
    /// The video source could not be opened.
    #[error("Failed to open video source at {path}: {reason}")]
    SourceOpen {
        /// Path that was passed to [`VideoSource::open`](crate::VideoSource::open).
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The container opened but carries no video stream.
    #[error("No video stream found in {0}")]
    NoVideoStream(PathBuf),

    /// A decoded frame could not be turned into an image buffer.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// Two frames handed to the similarity metric differ in size.
    #[error("Cannot compare a {left_width}x{left_height} frame with a {right_width}x{right_height} frame")]
    DimensionMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },

    /// The similarity metric could not score a pair of frames.
    #[error("Similarity computation failed: {0}")]
    SimilarityError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while creating the output directory or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// Encoding a frame to an image file failed.
    #[error("Image encoding error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for FramedumpError {
    fn from(error: FfmpegError) -> Self {
        FramedumpError::FfmpegError(error.to_string())
    }
}

impl From<CompareError> for FramedumpError {
    fn from(error: CompareError) -> Self {
        FramedumpError::SimilarityError(error.to_string())
    }
}

//! Frame sources.
//!
//! The extraction loop pulls frames through the [`FrameSource`] trait, one at
//! a time and in decode order. [`VideoSource`] decodes a real file with FFmpeg;
//! [`MemorySource`] replays frames that are already in memory.
//!
//! A source never reports a mid-stream failure to its caller. Once the file
//! has been opened, any read, decode, or conversion error is logged and the
//! stream simply ends there.

use std::{
    collections::VecDeque,
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::context::Input,
    frame::Video as VideoFrame,
    media::Type,
};
use image::RgbImage;

use crate::{
    conversion::RgbConverter,
    error::FramedumpError,
    metadata::{VideoMetadata, estimate_frame_count},
};

/// An ordered, finite sequence of RGB frames.
pub trait FrameSource {
    /// Pull the next frame, or `None` once the sequence is exhausted.
    fn next_frame(&mut self) -> Option<RgbImage>;

    /// Total number of frames the source expects to yield.
    ///
    /// Best effort: containers without a recorded frame count are estimated
    /// from duration and frame rate, and the real count may differ. Zero
    /// means unknown.
    fn frame_count_estimate(&self) -> u64;
}

/// A video file decoded with FFmpeg.
///
/// Frames are decoded lazily and converted to 8-bit RGB at their native
/// resolution. A stream that changes size part-way yields frames of the new
/// size from that point on.
///
/// # Example
///
/// ```no_run
/// use framedump::{FrameSource, VideoSource};
///
/// let mut source = VideoSource::open("input.mp4")?;
/// while let Some(frame) = source.next_frame() {
///     println!("{}x{}", frame.width(), frame.height());
/// }
/// # Ok::<(), framedump::FramedumpError>(())
/// ```
pub struct VideoSource {
    input_context: Input,
    decoder: VideoDecoder,
    converter: RgbConverter,
    video_stream_index: usize,
    metadata: VideoMetadata,
    path: PathBuf,
    decoded_frame: VideoFrame,
    eof_sent: bool,
    done: bool,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open a video file for decoding.
    ///
    /// Initialises FFmpeg (idempotent), opens the container, and prepares a
    /// decoder for its best video stream.
    ///
    /// # Errors
    ///
    /// - [`FramedumpError::SourceOpen`] if the file is missing, unreadable,
    ///   not a media container, or its video codec cannot be opened.
    /// - [`FramedumpError::NoVideoStream`] if the container has no video.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FramedumpError> {
        let path = path.as_ref().to_path_buf();
        let open_error = |reason: String| FramedumpError::SourceOpen {
            path: path.clone(),
            reason,
        };

        log::debug!("Opening video source: {}", path.display());

        ffmpeg_next::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| open_error(error.to_string()))?;

        let (video_stream_index, decoder, frames_per_second, container_frames, stream_duration) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or_else(|| FramedumpError::NoVideoStream(path.clone()))?;

            let decoder = CodecContext::from_parameters(stream.parameters())
                .and_then(|context| context.decoder().video())
                .map_err(|error| open_error(format!("Failed to open video decoder: {error}")))?;

            (
                stream.index(),
                decoder,
                rational_to_f64(stream.avg_frame_rate())
                    .or_else(|| rational_to_f64(stream.rate()))
                    .unwrap_or(0.0),
                stream.frames(),
                stream_duration(stream.duration(), stream.time_base()),
            )
        };

        let duration = stream_duration.unwrap_or_else(|| {
            let microseconds = input_context.duration();
            if microseconds > 0 {
                Duration::from_micros(microseconds as u64)
            } else {
                Duration::ZERO
            }
        });

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            frame_count: estimate_frame_count(container_frames, duration, frames_per_second),
            duration,
            codec: decoder
                .codec()
                .map(|codec| codec.name().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            format: input_context.format().name().to_string(),
        };

        let converter = RgbConverter::new(decoder.format(), decoder.width(), decoder.height())
            .map_err(|error| open_error(format!("Failed to create RGB converter: {error}")))?;

        log::debug!(
            "Video stream {video_stream_index}: {}x{} {} @ {:.3} fps, ~{} frames",
            metadata.width,
            metadata.height,
            metadata.codec,
            metadata.frames_per_second,
            metadata.frame_count,
        );

        Ok(Self {
            input_context,
            decoder,
            converter,
            video_stream_index,
            metadata,
            path,
            decoded_frame: VideoFrame::empty(),
            eof_sent: false,
            done: false,
        })
    }

    /// Metadata cached when the file was opened.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn convert_current_frame(&mut self) -> Result<RgbImage, FramedumpError> {
        self.converter.convert(&self.decoded_frame)
    }

    fn end_with(&mut self, error: impl std::fmt::Display) -> Option<RgbImage> {
        log::warn!(
            "Stopping decode of {} early: {error}",
            self.path.display()
        );
        self.done = true;
        None
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> Option<RgbImage> {
        if self.done {
            return None;
        }

        loop {
            // Drain anything the decoder already has before feeding it more.
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                return match self.convert_current_frame() {
                    Ok(image) => Some(image),
                    Err(error) => self.end_with(error),
                };
            }

            if self.eof_sent {
                self.done = true;
                return None;
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            return self.end_with(error);
                        }
                    }
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        return self.end_with(error);
                    }
                    self.eof_sent = true;
                }
                Err(error) => return self.end_with(error),
            }
        }
    }

    fn frame_count_estimate(&self) -> u64 {
        self.metadata.frame_count
    }
}

fn rational_to_f64(rate: Rational) -> Option<f64> {
    if rate.numerator() > 0 && rate.denominator() > 0 {
        Some(rate.numerator() as f64 / rate.denominator() as f64)
    } else {
        None
    }
}

fn stream_duration(duration: i64, time_base: Rational) -> Option<Duration> {
    if duration <= 0 || time_base.denominator() == 0 {
        return None;
    }
    let seconds = duration as f64 * time_base.numerator() as f64 / time_base.denominator() as f64;
    (seconds > 0.0).then(|| Duration::from_secs_f64(seconds))
}

/// Frames that are already decoded, replayed in order.
///
/// Useful for feeding frames produced elsewhere through the same extraction
/// loop, and for synthetic inputs in tests and benchmarks.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    frames: VecDeque<RgbImage>,
    frame_count_estimate: u64,
}

impl MemorySource {
    /// Wrap a list of frames. The estimate defaults to the exact count.
    pub fn new(frames: Vec<RgbImage>) -> Self {
        let frame_count_estimate = frames.len() as u64;
        Self {
            frames: frames.into(),
            frame_count_estimate,
        }
    }

    /// Override the reported frame count, as a container with a wrong
    /// header would.
    #[must_use]
    pub fn with_frame_count_estimate(mut self, estimate: u64) -> Self {
        self.frame_count_estimate = estimate;
        self
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Option<RgbImage> {
        self.frames.pop_front()
    }

    fn frame_count_estimate(&self) -> u64 {
        self.frame_count_estimate
    }
}

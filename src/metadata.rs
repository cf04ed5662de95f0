//! Video stream metadata.
//!
//! [`VideoMetadata`] is read once when a [`VideoSource`](crate::VideoSource)
//! is opened and cached for its lifetime.

use std::time::Duration;

/// Metadata for the video stream being extracted.
///
/// # Example
///
/// ```no_run
/// use framedump::VideoSource;
///
/// let source = VideoSource::open("input.mp4")?;
/// let metadata = source.metadata();
/// println!("{}x{} @ {:.2} fps", metadata.width, metadata.height, metadata.frames_per_second);
/// # Ok::<(), framedump::FramedumpError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Average frames per second (approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Best-effort total number of frames. See [`estimate_frame_count`].
    pub frame_count: u64,
    /// Container duration.
    pub duration: Duration,
    /// Codec name (e.g. `"h264"`).
    pub codec: String,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub format: String,
}

/// Estimate how many frames a stream holds.
///
/// Prefers the container's own frame count. When the container does not
/// record one, falls back to `duration * fps`, which is often off for
/// variable-frame-rate files. Returns 0 when neither is known.
pub fn estimate_frame_count(container_frames: i64, duration: Duration, frames_per_second: f64) -> u64 {
    if container_frames > 0 {
        return container_frames as u64;
    }
    if frames_per_second > 0.0 {
        (duration.as_secs_f64() * frames_per_second).round() as u64
    } else {
        0
    }
}

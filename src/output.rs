//! Output layout.
//!
//! Frames of `clips/holiday.mp4` land in
//! `extracted_frames/holiday/frame_0000.jpg`, `frame_0001.jpg`, and so on.
//! The number is the frame's position in the decoded stream, so a frame
//! dropped as a duplicate leaves a gap rather than shifting later names.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::FramedumpError;

/// Directory that per-video output directories are created under.
pub const DEFAULT_OUTPUT_ROOT: &str = "extracted_frames";

/// Extension, and therefore encoding, of every written frame.
pub const FRAME_EXTENSION: &str = "jpg";

/// Container extensions offered by the file pickers. Advisory only: anything
/// FFmpeg can open is accepted.
pub const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "avi", "mkv"];

/// `root/<file stem of video>`.
///
/// Falls back to `root/video` for paths without a usable stem, such as `/`
/// or `..`.
pub fn output_dir_for(video_path: &Path, root: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "video".to_string());
    root.join(stem)
}

/// `frame_0042.jpg` for index 42. Indices past 9999 widen naturally.
pub fn frame_file_name(index: u64) -> String {
    format!("frame_{index:04}.{FRAME_EXTENSION}")
}

/// Whether `path` carries one of [`VIDEO_EXTENSIONS`] (case-insensitive).
pub fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
}

/// Encode `frame` as `directory/frame_NNNN.jpg`, replacing any existing file.
pub(crate) fn write_frame(
    frame: &RgbImage,
    directory: &Path,
    index: u64,
) -> Result<PathBuf, FramedumpError> {
    let path = directory.join(frame_file_name(index));
    frame.save(&path)?;
    Ok(path)
}

//! Pixel buffer helpers.

use ffmpeg_next::{
    Error as FfmpegError,
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::error::FramedumpError;

/// Copy plane 0 of an RGB24 frame into a tightly packed buffer.
///
/// FFmpeg pads each row to its alignment, so `stride` can exceed
/// `width * 3`. The padding has to go before the bytes can back an
/// [`RgbImage`].
pub(crate) fn packed_rgb(data: &[u8], stride: usize, width: u32, height: u32) -> Vec<u8> {
    let row_bytes = (width as usize) * 3;
    let rows = height as usize;

    if stride == row_bytes {
        return data[..row_bytes * rows].to_vec();
    }

    let mut buffer = Vec::with_capacity(row_bytes * rows);
    for row in 0..rows {
        let start = row * stride;
        buffer.extend_from_slice(&data[start..start + row_bytes]);
    }
    buffer
}

/// Build an [`RgbImage`] from a frame the scaler has already turned into RGB24.
pub(crate) fn rgb_frame_to_image(frame: &VideoFrame) -> Result<RgbImage, FramedumpError> {
    let (width, height) = (frame.width(), frame.height());
    let buffer = packed_rgb(frame.data(0), frame.stride(0), width, height);
    RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        FramedumpError::VideoDecodeError(format!(
            "decoded plane too small for a {width}x{height} RGB image"
        ))
    })
}

/// Turns decoded frames into [`RgbImage`]s at their native size.
///
/// Streams may change resolution or pixel format mid-way. The scaler is
/// rebuilt whenever a frame no longer matches the one it was created for.
pub(crate) struct RgbConverter {
    scaler: Option<ScalingContext>,
    rgb_frame: VideoFrame,
}

impl RgbConverter {
    /// Prepare a converter for frames of the given format and size.
    pub(crate) fn new(format: Pixel, width: u32, height: u32) -> Result<Self, FfmpegError> {
        Ok(Self {
            scaler: Some(rgb_scaler(format, width, height)?),
            rgb_frame: VideoFrame::empty(),
        })
    }

    pub(crate) fn convert(&mut self, frame: &VideoFrame) -> Result<RgbImage, FramedumpError> {
        let scaler = match self.scaler.take() {
            Some(scaler) if accepts(&scaler, frame) => scaler,
            _ => {
                log::debug!(
                    "Building RGB converter for {}x{} {:?} frames",
                    frame.width(),
                    frame.height(),
                    frame.format()
                );
                rgb_scaler(frame.format(), frame.width(), frame.height())?
            }
        };

        let scaler = self.scaler.insert(scaler);
        scaler.run(frame, &mut self.rgb_frame)?;
        rgb_frame_to_image(&self.rgb_frame)
    }
}

fn rgb_scaler(format: Pixel, width: u32, height: u32) -> Result<ScalingContext, FfmpegError> {
    ScalingContext::get(
        format,
        width,
        height,
        Pixel::RGB24,
        width,
        height,
        ScalingFlags::BILINEAR,
    )
}

fn accepts(scaler: &ScalingContext, frame: &VideoFrame) -> bool {
    let input = scaler.input();
    input.format == frame.format() && input.width == frame.width() && input.height == frame.height()
}

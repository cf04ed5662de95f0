//! Synthetic frames shared by the integration tests.

#![allow(dead_code)]

use std::{
    collections::BTreeSet,
    fs,
    path::Path,
    sync::{Arc, Mutex},
};

use ffmpeg_next::{
    Packet, Rational,
    codec::{self, Id, context::Context as CodecContext},
    format::{Flags as FormatFlags, Pixel},
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use framedump::{ProgressCallback, ProgressInfo};
use image::{Rgb, RgbImage};

pub const WIDTH: u32 = 32;
pub const HEIGHT: u32 = 24;

/// Deterministic noise. Two different seeds are structurally unrelated.
pub fn noise_frame(seed: u32) -> RgbImage {
    sized_noise_frame(WIDTH, HEIGHT, seed)
}

pub fn sized_noise_frame(width: u32, height: u32, seed: u32) -> RgbImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    RgbImage::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let value = (state >> 24) as u8;
        Rgb([value, value.wrapping_add(40), value.wrapping_sub(40)])
    })
}

/// `count` frames, each unrelated to the one before it.
pub fn distinct_frames(count: u32) -> Vec<RgbImage> {
    (0..count).map(noise_frame).collect()
}

/// A smooth gradient nudged one level brighter per `step`.
pub fn drifting_frame(step: u8) -> RgbImage {
    RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let value = (x * 3 + y * 2) as u8 + step;
        Rgb([value, value, value])
    })
}

/// Names of all files directly inside `directory`.
pub fn file_names(directory: &Path) -> BTreeSet<String> {
    fs::read_dir(directory)
        .expect("read output directory")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect()
}

/// Collects every progress update it receives.
#[derive(Default)]
pub struct RecordingProgress {
    pub infos: Mutex<Vec<ProgressInfo>>,
}

impl RecordingProgress {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn snapshot(&self) -> Vec<ProgressInfo> {
        self.infos.lock().unwrap().clone()
    }
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.infos.lock().unwrap().push(info.clone());
    }
}

/// Encode `frames` as intra-only MPEG-4 video at `fps`. The container is
/// picked from the extension of `path`.
pub fn write_clip(path: &Path, frames: &[RgbImage], fps: i32) {
    ffmpeg_next::init().expect("ffmpeg init");
    let (width, height) = frames[0].dimensions();
    let time_base = Rational::new(1, fps);

    let mut output = ffmpeg_next::format::output(path).expect("open output");
    let global_header = output.format().flags().contains(FormatFlags::GLOBAL_HEADER);
    let mpeg4 = ffmpeg_next::encoder::find(Id::MPEG4).expect("mpeg4 encoder");

    let mut stream = output.add_stream(mpeg4).expect("add stream");
    let stream_index = stream.index();
    let mut encoder = CodecContext::from_parameters(stream.parameters())
        .and_then(|context| context.encoder().video())
        .expect("video encoder");
    encoder.set_width(width);
    encoder.set_height(height);
    encoder.set_format(Pixel::YUV420P);
    encoder.set_time_base(time_base);
    encoder.set_frame_rate(Some(Rational::new(fps, 1)));
    encoder.set_bit_rate(4_000_000);
    encoder.set_gop(1);
    encoder.set_max_b_frames(0);
    if global_header {
        encoder.set_flags(codec::Flags::GLOBAL_HEADER);
    }
    let mut encoder = encoder.open_as(mpeg4).expect("open encoder");
    stream.set_parameters(&encoder);
    stream.set_time_base(time_base);

    output.write_header().expect("write header");
    let stream_time_base = output.stream(stream_index).expect("stream").time_base();

    let mut scaler = ScalingContext::get(
        Pixel::RGB24,
        width,
        height,
        Pixel::YUV420P,
        width,
        height,
        ScalingFlags::BILINEAR,
    )
    .expect("scaler");

    for (index, image) in frames.iter().enumerate() {
        let mut rgb = VideoFrame::new(Pixel::RGB24, width, height);
        let stride = rgb.stride(0);
        let row_bytes = width as usize * 3;
        for (row, pixels) in image.as_raw().chunks_exact(row_bytes).enumerate() {
            rgb.data_mut(0)[row * stride..row * stride + row_bytes].copy_from_slice(pixels);
        }

        let mut yuv = VideoFrame::empty();
        scaler.run(&rgb, &mut yuv).expect("scale frame");
        yuv.set_pts(Some(index as i64));
        encoder.send_frame(&yuv).expect("send frame");

        let mut packet = Packet::empty();
        while encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(stream_index);
            packet.rescale_ts(time_base, stream_time_base);
            packet.write_interleaved(&mut output).expect("write packet");
        }
    }

    encoder.send_eof().expect("send eof");
    let mut packet = Packet::empty();
    while encoder.receive_packet(&mut packet).is_ok() {
        packet.set_stream(stream_index);
        packet.rescale_ts(time_base, stream_time_base);
        packet.write_interleaved(&mut output).expect("write packet");
    }
    output.write_trailer().expect("write trailer");
}

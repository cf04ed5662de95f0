//! Frame-to-frame similarity.
//!
//! [`ssim`] computes the structural similarity index of two grayscale images
//! and [`DuplicateFilter`] applies it to a stream of frames, flagging every
//! frame that is too close to the one decoded right before it.
//!
//! The score comes from `image-compare`'s mean SSIM: `K1 = 0.01`,
//! `K2 = 0.03` and a dynamic range of 255, evaluated per 8x8 window and
//! averaged by window area. Windows at the right and bottom edges are
//! clipped to the image.

use image::{GrayImage, RgbImage, imageops};
use image_compare::Algorithm;

use crate::error::FramedumpError;

/// Score above which a frame counts as a near-duplicate of its predecessor.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.95;

/// Convert an RGB frame to single-channel luminance.
pub fn luma(frame: &RgbImage) -> GrayImage {
    imageops::grayscale(frame)
}

/// Structural similarity of two equally sized grayscale images.
///
/// Returns a value in `[-1.0, 1.0]`; identical images score exactly `1.0`.
///
/// # Errors
///
/// - [`FramedumpError::DimensionMismatch`] if the images differ in size.
/// - [`FramedumpError::SimilarityError`] if the metric itself fails.
///
/// # Example
///
/// ```
/// use framedump::similarity::ssim;
/// use image::{GrayImage, Luma};
///
/// let a = GrayImage::from_pixel(16, 16, Luma([90]));
/// assert_eq!(ssim(&a, &a.clone()).unwrap(), 1.0);
/// ```
pub fn ssim(left: &GrayImage, right: &GrayImage) -> Result<f64, FramedumpError> {
    if left.dimensions() != right.dimensions() {
        return Err(FramedumpError::DimensionMismatch {
            left_width: left.width(),
            left_height: left.height(),
            right_width: right.width(),
            right_height: right.height(),
        });
    }

    // Frozen frames are common in real footage; empty images land here too.
    if left.as_raw() == right.as_raw() {
        return Ok(1.0);
    }

    let similarity =
        image_compare::gray_similarity_structure(&Algorithm::MSSIMSimple, left, right)?;
    Ok(similarity.score)
}

/// Outcome of comparing a frame with its predecessor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameVerdict {
    /// No predecessor to compare against.
    First,
    /// Similar enough to drop.
    Duplicate { score: f64 },
    /// Different enough to keep.
    Distinct { score: f64 },
    /// The frame size changed, so there is nothing to compare.
    Resized,
}

impl FrameVerdict {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, FrameVerdict::Duplicate { .. })
    }

    /// The SSIM score, when one was computed.
    pub fn score(&self) -> Option<f64> {
        match self {
            FrameVerdict::Duplicate { score } | FrameVerdict::Distinct { score } => Some(*score),
            FrameVerdict::First | FrameVerdict::Resized => None,
        }
    }
}

/// Flags frames that are near-duplicates of the frame decoded before them.
///
/// The comparison baseline is always the immediately preceding *input* frame,
/// whether or not that frame was itself dropped. A long run of slowly
/// drifting frames is therefore judged step by step, not against the last
/// frame that was kept.
#[derive(Debug, Clone)]
pub struct DuplicateFilter {
    threshold: f64,
    previous: Option<GrayImage>,
}

impl Default for DuplicateFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl DuplicateFilter {
    /// A frame is a duplicate when its score is strictly greater than `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            previous: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Judge `frame` against the previous one, then make it the new baseline.
    pub fn check(&mut self, frame: &RgbImage) -> FrameVerdict {
        let current = luma(frame);

        let verdict = match &self.previous {
            None => FrameVerdict::First,
            Some(previous) => match ssim(previous, &current) {
                Ok(score) if score > self.threshold => FrameVerdict::Duplicate { score },
                Ok(score) => FrameVerdict::Distinct { score },
                Err(error) => {
                    log::debug!("Not comparing frames: {error}");
                    FrameVerdict::Resized
                }
            },
        };

        self.previous = Some(current);
        verdict
    }
}

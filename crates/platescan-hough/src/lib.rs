//! Hough-transform circle detector for scanned plate images.
//!
//! Finds the centers of roughly-circular plates of a known radius band in
//! a scanner image: grayscale → Gaussian blur → Canny edge map → gradient
//! Hough voting over the radius band → non-maximum suppression by a
//! minimum center distance.
//!
//! The detector implements the [`PlateDetector`] seam of
//! `platescan-core`, so the grid resolver and cropper stay independent of
//! it. Detection output carries no ordering guarantee; canonical ordering
//! is the resolver's job.

mod detect;

use image::GrayImage;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use platescan_core::{PlateCenter, PlateDetector, RasterView};

pub use detect::detect_circles;

/// Tuning for [`detect_circles`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct HoughParams {
    /// Smallest plate radius to search, pixels.
    pub min_radius: u32,
    /// Largest plate radius to search, pixels.
    pub max_radius: u32,
    /// Step between candidate radii.
    pub radius_step: u32,
    /// Minimum distance between accepted centers; the stronger candidate
    /// wins within this distance.
    pub min_distance: f32,
    /// Gaussian blur applied before edge detection.
    pub blur_sigma: f32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Accumulator cell size in pixels. 1 votes at full resolution.
    pub cell_size: u32,
    /// Vote threshold as a fraction of the `min_radius` circumference.
    pub min_votes_frac: f32,
}

impl Default for HoughParams {
    /// Matches the reference scanner deployment: ~522 px plates on a bed
    /// with ~1044 px pitch.
    fn default() -> Self {
        HoughParams::for_radius(522)
    }
}

impl HoughParams {
    /// Parameters scaled to an expected plate radius, keeping the
    /// reference deployment's ratios (radius band ±8%/+4%, centers at
    /// least 1.72 radii apart).
    pub fn for_radius(radius: u32) -> HoughParams {
        HoughParams {
            min_radius: radius * 92 / 100,
            max_radius: radius * 104 / 100,
            radius_step: 4,
            min_distance: radius as f32 * 1.72,
            blur_sigma: 1.4,
            canny_low: 60.0,
            canny_high: 120.0,
            cell_size: 2,
            min_votes_frac: 0.25,
        }
    }
}

/// One detected circle, strongest-first within [`detect_circles`] output.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DetectedCircle {
    /// Sub-pixel center estimate.
    pub center: Point2<f32>,
    /// Candidate radius that won the vote.
    pub radius: f32,
    /// Accumulated votes at the peak.
    pub votes: u32,
}

/// [`PlateDetector`] backed by the Hough transform.
#[derive(Clone, Debug, Default)]
pub struct HoughDetector {
    pub params: HoughParams,
}

impl HoughDetector {
    pub fn new(params: HoughParams) -> HoughDetector {
        HoughDetector { params }
    }
}

impl PlateDetector for HoughDetector {
    fn detect(&self, image: &RasterView<'_>) -> Vec<PlateCenter> {
        let gray = gray_from_raster(image);
        detect_circles(&gray, &self.params)
            .into_iter()
            .map(|c| PlateCenter::new(c.center.x.round() as i64, c.center.y.round() as i64))
            .collect()
    }
}

/// Collapse a raster to grayscale: single-channel buffers pass through,
/// anything else uses Rec. 601 weights over the first three channels.
pub fn gray_from_raster(src: &RasterView<'_>) -> GrayImage {
    GrayImage::from_fn(src.width as u32, src.height as u32, |x, y| {
        let px = src.pixel(x as usize, y as usize);
        if src.channels == 1 {
            image::Luma([px[0]])
        } else {
            let y = 0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2]);
            image::Luma([y.round().clamp(0.0, 255.0) as u8])
        }
    })
}

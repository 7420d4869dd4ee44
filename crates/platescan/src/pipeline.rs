//! End-to-end helpers: run a detector over an `image` buffer, crop every
//! plate, optionally tile the crops into one composite.
//!
//! Each helper is a pure function over explicit buffers and parameters;
//! per-image batch isolation and retry policy stay with the caller.

use image::{GrayImage, RgbImage};

use crate::core::{
    compose_grid, crop_plate, resolve_grid, BoundsPolicy, CompositeError, CropError, CropParams,
    GridResolverParams, PlateDetector, Raster, RasterView, ResolvedGrid, TieBreak,
};

/// Errors produced by the end-to-end helpers.
#[derive(thiserror::Error, Debug)]
pub enum PlateScanError {
    #[error(transparent)]
    Crop(#[from] CropError),

    #[error(transparent)]
    Composite(#[from] CompositeError),
}

/// One radius threaded through every stage, plus the per-stage policies.
#[derive(Clone, Copy, Debug)]
pub struct PipelineParams {
    /// Plate radius in pixels (reference deployments: ~500-520).
    pub radius: u32,
    pub tie_break: TieBreak,
    pub bounds: BoundsPolicy,
}

impl PipelineParams {
    pub fn with_radius(radius: u32) -> PipelineParams {
        PipelineParams {
            radius,
            tie_break: TieBreak::default(),
            bounds: BoundsPolicy::default(),
        }
    }

    pub fn resolver(&self) -> GridResolverParams {
        GridResolverParams {
            radius: self.radius,
            tie_break: self.tie_break,
        }
    }

    pub fn crop(&self) -> CropParams {
        CropParams {
            radius: self.radius,
            bounds: self.bounds,
        }
    }

    /// Detector settings scaled to this radius.
    #[cfg(feature = "hough")]
    pub fn hough(&self) -> platescan_hough::HoughParams {
        platescan_hough::HoughParams::for_radius(self.radius)
    }
}

/// Copy an RGB image into an owned 3-channel raster.
pub fn raster_from_rgb(img: &RgbImage) -> Raster {
    Raster {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 3,
        data: img.as_raw().clone(),
    }
}

/// Copy a grayscale image into an owned single-channel raster.
pub fn raster_from_gray(img: &GrayImage) -> Raster {
    Raster {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 1,
        data: img.as_raw().clone(),
    }
}

/// View a 3-channel raster as an RGB image. `None` for other depths.
pub fn rgb_from_raster(raster: &Raster) -> Option<RgbImage> {
    if raster.channels != 3 {
        return None;
    }
    RgbImage::from_raw(
        raster.width as u32,
        raster.height as u32,
        raster.data.clone(),
    )
}

/// View a single-channel raster as a grayscale image.
pub fn gray_from_raster(raster: &Raster) -> Option<GrayImage> {
    if raster.channels != 1 {
        return None;
    }
    GrayImage::from_raw(
        raster.width as u32,
        raster.height as u32,
        raster.data.clone(),
    )
}

/// Detect plates, resolve their grid order, and crop each one.
///
/// Crops come back in canonical reading order, matching `grid.plates`.
/// Zero detections yield an empty grid and no crops, not an error.
pub fn crop_plates(
    src: &RasterView<'_>,
    detector: &dyn PlateDetector,
    params: &PipelineParams,
) -> Result<(ResolvedGrid, Vec<Raster>), PlateScanError> {
    let centers = detector.detect(src);
    log::info!("detected {} plate centers", centers.len());
    let grid = resolve_grid(&centers, &params.resolver());
    let crop_params = params.crop();
    let crops = grid
        .plates
        .iter()
        .map(|p| crop_plate(src, p.center, &crop_params))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((grid, crops))
}

/// [`crop_plates`], then tile the crops into one composite canvas.
pub fn crop_and_compose(
    src: &RasterView<'_>,
    detector: &dyn PlateDetector,
    params: &PipelineParams,
) -> Result<(ResolvedGrid, Raster), PlateScanError> {
    let (grid, crops) = crop_plates(src, detector, params)?;
    let canvas = compose_grid(&crops, grid.shape, params.radius)?;
    Ok((grid, canvas))
}

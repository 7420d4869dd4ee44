use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::grid::PlateCenter;
use crate::raster::{Raster, RasterView};

/// What to do when a crop window extends past the source image edge.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Report [`CropError::OutOfBounds`]. Default.
    #[default]
    Strict,
    /// Intersect the window with the image and return a smaller raster.
    /// The clamped geometry is observable in the output dimensions and
    /// logged at warn level.
    Clamp,
}

/// Settings for [`crop_plate`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CropParams {
    /// Plate radius in pixels; the crop window is `2 * radius` square.
    pub radius: u32,
    #[serde(default)]
    pub bounds: BoundsPolicy,
}

impl CropParams {
    pub fn with_radius(radius: u32) -> CropParams {
        CropParams {
            radius,
            bounds: BoundsPolicy::default(),
        }
    }
}

/// Cut a square window of side `2 * radius` centered on `center` and zero
/// every pixel outside the inscribed circle, all channels.
///
/// Under [`BoundsPolicy::Strict`] the output side is exactly `2 * radius`.
/// Under [`BoundsPolicy::Clamp`] a window leaving the image is shrunk to
/// the overlap; the circular mask stays centered on the requested window,
/// so surviving pixels match the strict result over the overlap. A window
/// with no overlap at all is an error under either policy.
pub fn crop_plate(
    src: &RasterView<'_>,
    center: PlateCenter,
    params: &CropParams,
) -> Result<Raster, CropError> {
    let radius = i64::from(params.radius);
    let side = 2 * radius;
    let x0 = center.x - radius;
    let y0 = center.y - radius;
    let x1 = x0 + side;
    let y1 = y0 + side;

    let (w, h) = (src.width as i64, src.height as i64);
    let in_bounds = x0 >= 0 && y0 >= 0 && x1 <= w && y1 <= h;

    let out_of_bounds = || CropError::OutOfBounds {
        center,
        x0,
        y0,
        x1,
        y1,
        width: src.width,
        height: src.height,
    };

    let (cx0, cy0, cx1, cy1) = match params.bounds {
        BoundsPolicy::Strict => {
            if !in_bounds {
                return Err(out_of_bounds());
            }
            (x0, y0, x1, y1)
        }
        BoundsPolicy::Clamp => {
            let (cx0, cy0) = (x0.max(0), y0.max(0));
            let (cx1, cy1) = (x1.min(w), y1.min(h));
            if cx0 >= cx1 || cy0 >= cy1 {
                return Err(out_of_bounds());
            }
            if !in_bounds {
                log::warn!(
                    "crop at ({}, {}) clamped to [{}, {})x[{}, {}) in {}x{} image",
                    center.x,
                    center.y,
                    cx0,
                    cx1,
                    cy0,
                    cy1,
                    src.width,
                    src.height
                );
            }
            (cx0, cy0, cx1, cy1)
        }
    };

    let mut crop = src.copy_window(
        cx0 as usize,
        cy0 as usize,
        (cx1 - cx0) as usize,
        (cy1 - cy0) as usize,
    );
    mask_outside_circle(&mut crop, cx0 - x0, cy0 - y0, radius);
    Ok(crop)
}

/// Zero all channels of every pixel whose center lies strictly outside the
/// circle of the given radius. `(offset_x, offset_y)` locates the crop
/// inside the requested (unclamped) window, whose circle center is at
/// `(radius, radius)`.
fn mask_outside_circle(crop: &mut Raster, offset_x: i64, offset_y: i64, radius: i64) {
    let c = crop.channels;
    let r2 = radius * radius;
    for y in 0..crop.height {
        let dy = y as i64 + offset_y - radius;
        for x in 0..crop.width {
            let dx = x as i64 + offset_x - radius;
            if dx * dx + dy * dy > r2 {
                let off = (y * crop.width + x) * c;
                crop.data[off..off + c].fill(0);
            }
        }
    }
}

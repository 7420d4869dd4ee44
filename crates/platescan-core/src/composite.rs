use crate::error::CompositeError;
use crate::grid::GridShape;
use crate::raster::Raster;

/// Tile ordered plate crops onto one canvas.
///
/// Crop `i` (row-major order, as produced by
/// [`resolve_grid`](crate::grid::resolve_grid)) lands at block
/// `(i / cols, i % cols)`, each block `2 * radius` pixels square. With
/// fewer crops than cells the trailing cells stay zero; more crops than
/// cells is an error. A crop smaller than one block (clamped cropping) is
/// placed top-left-aligned in its block.
pub fn compose_grid(
    crops: &[Raster],
    shape: GridShape,
    radius: u32,
) -> Result<Raster, CompositeError> {
    let cells = shape.cells();
    if crops.len() > cells {
        return Err(CompositeError::TooManyCrops {
            crops: crops.len(),
            cells,
        });
    }

    let side = 2 * radius as usize;
    let channels = crops.first().map_or(1, |c| c.channels);
    let mut canvas = Raster::zeroed(shape.cols as usize * side, shape.rows as usize * side, channels);

    for (i, crop) in crops.iter().enumerate() {
        if crop.channels != channels {
            return Err(CompositeError::ChannelMismatch {
                index: i,
                expected: channels,
                got: crop.channels,
            });
        }
        if crop.width > side || crop.height > side {
            return Err(CompositeError::CropTooLarge {
                index: i,
                width: crop.width,
                height: crop.height,
                side,
            });
        }
        let row = i / shape.cols as usize;
        let col = i % shape.cols as usize;
        canvas.blit(&crop.view(), col * side, row * side);
    }

    Ok(canvas)
}

use crate::grid::PlateCenter;

/// Errors from [`crop_plate`](crate::crop::crop_plate).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CropError {
    #[error(
        "crop window [{x0}, {x1})x[{y0}, {y1}) around ({cx}, {cy}) leaves the {width}x{height} source image",
        cx = .center.x,
        cy = .center.y
    )]
    OutOfBounds {
        center: PlateCenter,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        width: usize,
        height: usize,
    },
}

/// Errors from [`compose_grid`](crate::composite::compose_grid).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositeError {
    #[error("{crops} crops exceed the {cells} cells of the grid")]
    TooManyCrops { crops: usize, cells: usize },

    #[error("crop {index} has {got} channels, canvas has {expected}")]
    ChannelMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("crop {index} is {width}x{height}, larger than the {side}x{side} grid cell")]
    CropTooLarge {
        index: usize,
        width: usize,
        height: usize,
        side: usize,
    },
}

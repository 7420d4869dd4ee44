//! Core types and raster utilities for scanned plate cropping.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete circle detector or image codec: a scanned image
//! is a plain interleaved pixel buffer ([`Raster`] / [`RasterView`]), and
//! detection is a trait seam ([`PlateDetector`]).
//!
//! Pipeline, leaf to root:
//! - [`resolve_grid`]: unordered detected centers → canonical row-major
//!   reading order with (row, column) grid positions;
//! - [`crop_plate`]: one center → a `2 * radius` square crop with pixels
//!   outside the inscribed circle zeroed;
//! - [`compose_grid`]: ordered crops → one tiled mosaic canvas.
//!
//! Every stage is a pure function over explicit buffers and parameters;
//! the plate radius is threaded through parameter structs rather than
//! held as process-wide state.

mod composite;
mod crop;
mod detector;
mod error;
mod grid;
mod logger;
mod raster;

pub use composite::compose_grid;
pub use crop::{crop_plate, BoundsPolicy, CropParams};
pub use detector::{FixedCenters, PlateDetector};
pub use error::{CompositeError, CropError};
pub use grid::{
    resolve_grid, GridPos, GridResolverParams, GridShape, PlateCenter, ResolvedGrid,
    ResolvedPlate, TieBreak,
};
pub use logger::init_with_level;
pub use raster::{Raster, RasterView};

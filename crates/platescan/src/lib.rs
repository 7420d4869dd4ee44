//! High-level facade crate for the `platescan-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying crates
//! - (feature-gated) end-to-end helpers that run a plate detector on an
//!   `image` buffer and return grid-ordered circular crops or one tiled
//!   composite.
//!
//! ## Quickstart
//!
//! ```no_run
//! use platescan::pipeline::{self, PipelineParams};
//! use platescan::hough::HoughDetector;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::ImageReader::open("scan.tif")?.decode()?.to_rgb8();
//! let src = pipeline::raster_from_rgb(&img);
//!
//! let params = PipelineParams::with_radius(522);
//! let detector = HoughDetector::new(params.hough());
//! let (grid, crops) = pipeline::crop_plates(&src.view(), &detector, &params)?;
//! println!("{} plates in a {}x{} grid", crops.len(), grid.shape.rows, grid.shape.cols);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - [`core`]: raster buffers, grid resolution, cropping, compositing.
//! - [`hough`] (feature `hough`): Canny + Hough circle center detector.
//! - [`pipeline`] (feature `image`): `image`-crate conversions and
//!   end-to-end helpers.

pub use platescan_core as core;

#[cfg(feature = "hough")]
pub use platescan_hough as hough;

pub use platescan_core::{
    compose_grid, crop_plate, resolve_grid, BoundsPolicy, CompositeError, CropError, CropParams,
    FixedCenters, GridPos, GridResolverParams, GridShape, PlateCenter, PlateDetector, Raster,
    RasterView, ResolvedGrid, ResolvedPlate, TieBreak,
};

#[cfg(feature = "image")]
pub mod pipeline;

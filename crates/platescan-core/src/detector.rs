use crate::grid::PlateCenter;
use crate::raster::RasterView;

/// Contract for the circle-detection stage.
///
/// Implementations return one center per detected plate, each within the
/// image bounds, in no particular order. The core applies no plausibility
/// filtering: false positives and negatives pass through as given, and
/// [`resolve_grid`](crate::grid::resolve_grid) alone makes the downstream
/// order deterministic.
pub trait PlateDetector {
    fn detect(&self, image: &RasterView<'_>) -> Vec<PlateCenter>;
}

/// Fixed list of centers, for tests and for callers that run detection
/// elsewhere.
#[derive(Clone, Debug, Default)]
pub struct FixedCenters(pub Vec<PlateCenter>);

impl PlateDetector for FixedCenters {
    fn detect(&self, _image: &RasterView<'_>) -> Vec<PlateCenter> {
        self.0.clone()
    }
}

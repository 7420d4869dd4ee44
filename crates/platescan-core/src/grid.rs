use serde::{Deserialize, Serialize};

/// Integer pixel coordinate of one detected plate center.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PlateCenter {
    pub x: i64,
    pub y: i64,
}

impl PlateCenter {
    pub fn new(x: i64, y: i64) -> PlateCenter {
        PlateCenter { x, y }
    }
}

/// Quantized (row, column) position of a plate on the scanner bed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: u32,
    pub col: u32,
}

/// Extent of the resolved grid, derived as `max(GridPos) + 1` per axis.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
}

impl GridShape {
    /// Total number of grid cells.
    #[inline]
    pub fn cells(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

/// Ordering applied to centers that quantize into the same grid cell.
///
/// Detections closer together than one plate diameter land in one cell.
/// Neither is dropped; this policy fixes their relative order so the
/// output sequence is deterministic regardless of how the detector
/// happened to enumerate them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the detector's output order within a cell (stable sort).
    #[default]
    DetectionOrder,
    /// Order within a cell by raw pixel position, (y, x) ascending.
    /// Makes the result independent of detector enumeration order.
    ScanOrder,
}

/// Settings for [`resolve_grid`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GridResolverParams {
    /// Plate radius in pixels. The grid pitch is assumed to be one plate
    /// diameter (`2 * radius`).
    pub radius: u32,
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl GridResolverParams {
    pub fn with_radius(radius: u32) -> GridResolverParams {
        GridResolverParams {
            radius,
            tie_break: TieBreak::default(),
        }
    }
}

/// One plate center with its assigned grid position.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlate {
    pub center: PlateCenter,
    pub pos: GridPos,
}

/// Plates in canonical reading order plus the derived grid shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGrid {
    /// Row-major: top-to-bottom, then left-to-right within a row.
    pub plates: Vec<ResolvedPlate>,
    pub shape: GridShape,
}

impl ResolvedGrid {
    /// Centers in canonical order, without positions.
    pub fn centers(&self) -> Vec<PlateCenter> {
        self.plates.iter().map(|p| p.center).collect()
    }
}

/// Assign a grid position to every center and sort into reading order.
///
/// Each center is offset by the per-axis minimum over all centers, shifted
/// by one radius, and integer-divided by the plate diameter. The division
/// absorbs detection jitter smaller than one diameter; the layout is
/// assumed to be an axis-aligned lattice with pitch close to the diameter.
///
/// Properties:
/// - cardinality is preserved: no center is dropped or duplicated, even
///   when two centers land in the same cell (see [`TieBreak`]);
/// - the output is totally ordered by (row, col) lexicographically;
/// - the function is idempotent: re-resolving the centers of the returned
///   grid yields the identical sequence and positions.
///
/// An empty input yields an empty grid with shape (0, 0).
pub fn resolve_grid(centers: &[PlateCenter], params: &GridResolverParams) -> ResolvedGrid {
    if centers.is_empty() {
        return ResolvedGrid::default();
    }

    let origin_x = centers.iter().map(|c| c.x).min().unwrap_or(0);
    let origin_y = centers.iter().map(|c| c.y).min().unwrap_or(0);
    let radius = i64::from(params.radius);
    let diameter = (2 * radius).max(1);

    let mut plates: Vec<ResolvedPlate> = centers
        .iter()
        .map(|&center| {
            let col = (center.x - origin_x + radius) / diameter;
            let row = (center.y - origin_y + radius) / diameter;
            ResolvedPlate {
                center,
                pos: GridPos {
                    row: row as u32,
                    col: col as u32,
                },
            }
        })
        .collect();

    match params.tie_break {
        TieBreak::DetectionOrder => {
            plates.sort_by_key(|p| (p.pos.row, p.pos.col));
        }
        TieBreak::ScanOrder => {
            plates.sort_by_key(|p| (p.pos.row, p.pos.col, p.center.y, p.center.x));
        }
    }

    let shape = GridShape {
        rows: plates.iter().map(|p| p.pos.row).max().unwrap_or(0) + 1,
        cols: plates.iter().map(|p| p.pos.col).max().unwrap_or(0) + 1,
    };

    ResolvedGrid { plates, shape }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(centers: &[(i64, i64)], radius: u32) -> ResolvedGrid {
        let centers: Vec<PlateCenter> = centers.iter().map(|&(x, y)| PlateCenter::new(x, y)).collect();
        resolve_grid(&centers, &GridResolverParams::with_radius(radius))
    }

    #[test]
    fn empty_input_is_empty_grid() {
        let grid = resolve(&[], 500);
        assert!(grid.plates.is_empty());
        assert_eq!(grid.shape, GridShape { rows: 0, cols: 0 });
    }

    #[test]
    fn perfect_lattice_gets_lattice_indices() {
        let radius = 50;
        let pitch = 100i64;
        let mut centers = Vec::new();
        // Deliberately scrambled enumeration order.
        for row in [2i64, 0, 1] {
            for col in [1i64, 2, 0] {
                centers.push((320 + col * pitch, 40 + row * pitch));
            }
        }
        let grid = resolve(&centers, radius);
        assert_eq!(grid.shape, GridShape { rows: 3, cols: 3 });
        for (i, plate) in grid.plates.iter().enumerate() {
            assert_eq!(plate.pos.row, i as u32 / 3);
            assert_eq!(plate.pos.col, i as u32 % 3);
        }
        // Strictly increasing in (row, col).
        for pair in grid.plates.windows(2) {
            let a = (pair[0].pos.row, pair[0].pos.col);
            let b = (pair[1].pos.row, pair[1].pos.col);
            assert!(a < b);
        }
    }

    #[test]
    fn jitter_below_one_diameter_is_absorbed() {
        // Lattice pitch 1000, detections off by up to ~200 px.
        let grid = resolve(&[(1180, 130), (210, 95), (1105, 1210), (160, 1150)], 500);
        let positions: Vec<(u32, u32)> =
            grid.plates.iter().map(|p| (p.pos.row, p.pos.col)).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(grid.plates[0].center, PlateCenter::new(210, 95));
        assert_eq!(grid.plates[1].center, PlateCenter::new(1180, 130));
    }

    #[test]
    fn four_corner_scenario_orders_row_major() {
        let grid = resolve(&[(100, 100), (1200, 100), (100, 1200), (1200, 1200)], 500);
        assert_eq!(grid.shape, GridShape { rows: 2, cols: 2 });
        let order: Vec<PlateCenter> = grid.centers();
        assert_eq!(
            order,
            vec![
                PlateCenter::new(100, 100),
                PlateCenter::new(1200, 100),
                PlateCenter::new(100, 1200),
                PlateCenter::new(1200, 1200),
            ]
        );
    }

    #[test]
    fn resolve_is_idempotent() {
        let grid = resolve(&[(900, 120), (80, 1010), (70, 90), (950, 1100)], 500);
        let again = resolve_grid(&grid.centers(), &GridResolverParams::with_radius(500));
        assert_eq!(again, grid);
    }

    #[test]
    fn cardinality_is_preserved_for_same_cell_detections() {
        // Two detections of the same plate, 10 px apart.
        let grid = resolve(&[(500, 500), (510, 505), (1500, 500)], 500);
        assert_eq!(grid.plates.len(), 3);
        // Detection order kept within the shared cell.
        assert_eq!(grid.plates[0].center, PlateCenter::new(500, 500));
        assert_eq!(grid.plates[1].center, PlateCenter::new(510, 505));
        assert_eq!(grid.plates[0].pos, grid.plates[1].pos);
    }

    #[test]
    fn scan_order_tie_break_ignores_detection_order() {
        let params = GridResolverParams {
            radius: 500,
            tie_break: TieBreak::ScanOrder,
        };
        let centers = [PlateCenter::new(510, 505), PlateCenter::new(500, 500)];
        let grid = resolve_grid(&centers, &params);
        assert_eq!(grid.plates[0].center, PlateCenter::new(500, 500));
    }

    #[test]
    fn single_center_is_origin_cell() {
        let grid = resolve(&[(4321, 987)], 510);
        assert_eq!(grid.plates[0].pos, GridPos { row: 0, col: 0 });
        assert_eq!(grid.shape, GridShape { rows: 1, cols: 1 });
    }

    #[test]
    fn params_round_trip_json() {
        let params = GridResolverParams {
            radius: 522,
            tie_break: TieBreak::ScanOrder,
        };
        let text = serde_json::to_string(&params).unwrap();
        let back: GridResolverParams = serde_json::from_str(&text).unwrap();
        assert_eq!(back.radius, 522);
        assert_eq!(back.tie_break, TieBreak::ScanOrder);
    }
}

use image::GrayImage;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use nalgebra::Point2;

use crate::{DetectedCircle, HoughParams};

/// Vote accumulator for one candidate radius, on a grid of
/// `cell_size`-pixel cells.
struct Accumulator {
    width: usize,
    height: usize,
    cell: usize,
    votes: Vec<u32>,
}

impl Accumulator {
    fn new(img_width: usize, img_height: usize, cell: usize) -> Accumulator {
        let width = img_width.div_ceil(cell);
        let height = img_height.div_ceil(cell);
        Accumulator {
            width,
            height,
            cell,
            votes: vec![0; width * height],
        }
    }

    #[inline]
    fn vote(&mut self, x: f32, y: f32) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let cx = x as usize / self.cell;
        let cy = y as usize / self.cell;
        if cx < self.width && cy < self.height {
            self.votes[cy * self.width + cx] += 1;
        }
    }

    #[inline]
    fn at(&self, cx: i64, cy: i64) -> u32 {
        if cx < 0 || cy < 0 || cx >= self.width as i64 || cy >= self.height as i64 {
            return 0;
        }
        self.votes[cy as usize * self.width + cx as usize]
    }

    fn is_local_max(&self, cx: usize, cy: usize) -> bool {
        let v = self.at(cx as i64, cy as i64);
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if (dx, dy) != (0, 0) && self.at(cx as i64 + dx, cy as i64 + dy) > v {
                    return false;
                }
            }
        }
        true
    }

    /// Vote-weighted centroid over the 3x3 neighborhood, in image pixels.
    fn refine_center(&self, cx: usize, cy: usize) -> Point2<f32> {
        let mut sum = 0.0f32;
        let mut sx = 0.0f32;
        let mut sy = 0.0f32;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let v = self.at(cx as i64 + dx, cy as i64 + dy) as f32;
                sum += v;
                sx += v * (cx as i64 + dx) as f32;
                sy += v * (cy as i64 + dy) as f32;
            }
        }
        let half = self.cell as f32 * 0.5;
        if sum <= 0.0 {
            return Point2::new(cx as f32 * self.cell as f32 + half, cy as f32 * self.cell as f32 + half);
        }
        Point2::new(
            sx / sum * self.cell as f32 + half,
            sy / sum * self.cell as f32 + half,
        )
    }
}

/// Detect circles with radii in the configured band.
///
/// Gradient Hough: every Canny edge pixel votes along its gradient
/// direction, both ways, at each candidate radius. Peaks above the vote
/// threshold become candidates; greedy suppression by `min_distance`
/// keeps the strongest. Output is strongest-first.
pub fn detect_circles(gray: &GrayImage, params: &HoughParams) -> Vec<DetectedCircle> {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    if w == 0 || h == 0 || params.min_radius == 0 || params.max_radius < params.min_radius {
        return Vec::new();
    }

    let blurred = gaussian_blur_f32(gray, params.blur_sigma.max(0.01));
    let edges = canny(&blurred, params.canny_low, params.canny_high);
    let gx = horizontal_sobel(&blurred);
    let gy = vertical_sobel(&blurred);

    let radii: Vec<u32> = (params.min_radius..=params.max_radius)
        .step_by(params.radius_step.max(1) as usize)
        .collect();
    let cell = params.cell_size.max(1) as usize;
    let mut layers: Vec<Accumulator> = radii.iter().map(|_| Accumulator::new(w, h, cell)).collect();

    for (x, y, px) in edges.enumerate_pixels() {
        if px.0[0] == 0 {
            continue;
        }
        let dx = f32::from(gx.get_pixel(x, y).0[0]);
        let dy = f32::from(gy.get_pixel(x, y).0[0]);
        let mag = (dx * dx + dy * dy).sqrt();
        if mag < 1e-3 {
            continue;
        }
        let (ux, uy) = (dx / mag, dy / mag);
        for (layer, &r) in layers.iter_mut().zip(&radii) {
            let r = r as f32;
            // Plates may be brighter or darker than the bed, so vote on
            // both sides of the edge.
            layer.vote(x as f32 + ux * r, y as f32 + uy * r);
            layer.vote(x as f32 - ux * r, y as f32 - uy * r);
        }
    }

    let threshold =
        ((params.min_votes_frac * 2.0 * std::f32::consts::PI * params.min_radius as f32) as u32)
            .max(1);

    let mut candidates: Vec<DetectedCircle> = Vec::new();
    for (layer, &r) in layers.iter().zip(&radii) {
        for cy in 0..layer.height {
            for cx in 0..layer.width {
                let votes = layer.at(cx as i64, cy as i64);
                if votes >= threshold && layer.is_local_max(cx, cy) {
                    candidates.push(DetectedCircle {
                        center: layer.refine_center(cx, cy),
                        radius: r as f32,
                        votes,
                    });
                }
            }
        }
    }

    candidates.sort_by(|a, b| b.votes.cmp(&a.votes));

    let min_dist2 = params.min_distance * params.min_distance;
    let mut kept: Vec<DetectedCircle> = Vec::new();
    for cand in candidates {
        let close = kept.iter().any(|k| {
            let d = cand.center - k.center;
            d.norm_squared() < min_dist2
        });
        if !close {
            kept.push(cand);
        }
    }

    log::debug!(
        "hough: {} candidate radii, vote threshold {}, {} centers kept",
        radii.len(),
        threshold,
        kept.len()
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HoughParams;

    fn disk_image(width: u32, height: u32, disks: &[(f32, f32, f32)]) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let inside = disks.iter().any(|&(cx, cy, r)| {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                dx * dx + dy * dy <= r * r
            });
            image::Luma([if inside { 230 } else { 10 }])
        })
    }

    fn test_params() -> HoughParams {
        HoughParams {
            min_radius: 18,
            max_radius: 26,
            radius_step: 2,
            min_distance: 50.0,
            blur_sigma: 1.0,
            canny_low: 40.0,
            canny_high: 80.0,
            cell_size: 2,
            min_votes_frac: 0.25,
        }
    }

    #[test]
    fn finds_three_disks() {
        let truth = [(60.0f32, 60.0f32, 22.0f32), (170.0, 60.0, 22.0), (60.0, 170.0, 22.0)];
        let img = disk_image(240, 240, &truth);
        let found = detect_circles(&img, &test_params());
        assert_eq!(found.len(), 3, "found: {found:?}");
        for &(cx, cy, _) in &truth {
            let hit = found
                .iter()
                .any(|c| (c.center.x - cx).abs() <= 4.0 && (c.center.y - cy).abs() <= 4.0);
            assert!(hit, "no detection near ({cx}, {cy}): {found:?}");
        }
    }

    #[test]
    fn blank_image_finds_nothing() {
        let img = GrayImage::from_pixel(200, 200, image::Luma([128]));
        assert!(detect_circles(&img, &test_params()).is_empty());
    }

    #[test]
    fn dark_disks_on_bright_bed_are_found_too() {
        let img = GrayImage::from_fn(200, 200, |x, y| {
            let dx = x as f32 - 100.0;
            let dy = y as f32 - 100.0;
            image::Luma([if dx * dx + dy * dy <= 22.0 * 22.0 { 10 } else { 230 }])
        });
        let found = detect_circles(&img, &test_params());
        assert_eq!(found.len(), 1);
        assert!((found[0].center.x - 100.0).abs() <= 4.0);
        assert!((found[0].center.y - 100.0).abs() <= 4.0);
    }

    #[test]
    fn degenerate_radius_band_is_empty() {
        let img = disk_image(100, 100, &[(50.0, 50.0, 20.0)]);
        let params = HoughParams {
            min_radius: 30,
            max_radius: 20,
            ..test_params()
        };
        assert!(detect_circles(&img, &params).is_empty());
    }
}

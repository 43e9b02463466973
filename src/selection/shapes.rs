//! Geometric selection shapes: rectangle, ellipse and lasso polygon.
//!
//! Each rasterizer computes the pixel region the shape can touch, then hands
//! a membership predicate to [`combine`](super::combine::combine).

use ndarray::ArrayViewMut2;

use super::combine::{combine, CombinationMode, IntersectPolicy, ScanRegion};
use super::magic_wand::MagicWandOptions;

/// A 2D point in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Everything a selection tool can ask the engine to rasterize.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionShapeSpec {
    Rectangle { x1: f32, y1: f32, x2: f32, y2: f32 },
    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },
    Polygon { points: Vec<Point> },
    MagicWand { x: i64, y: i64, options: MagicWandOptions },
}

/// Rasterize the rectangle spanned by two corners (in any order).
///
/// Covers pixels `x` with `min(x1, x2) <= x < max(x1, x2)`, same for `y`.
/// Returns false if the clipped rectangle is empty.
pub fn rasterize_rectangle(
    mask: ArrayViewMut2<u8>,
    (x1, y1, x2, y2): (f32, f32, f32, f32),
    mode: CombinationMode,
    policy: IntersectPolicy,
) -> bool {
    let (height, width) = mask.dim();
    let lo_x = x1.min(x2).floor() as i64;
    let lo_y = y1.min(y2).floor() as i64;
    let hi_x = x1.max(x2).ceil() as i64;
    let hi_y = y1.max(y2).ceil() as i64;
    let region = ScanRegion::clipped(lo_x, lo_y, hi_x, hi_y, width, height);

    combine(mask, region, mode, policy, |_, _| true);
    !region.is_empty()
}

/// Rasterize the axis-aligned ellipse `((x-cx)/rx)² + ((y-cy)/ry)² <= 1`.
///
/// A non-positive radius is degenerate and leaves the mask untouched.
pub fn rasterize_ellipse(
    mask: ArrayViewMut2<u8>,
    (cx, cy, rx, ry): (f32, f32, f32, f32),
    mode: CombinationMode,
    policy: IntersectPolicy,
) -> bool {
    if !(rx > 0.0 && ry > 0.0) {
        return false;
    }
    let (height, width) = mask.dim();
    // +1 so the pixels at exactly cx + rx / cy + ry are tested too
    let region = ScanRegion::clipped(
        (cx - rx).floor() as i64,
        (cy - ry).floor() as i64,
        ((cx + rx).ceil() as i64).saturating_add(1),
        ((cy + ry).ceil() as i64).saturating_add(1),
        width,
        height,
    );

    combine(mask, region, mode, policy, |x, y| {
        let dx = (x as f32 - cx) / rx;
        let dy = (y as f32 - cy) / ry;
        dx * dx + dy * dy <= 1.0
    });
    true
}

/// Rasterize a closed polygon with the even-odd rule.
///
/// Fewer than three points is degenerate and leaves the mask untouched.
pub fn rasterize_polygon(
    mask: ArrayViewMut2<u8>,
    points: &[Point],
    mode: CombinationMode,
    policy: IntersectPolicy,
) -> bool {
    if points.len() < 3 {
        return false;
    }
    let (height, width) = mask.dim();

    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
        return false;
    }

    let region = ScanRegion::clipped(
        min_x.floor() as i64,
        min_y.floor() as i64,
        (max_x.ceil() as i64).saturating_add(1),
        (max_y.ceil() as i64).saturating_add(1),
        width,
        height,
    );

    combine(mask, region, mode, policy, |x, y| {
        point_in_polygon(x as f32, y as f32, points)
    });
    true
}

/// Ray casting: a point is inside when a ray to +x crosses an odd number of edges.
pub fn point_in_polygon(x: f32, y: f32, points: &[Point]) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for (i, pi) in points.iter().enumerate() {
        let pj = points[j];
        // Divide before multiplying so huge vertices stay finite
        if (pi.y > y) != (pj.y > y) && x < (pj.x - pi.x) * ((y - pi.y) / (pj.y - pi.y)) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn count(mask: &Array2<u8>) -> usize {
        mask.iter().filter(|&&v| v > 0).count()
    }

    #[test]
    fn test_rectangle_is_half_open_and_order_independent() {
        let mut mask = Array2::<u8>::zeros((20, 20));
        let policy = IntersectPolicy::Legacy;
        assert!(rasterize_rectangle(mask.view_mut(), (8.0, 6.0, 2.0, 1.0), CombinationMode::Replace, policy));
        assert_eq!(count(&mask), 6 * 5);
        assert_eq!(mask[[1, 2]], 255);
        assert_eq!(mask[[5, 7]], 255);
        assert_eq!(mask[[6, 7]], 0);
        assert_eq!(mask[[5, 8]], 0);
    }

    #[test]
    fn test_rectangle_clipped_to_mask() {
        let mut mask = Array2::<u8>::zeros((10, 10));
        rasterize_rectangle(mask.view_mut(), (-5.0, -5.0, 3.0, 50.0), CombinationMode::Add, IntersectPolicy::Legacy);
        assert_eq!(count(&mask), 3 * 10);
    }

    #[test]
    fn test_ellipse_contains_center_and_axis_ends() {
        let mut mask = Array2::<u8>::zeros((100, 100));
        assert!(rasterize_ellipse(mask.view_mut(), (50.0, 50.0, 20.0, 10.0), CombinationMode::Replace, IntersectPolicy::Legacy));
        assert_eq!(mask[[50, 50]], 255);
        assert_eq!(mask[[50, 70]], 255);
        assert_eq!(mask[[50, 30]], 255);
        assert_eq!(mask[[60, 50]], 255);
        assert_eq!(mask[[61, 50]], 0);
        assert_eq!(mask[[50, 71]], 0);
        assert_eq!(mask[[40, 30]], 0);
    }

    #[test]
    fn test_zero_radius_ellipse_is_noop() {
        let mut mask = Array2::<u8>::from_elem((10, 10), 255);
        assert!(!rasterize_ellipse(mask.view_mut(), (5.0, 5.0, 0.0, 3.0), CombinationMode::Replace, IntersectPolicy::Legacy));
        assert_eq!(count(&mask), 100);
    }

    #[test]
    fn test_polygon_triangle() {
        let mut mask = Array2::<u8>::zeros((20, 20));
        let triangle = [Point::new(0.0, 0.0), Point::new(19.0, 0.0), Point::new(0.0, 19.0)];
        assert!(rasterize_polygon(mask.view_mut(), &triangle, CombinationMode::Replace, IntersectPolicy::Legacy));
        assert_eq!(mask[[2, 2]], 255);
        assert_eq!(mask[[15, 15]], 0);
        assert_eq!(mask[[19, 19]], 0);
    }

    #[test]
    fn test_oversized_shapes_clip_to_mask() {
        let policy = IntersectPolicy::Legacy;
        let mut mask = Array2::<u8>::zeros((9, 12));
        assert!(rasterize_ellipse(mask.view_mut(), (5.0, 5.0, 1e30, 1e30), CombinationMode::Replace, policy));
        assert_eq!(count(&mask), 12 * 9);

        let mut mask = Array2::<u8>::zeros((9, 12));
        let huge = [Point::new(-1e20, -1e20), Point::new(1e20, -1e20), Point::new(0.0, 1e20)];
        assert!(rasterize_polygon(mask.view_mut(), &huge, CombinationMode::Replace, policy));
        assert_eq!(count(&mask), 12 * 9);
    }

    #[test]
    fn test_degenerate_polygon_is_noop() {
        let mut mask = Array2::<u8>::from_elem((10, 10), 7);
        let line = [Point::new(0.0, 0.0), Point::new(9.0, 9.0)];
        assert!(!rasterize_polygon(mask.view_mut(), &line, CombinationMode::Replace, IntersectPolicy::Legacy));
        assert!(mask.iter().all(|&v| v == 7));
    }

    #[test]
    fn test_point_in_polygon_concave() {
        // U shape open at the top
        let u = [
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 7.0),
            Point::new(7.0, 7.0),
            Point::new(7.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(1.5, 5.0, &u));
        assert!(!point_in_polygon(5.0, 3.0, &u));
        assert!(point_in_polygon(5.0, 8.5, &u));
        assert!(!point_in_polygon(11.0, 5.0, &u));
    }
}

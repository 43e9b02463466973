//! Magic wand selection: color-based region growing.
//!
//! Selects pixels similar to a seed pixel, either the 4-connected region
//! around the seed (flood fill) or every matching pixel in the image.

use ndarray::{Array2, Axis, Zip};

use super::cancel::CancelToken;
use super::combine::ScanRegion;
use super::pixels::{PixelSample, PixelSource};
use crate::config::SelectionConfig;

/// How often (in visited pixels) the flood fill polls its cancel token.
const CANCEL_POLL_INTERVAL: usize = 4096;

/// Parameters of a single magic wand click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MagicWandOptions {
    /// Max per-channel difference from the seed color (0-255).
    pub tolerance: u8,
    /// Only select pixels connected to the seed.
    pub contiguous: bool,
    /// Sample the merged composite instead of the active layer.
    pub sample_merged: bool,
}

impl Default for MagicWandOptions {
    fn default() -> Self {
        SelectionConfig::default().wand_options()
    }
}

/// Matched pixels of a magic wand pass, with metadata.
#[derive(Clone, Debug)]
pub struct MagicWandResult {
    /// `(height, width)` membership map.
    pub matched: Array2<bool>,
    /// Half-open region enclosing all matches, `None` if nothing matched.
    pub region: Option<ScanRegion>,
    pub pixel_count: usize,
}

impl MagicWandResult {
    fn from_matches(matched: Array2<bool>) -> Self {
        let (height, width) = matched.dim();
        let mut region = ScanRegion { x0: width, y0: height, x1: 0, y1: 0 };
        let mut pixel_count = 0;
        for ((y, x), &hit) in matched.indexed_iter() {
            if hit {
                pixel_count += 1;
                region.x0 = region.x0.min(x);
                region.y0 = region.y0.min(y);
                region.x1 = region.x1.max(x + 1);
                region.y1 = region.y1.max(y + 1);
            }
        }
        Self {
            matched,
            region: (pixel_count > 0).then_some(region),
            pixel_count,
        }
    }

    #[inline]
    pub fn is_match(&self, x: usize, y: usize) -> bool {
        self.matched[[y, x]]
    }

    /// The matches as a 0/255 mask.
    pub fn to_mask(&self) -> Array2<u8> {
        self.matched.mapv(|hit| if hit { 255 } else { 0 })
    }
}

/// Run a magic wand pass seeded at `(start_x, start_y)`.
///
/// Returns `None` if the seed lies outside the source or the pass was
/// cancelled.
pub fn magic_wand_select(
    source: &dyn PixelSource,
    start_x: i64,
    start_y: i64,
    tolerance: u8,
    contiguous: bool,
    cancel: &CancelToken,
) -> Option<MagicWandResult> {
    let (width, height) = source.dimensions();
    if start_x < 0 || start_y < 0 || start_x as usize >= width || start_y as usize >= height {
        return None;
    }
    let (start_x, start_y) = (start_x as usize, start_y as usize);
    let target = source.pixel(start_x, start_y);

    let matched = if contiguous {
        flood_fill(source, start_x, start_y, target, tolerance, cancel)?
    } else {
        global_match(source, target, tolerance, cancel)?
    };
    Some(MagicWandResult::from_matches(matched))
}

/// Iterative 4-connected fill with an explicit stack.
fn flood_fill(
    source: &dyn PixelSource,
    start_x: usize,
    start_y: usize,
    target: PixelSample,
    tolerance: u8,
    cancel: &CancelToken,
) -> Option<Array2<bool>> {
    let (width, height) = source.dimensions();
    let mut matched = Array2::<bool>::default((height, width));
    let mut visited = Array2::<bool>::default((height, width));
    let mut stack = vec![(start_x, start_y)];
    visited[[start_y, start_x]] = true;
    let mut steps = 0usize;

    while let Some((x, y)) = stack.pop() {
        steps += 1;
        if steps % CANCEL_POLL_INTERVAL == 0 && cancel.is_cancelled() {
            return None;
        }

        if !source.pixel(x, y).within_tolerance(&target, tolerance) {
            continue;
        }
        matched[[y, x]] = true;

        let neighbors = [
            (x.checked_add(1).filter(|&nx| nx < width), Some(y)),
            (x.checked_sub(1), Some(y)),
            (Some(x), y.checked_add(1).filter(|&ny| ny < height)),
            (Some(x), y.checked_sub(1)),
        ];
        for (nx, ny) in neighbors {
            if let (Some(nx), Some(ny)) = (nx, ny) {
                if !visited[[ny, nx]] {
                    visited[[ny, nx]] = true;
                    stack.push((nx, ny));
                }
            }
        }
    }

    Some(matched)
}

/// Every pixel within tolerance, regardless of connectivity.
fn global_match(
    source: &dyn PixelSource,
    target: PixelSample,
    tolerance: u8,
    cancel: &CancelToken,
) -> Option<Array2<bool>> {
    let (width, height) = source.dimensions();
    let mut matched = Array2::<bool>::default((height, width));

    Zip::indexed(matched.axis_iter_mut(Axis(0))).par_for_each(|y, mut row| {
        if cancel.is_cancelled() {
            return;
        }
        for (x, hit) in row.iter_mut().enumerate() {
            *hit = source.pixel(x, y).within_tolerance(&target, tolerance);
        }
    });

    if cancel.is_cancelled() {
        None
    } else {
        Some(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn solid(width: usize, height: usize, rgba: [u8; 4]) -> Array3<u8> {
        Array3::from_shape_fn((height, width, 4), |(_, _, c)| rgba[c])
    }

    fn paint(image: &mut Array3<u8>, x: usize, y: usize, rgba: [u8; 4]) {
        for c in 0..4 {
            image[[y, x, c]] = rgba[c];
        }
    }

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    #[test]
    fn test_single_color_fill() {
        let image = solid(5, 5, RED);
        let result = magic_wand_select(&image, 2, 2, 0, true, &CancelToken::new()).unwrap();
        assert_eq!(result.pixel_count, 25);
        assert_eq!(result.region, Some(ScanRegion::full(5, 5)));
        assert!(result.to_mask().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_two_regions() {
        // Left half red, right half blue
        let mut image = solid(4, 4, RED);
        for y in 0..4 {
            for x in 2..4 {
                paint(&mut image, x, y, BLUE);
            }
        }
        let result = magic_wand_select(&image, 0, 0, 0, true, &CancelToken::new()).unwrap();
        assert_eq!(result.pixel_count, 8);
        assert!(result.is_match(1, 3));
        assert!(!result.is_match(2, 0));
    }

    #[test]
    fn test_contiguous_ignores_disconnected_twin() {
        // Blue wall at x = 3 separates two red areas
        let mut image = solid(7, 3, RED);
        for y in 0..3 {
            paint(&mut image, 3, y, BLUE);
        }
        let result = magic_wand_select(&image, 0, 1, 0, true, &CancelToken::new()).unwrap();
        assert_eq!(result.pixel_count, 9);
        assert!(!result.is_match(4, 1));
        assert_eq!(result.region, Some(ScanRegion { x0: 0, y0: 0, x1: 3, y1: 3 }));
    }

    #[test]
    fn test_diagonal_is_not_connected() {
        let mut image = solid(3, 3, BLUE);
        paint(&mut image, 0, 0, RED);
        paint(&mut image, 1, 1, RED);
        let result = magic_wand_select(&image, 0, 0, 0, true, &CancelToken::new()).unwrap();
        assert_eq!(result.pixel_count, 1);
    }

    #[test]
    fn test_tolerance() {
        // 3x3 red gradient
        let values = [250u8, 245, 240, 235, 230, 225, 220, 215, 210];
        let image = Array3::from_shape_fn((3, 3, 4), |(y, x, c)| match c {
            0 => values[y * 3 + x],
            3 => 255,
            _ => 0,
        });
        let result = magic_wand_select(&image, 1, 1, 10, true, &CancelToken::new()).unwrap();
        // 220..=240 around the 230 center
        assert_eq!(result.pixel_count, 5);
    }

    #[test]
    fn test_non_contiguous() {
        // Checkerboard
        let image = Array3::from_shape_fn((5, 5, 4), |(y, x, c)| match c {
            0 if (x + y) % 2 == 0 => 255,
            3 => 255,
            _ => 0,
        });
        let result = magic_wand_select(&image, 0, 0, 0, false, &CancelToken::new()).unwrap();
        assert_eq!(result.pixel_count, 13);

        let contiguous = magic_wand_select(&image, 0, 0, 0, true, &CancelToken::new()).unwrap();
        assert_eq!(contiguous.pixel_count, 1);
    }

    #[test]
    fn test_alpha_counts_toward_tolerance() {
        let mut image = solid(2, 1, RED);
        paint(&mut image, 1, 0, [255, 0, 0, 0]);
        let result = magic_wand_select(&image, 0, 0, 100, false, &CancelToken::new()).unwrap();
        assert_eq!(result.pixel_count, 1);
    }

    #[test]
    fn test_out_of_range_seed() {
        let image = solid(4, 4, RED);
        let token = CancelToken::new();
        assert!(magic_wand_select(&image, -1, 0, 0, true, &token).is_none());
        assert!(magic_wand_select(&image, 0, 4, 0, false, &token).is_none());
    }

    #[test]
    fn test_cancelled_pass_returns_none() {
        let image = solid(128, 128, RED);
        let token = CancelToken::new();
        token.cancel();
        assert!(magic_wand_select(&image, 0, 0, 0, true, &token).is_none());
        assert!(magic_wand_select(&image, 0, 0, 0, false, &token).is_none());
    }
}

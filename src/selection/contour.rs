//! Selection outline geometry for marching ants display.
//!
//! Nothing here animates or draws; the renderer asks for the geometry
//! whenever it repaints and owns the dash offset itself.

use ndarray::{Array2, ArrayView2};

use super::bounds::SelectionBounds;

/// What a renderer needs to outline the current selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoundaryGeometry {
    /// Nothing is selected.
    Empty,
    /// The selection is exactly its bounding rectangle.
    Rectangle(SelectionBounds),
    /// Selected pixels with at least one unselected 4-neighbor, row-major.
    EdgePixels(Vec<(usize, usize)>),
}

/// Outline geometry of `mask` given its cached `bounds`.
pub fn boundary_geometry(mask: ArrayView2<'_, u8>, bounds: Option<SelectionBounds>) -> BoundaryGeometry {
    match bounds {
        None => BoundaryGeometry::Empty,
        Some(b) if is_filled_rectangle(mask, b) => BoundaryGeometry::Rectangle(b),
        Some(b) => BoundaryGeometry::EdgePixels(edge_pixels(mask, b)),
    }
}

/// True if every pixel inside `bounds` is selected.
pub fn is_filled_rectangle(mask: ArrayView2<'_, u8>, bounds: SelectionBounds) -> bool {
    (bounds.y..bounds.bottom()).all(|y| (bounds.x..bounds.right()).all(|x| mask[[y, x]] > 0))
}

/// Boundary pixels inside `bounds`. Pixels outside the mask count as unselected.
pub fn edge_pixels(mask: ArrayView2<'_, u8>, bounds: SelectionBounds) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for y in bounds.y..bounds.bottom() {
        for x in bounds.x..bounds.right() {
            if is_boundary(&mask, x as i32, y as i32) {
                edges.push((x, y));
            }
        }
    }
    edges
}

#[inline]
fn is_selected(mask: &ArrayView2<'_, u8>, x: i32, y: i32) -> bool {
    let (height, width) = mask.dim();
    x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height && mask[[y as usize, x as usize]] > 0
}

#[inline]
fn is_boundary(mask: &ArrayView2<'_, u8>, x: i32, y: i32) -> bool {
    is_selected(mask, x, y)
        && (!is_selected(mask, x - 1, y)
            || !is_selected(mask, x + 1, y)
            || !is_selected(mask, x, y - 1)
            || !is_selected(mask, x, y + 1))
}

/// Moore neighborhood, clockwise from right.
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Trace every boundary into ordered polylines through pixel centers.
///
/// Each boundary pixel appears in exactly one contour.
pub fn extract_contours(mask: ArrayView2<'_, u8>) -> Vec<Vec<(f32, f32)>> {
    let (height, width) = mask.dim();
    let mut visited = Array2::<bool>::default((height, width));
    let mut contours = Vec::new();

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            if !visited[[y as usize, x as usize]] && is_boundary(&mask, x, y) {
                contours.push(trace_boundary(&mask, x, y, &mut visited));
            }
        }
    }
    contours
}

fn trace_boundary(
    mask: &ArrayView2<'_, u8>,
    start_x: i32,
    start_y: i32,
    visited: &mut Array2<bool>,
) -> Vec<(f32, f32)> {
    let mut contour = Vec::new();
    let mut dir = DIRECTIONS
        .iter()
        .position(|&(dx, dy)| !is_selected(mask, start_x + dx, start_y + dy))
        .unwrap_or(0);
    let (mut x, mut y) = (start_x, start_y);
    let max_steps = visited.len() * 2;

    for step in 0..max_steps {
        let cell = &mut visited[[y as usize, x as usize]];
        if !*cell {
            *cell = true;
            contour.push((x as f32 + 0.5, y as f32 + 0.5));
        }

        let search_start = (dir + 5) % 8;
        let next = (0..8).map(|i| (search_start + i) % 8).find_map(|d| {
            let (dx, dy) = DIRECTIONS[d];
            let (nx, ny) = (x + dx, y + dy);
            (is_selected(mask, nx, ny) && is_boundary(mask, nx, ny)).then_some((nx, ny, d))
        });

        match next {
            Some((nx, ny, _)) if nx == start_x && ny == start_y && step > 0 => break,
            Some((nx, ny, d)) => {
                x = nx;
                y = ny;
                dir = d;
            }
            None => break,
        }
    }

    contour
}

/// Flatten contours as `[count, len1, x, y, ..., len2, x, y, ...]`.
pub fn flatten_contours(contours: &[Vec<(f32, f32)>]) -> Vec<f32> {
    let total: usize = contours.iter().map(|c| 1 + c.len() * 2).sum();
    let mut flat = Vec::with_capacity(1 + total);
    flat.push(contours.len() as f32);
    for contour in contours {
        flat.push(contour.len() as f32);
        for &(x, y) in contour {
            flat.push(x);
            flat.push(y);
        }
    }
    flat
}

//! Bounding box of the selected area.

use ndarray::ArrayView2;

/// Tightest axis-aligned rectangle containing every non-zero mask entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SelectionBounds {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl SelectionBounds {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// `(x, y, width, height)`, the tuple layout used by the bindings.
    pub fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (self.x, self.y, self.width, self.height)
    }
}

/// Full scan for the bounds of non-zero weights. `None` if the mask is empty.
pub fn compute_bounds(mask: ArrayView2<'_, u8>) -> Option<SelectionBounds> {
    let (height, width) = mask.dim();
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut found = false;

    for ((y, x), &weight) in mask.indexed_iter() {
        if weight > 0 {
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    found.then(|| SelectionBounds::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

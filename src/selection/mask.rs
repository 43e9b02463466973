//! Per-pixel selection weight storage.
//!
//! The store owns two `(height, width)` buffers: the published front mask and
//! a scratch back buffer. Whole-mask transforms read the front, write the
//! back, and swap only when they finish.

use ndarray::{Array2, ArrayView2, ArrayViewMut2};

use crate::error::{Result, SelectionError};

/// Weight of a fully selected pixel.
pub const FULLY_SELECTED: u8 = 255;

#[derive(Clone, Debug)]
pub struct MaskStore {
    front: Array2<u8>,
    back: Array2<u8>,
}

impl MaskStore {
    /// Allocate a zero-filled `width x height` mask.
    pub fn allocate(width: usize, height: usize) -> Self {
        Self {
            front: Array2::zeros((height, width)),
            back: Array2::zeros((height, width)),
        }
    }

    pub fn width(&self) -> usize {
        self.front.ncols()
    }

    pub fn height(&self) -> usize {
        self.front.nrows()
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<[usize; 2]> {
        if x < 0 || y < 0 || x as usize >= self.width() || y as usize >= self.height() {
            None
        } else {
            Some([y as usize, x as usize])
        }
    }

    /// Weight at `(x, y)`, 0 outside the mask.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> u8 {
        self.index(x, y).map_or(0, |idx| self.front[idx])
    }

    /// Set the weight at `(x, y)`; ignored outside the mask.
    #[inline]
    pub fn set(&mut self, x: i64, y: i64, weight: u8) {
        if let Some(idx) = self.index(x, y) {
            self.front[idx] = weight;
        }
    }

    pub fn fill(&mut self, weight: u8) {
        self.front.fill(weight);
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.front.view()
    }

    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, u8> {
        self.front.view_mut()
    }

    /// Owned copy of the published mask, safe to hand to another thread.
    pub fn snapshot(&self) -> Array2<u8> {
        self.front.clone()
    }

    /// Run `pass` from the frozen front buffer into the back buffer.
    ///
    /// The buffers are swapped only if `pass` returns true; otherwise the
    /// front is left exactly as it was.
    pub fn transform<F>(&mut self, pass: F) -> bool
    where
        F: FnOnce(ArrayView2<'_, u8>, ArrayViewMut2<'_, u8>) -> bool,
    {
        let completed = pass(self.front.view(), self.back.view_mut());
        if completed {
            std::mem::swap(&mut self.front, &mut self.back);
        }
        completed
    }

    /// Replace the front buffer with a mask produced elsewhere.
    pub fn publish(&mut self, next: Array2<u8>) -> Result<()> {
        if next.dim() != self.front.dim() {
            return Err(SelectionError::DimensionMismatch {
                expected: self.dimensions(),
                actual: (next.ncols(), next.nrows()),
            });
        }
        self.back = std::mem::replace(&mut self.front, next);
        Ok(())
    }
}

//! Read-only pixel access for color-based selection.
//!
//! The engine never touches a rendering surface directly; callers hand it
//! anything implementing [`PixelSource`]. Every ndarray image in the usual
//! `(height, width, channels)` layout already does.

use ndarray::{ArrayBase, Data, Ix3};

/// One RGBA sample, used only for tolerance comparisons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PixelSample {
    pub const TRANSPARENT: PixelSample = PixelSample { r: 0, g: 0, b: 0, a: 0 };

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// True if every channel differs from `other` by at most `tolerance`.
    #[inline]
    pub fn within_tolerance(&self, other: &PixelSample, tolerance: u8) -> bool {
        self.r.abs_diff(other.r) <= tolerance
            && self.g.abs_diff(other.g) <= tolerance
            && self.b.abs_diff(other.b) <= tolerance
            && self.a.abs_diff(other.a) <= tolerance
    }
}

/// Capability to read pixels from a layer or a merged composite.
///
/// Coordinates passed to [`pixel`](PixelSource::pixel) are always inside
/// [`dimensions`](PixelSource::dimensions).
pub trait PixelSource: Sync {
    /// `(width, height)`.
    fn dimensions(&self) -> (usize, usize);

    fn pixel(&self, x: usize, y: usize) -> PixelSample;
}

impl<S> PixelSource for ArrayBase<S, Ix3>
where
    S: Data<Elem = u8> + Sync,
{
    fn dimensions(&self) -> (usize, usize) {
        let (height, width, _) = self.dim();
        (width, height)
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> PixelSample {
        match self.dim().2 {
            0 => PixelSample::TRANSPARENT,
            1 => {
                let v = self[[y, x, 0]];
                PixelSample::new(v, v, v, 255)
            }
            2 => {
                let v = self[[y, x, 0]];
                PixelSample::new(v, v, v, self[[y, x, 1]])
            }
            3 => PixelSample::new(self[[y, x, 0]], self[[y, x, 1]], self[[y, x, 2]], 255),
            _ => PixelSample::new(
                self[[y, x, 0]],
                self[[y, x, 1]],
                self[[y, x, 2]],
                self[[y, x, 3]],
            ),
        }
    }
}

/// The two places a magic wand may sample from.
#[derive(Clone, Copy)]
pub struct SampleSources<'a> {
    /// The layer being edited, if there is one.
    pub active_layer: Option<&'a dyn PixelSource>,
    /// Flattened composite of all visible layers.
    pub merged: &'a dyn PixelSource,
}

impl<'a> SampleSources<'a> {
    pub fn new(active_layer: Option<&'a dyn PixelSource>, merged: &'a dyn PixelSource) -> Self {
        Self { active_layer, merged }
    }

    /// A single image serving as both layer and composite.
    pub fn single(source: &'a dyn PixelSource) -> Self {
        Self { active_layer: Some(source), merged: source }
    }

    /// The source the caller asked for, `None` if it wants the active layer
    /// and there is none.
    pub fn pick(&self, sample_merged: bool) -> Option<&'a dyn PixelSource> {
        if sample_merged {
            Some(self.merged)
        } else {
            self.active_layer
        }
    }
}

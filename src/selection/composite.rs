//! Confining an edit to the selection.
//!
//! An edit is applied unconstrained to a copy of the pixels; the before and
//! after buffers are then blended with the mask as alpha:
//! `result = before * (1 - w/255) + after * (w/255)`.

use ndarray::{Array3, ArrayView2, ArrayView3, Axis, Zip};

use crate::error::{Result, SelectionError};

/// Blend `before` and `after` by `mask`, per channel, rounded to nearest.
///
/// Buffers are `(height, width, channels)` with any channel count; the mask
/// is `(height, width)`.
pub fn apply_masked(
    before: ArrayView3<'_, u8>,
    after: ArrayView3<'_, u8>,
    mask: ArrayView2<'_, u8>,
) -> Result<Array3<u8>> {
    let (height, width) = mask.dim();
    check_buffers(&before, &after, (width, height))?;

    let mut result = Array3::<u8>::zeros(before.dim());
    let weights = mask.insert_axis(Axis(2));
    Zip::from(&mut result)
        .and(&before)
        .and(&after)
        .and_broadcast(&weights)
        .par_for_each(|out, &b, &a, &w| {
            *out = blend(b, a, w);
        });
    Ok(result)
}

/// Both buffers must cover the `(width, height)` surface with the same channel count.
pub fn check_buffers(
    before: &ArrayView3<'_, u8>,
    after: &ArrayView3<'_, u8>,
    (width, height): (usize, usize),
) -> Result<()> {
    for (h, w, _) in [before.dim(), after.dim()] {
        if (w, h) != (width, height) {
            return Err(SelectionError::DimensionMismatch {
                expected: (width, height),
                actual: (w, h),
            });
        }
    }
    if before.dim() != after.dim() {
        let (h, w, c) = after.dim();
        return Err(SelectionError::InvalidBuffer {
            len: h * w * c,
            width,
            height,
            channels: before.dim().2,
        });
    }
    Ok(())
}

#[inline]
fn blend(before: u8, after: u8, weight: u8) -> u8 {
    match weight {
        0 => before,
        255 => after,
        _ => {
            let alpha = weight as f32 / 255.0;
            (before as f32 * (1.0 - alpha) + after as f32 * alpha)
                .round()
                .clamp(0.0, 255.0) as u8
        }
    }
}

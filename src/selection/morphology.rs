//! Morphology on selection masks: expand, contract, feather.
//!
//! All three use a circular structuring element of the given radius and
//! only consider neighbors inside the mask. They read a frozen source view
//! and write every pixel of a separate destination, so scan order never
//! affects the result.

use ndarray::{Array2, ArrayView2, ArrayViewMut2, Zip};

use super::cancel::CancelToken;

/// Neighbor offsets `(dx, dy)` with `dx² + dy² <= radius²`.
///
/// Callers pass a radius already clamped by [`clamp_radius`].
fn disk_offsets(radius: u32) -> Vec<(isize, isize)> {
    let r = radius as isize;
    let r_sq = r * r;
    let mut offsets = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r_sq {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

/// Largest radius that still changes anything on a `(height, width)` mask.
///
/// A disk wider than the surface covers it entirely either way.
pub fn clamp_radius(radius: u32, (height, width): (usize, usize)) -> u32 {
    let limit = u32::try_from(height.max(width)).unwrap_or(u32::MAX).max(1);
    radius.min(limit)
}

/// In-bounds neighbors of `(x, y)` under `offsets`.
#[inline]
fn neighbors<'a>(
    src: ArrayView2<'a, u8>,
    offsets: &'a [(isize, isize)],
    x: usize,
    y: usize,
) -> impl Iterator<Item = u8> + 'a {
    let (height, width) = src.dim();
    offsets.iter().filter_map(move |&(dx, dy)| {
        let sx = x as isize + dx;
        let sy = y as isize + dy;
        if sx < 0 || sy < 0 || sx >= width as isize || sy >= height as isize {
            None
        } else {
            Some(src[[sy as usize, sx as usize]])
        }
    })
}

/// Fill `dst` from `src` with `kernel`, in parallel. False if cancelled.
fn run_pass<F>(
    src: ArrayView2<'_, u8>,
    mut dst: ArrayViewMut2<'_, u8>,
    radius: u32,
    cancel: &CancelToken,
    kernel: F,
) -> bool
where
    F: Fn(&ArrayView2<'_, u8>, &[(isize, isize)], usize, usize) -> u8 + Sync,
{
    let offsets = disk_offsets(clamp_radius(radius, src.dim()));
    Zip::indexed(&mut dst).par_for_each(|(y, x), out| {
        if cancel.is_cancelled() {
            return;
        }
        *out = kernel(&src, &offsets, x, y);
    });
    !cancel.is_cancelled()
}

/// Dilation: selected if any neighbor within `radius` is selected.
pub fn expand_into(
    src: ArrayView2<'_, u8>,
    dst: ArrayViewMut2<'_, u8>,
    radius: u32,
    cancel: &CancelToken,
) -> bool {
    run_pass(src, dst, radius, cancel, |src, offsets, x, y| {
        if neighbors(src.view(), offsets, x, y).any(|w| w > 0) {
            255
        } else {
            0
        }
    })
}

/// Erosion: selected only if every neighbor within `radius` is selected.
pub fn contract_into(
    src: ArrayView2<'_, u8>,
    dst: ArrayViewMut2<'_, u8>,
    radius: u32,
    cancel: &CancelToken,
) -> bool {
    run_pass(src, dst, radius, cancel, |src, offsets, x, y| {
        if neighbors(src.view(), offsets, x, y).all(|w| w > 0) {
            255
        } else {
            0
        }
    })
}

/// Mean weight over the in-bounds part of the disk around each pixel.
///
/// Edge pixels average over fewer samples; the disk is not renormalized
/// into a true kernel.
pub fn feather_into(
    src: ArrayView2<'_, u8>,
    dst: ArrayViewMut2<'_, u8>,
    radius: u32,
    cancel: &CancelToken,
) -> bool {
    run_pass(src, dst, radius, cancel, |src, offsets, x, y| {
        let (sum, count) = neighbors(src.view(), offsets, x, y)
            .fold((0u64, 0u64), |(sum, count), w| (sum + w as u64, count + 1));
        if count == 0 {
            0
        } else {
            (sum as f64 / count as f64).round().clamp(0.0, 255.0) as u8
        }
    })
}

fn allocate_and_run(
    src: ArrayView2<'_, u8>,
    radius: u32,
    cancel: &CancelToken,
    pass: fn(ArrayView2<'_, u8>, ArrayViewMut2<'_, u8>, u32, &CancelToken) -> bool,
) -> Option<Array2<u8>> {
    if radius == 0 {
        return Some(src.to_owned());
    }
    let mut dst = Array2::<u8>::zeros(src.dim());
    pass(src, dst.view_mut(), radius, cancel).then_some(dst)
}

/// [`expand_into`] into a fresh buffer. `None` if cancelled.
///
/// Radius 0 returns a copy of `src`.
pub fn expand_mask(src: ArrayView2<'_, u8>, radius: u32, cancel: &CancelToken) -> Option<Array2<u8>> {
    allocate_and_run(src, radius, cancel, expand_into)
}

/// [`contract_into`] into a fresh buffer. `None` if cancelled.
pub fn contract_mask(src: ArrayView2<'_, u8>, radius: u32, cancel: &CancelToken) -> Option<Array2<u8>> {
    allocate_and_run(src, radius, cancel, contract_into)
}

/// [`feather_into`] into a fresh buffer. `None` if cancelled.
pub fn feather_mask(src: ArrayView2<'_, u8>, radius: u32, cancel: &CancelToken) -> Option<Array2<u8>> {
    allocate_and_run(src, radius, cancel, feather_into)
}

//! WebAssembly exports for the selection engine.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. They work on
//! flat buffers the way canvas `ImageData` does:
//! - images: RGBA bytes, length = width * height * 4
//! - masks: one byte per pixel, length = width * height
//!
//! Malformed buffers are reported as JS errors instead of panicking.

use ndarray::{ArrayView2, ArrayView3};
use wasm_bindgen::prelude::*;

use crate::error::SelectionError;
use crate::selection::bounds::compute_bounds;
use crate::selection::cancel::CancelToken;
use crate::selection::composite;
use crate::selection::contour::{extract_contours, flatten_contours};
use crate::selection::magic_wand::magic_wand_select;
use crate::selection::morphology::{contract_mask, expand_mask, feather_mask};

fn rgba_view(data: &[u8], width: usize, height: usize) -> Result<ArrayView3<'_, u8>, JsError> {
    ArrayView3::from_shape((height, width, 4), data).map_err(|_| {
        JsError::from(SelectionError::InvalidBuffer {
            len: data.len(),
            width,
            height,
            channels: 4,
        })
    })
}

fn mask_view(mask: &[u8], width: usize, height: usize) -> Result<ArrayView2<'_, u8>, JsError> {
    ArrayView2::from_shape((height, width), mask).map_err(|_| {
        JsError::from(SelectionError::InvalidBuffer {
            len: mask.len(),
            width,
            height,
            channels: 1,
        })
    })
}

// ============================================================================
// Magic Wand
// ============================================================================

/// Magic wand selection on an RGBA image.
///
/// # Returns
/// Mask bytes (255 = selected). An out-of-range seed selects nothing.
#[wasm_bindgen]
pub fn magic_wand_select_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    x: i32,
    y: i32,
    tolerance: u8,
    contiguous: bool,
) -> Result<Vec<u8>, JsError> {
    let image = rgba_view(data, width, height)?;
    let mask = magic_wand_select(&image, x as i64, y as i64, tolerance, contiguous, &CancelToken::new())
        .map(|result| result.to_mask().into_raw_vec_and_offset().0)
        .unwrap_or_else(|| vec![0; width * height]);
    Ok(mask)
}

// ============================================================================
// Morphology
// ============================================================================

#[wasm_bindgen]
pub fn expand_mask_wasm(mask: &[u8], width: usize, height: usize, radius: u32) -> Result<Vec<u8>, JsError> {
    let view = mask_view(mask, width, height)?;
    Ok(expand_mask(view, radius, &CancelToken::new())
        .map(|m| m.into_raw_vec_and_offset().0)
        .unwrap_or_else(|| mask.to_vec()))
}

#[wasm_bindgen]
pub fn contract_mask_wasm(mask: &[u8], width: usize, height: usize, radius: u32) -> Result<Vec<u8>, JsError> {
    let view = mask_view(mask, width, height)?;
    Ok(contract_mask(view, radius, &CancelToken::new())
        .map(|m| m.into_raw_vec_and_offset().0)
        .unwrap_or_else(|| mask.to_vec()))
}

#[wasm_bindgen]
pub fn feather_mask_wasm(mask: &[u8], width: usize, height: usize, radius: u32) -> Result<Vec<u8>, JsError> {
    let view = mask_view(mask, width, height)?;
    Ok(feather_mask(view, radius, &CancelToken::new())
        .map(|m| m.into_raw_vec_and_offset().0)
        .unwrap_or_else(|| mask.to_vec()))
}

// ============================================================================
// Compositing & Geometry
// ============================================================================

/// Blend `after` into `before` using `mask` as alpha. Both images are RGBA.
#[wasm_bindgen]
pub fn apply_masked_wasm(
    before: &[u8],
    after: &[u8],
    mask: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, JsError> {
    let before = rgba_view(before, width, height)?;
    let after = rgba_view(after, width, height)?;
    let mask = mask_view(mask, width, height)?;
    let result = composite::apply_masked(before, after, mask)?;
    Ok(result.into_raw_vec_and_offset().0)
}

/// `[x, y, width, height]`, or an empty array when nothing is selected.
#[wasm_bindgen]
pub fn mask_bounds_wasm(mask: &[u8], width: usize, height: usize) -> Result<Vec<u32>, JsError> {
    let view = mask_view(mask, width, height)?;
    Ok(compute_bounds(view)
        .map(|b| vec![b.x as u32, b.y as u32, b.width as u32, b.height as u32])
        .unwrap_or_default())
}

/// Outline contours as `[count, len1, x, y, ..., len2, x, y, ...]`.
#[wasm_bindgen]
pub fn extract_contours_wasm(mask: &[u8], width: usize, height: usize) -> Result<Vec<f32>, JsError> {
    let view = mask_view(mask, width, height)?;
    Ok(flatten_contours(&extract_contours(view)))
}

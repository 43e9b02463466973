//! ImageStag Selection Engine
//!
//! Region-of-interest masking for raster image editing, with Python
//! bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Mask Format
//! A selection is a `(height, width)` `u8` weight map:
//! - **0**: unselected
//! - **255**: fully selected
//! - **1-254**: partially selected (feathered edges)
//!
//! ## Image Format
//! Pixel buffers follow the ImageStag convention `(height, width, channels)`
//! with 1, 3 or 4 `u8` channels. Color matching treats grayscale as
//! `(v, v, v, 255)` and RGB as opaque.
//!
//! ## Architecture
//! [`selection::SelectionEngine`] owns the mask for one surface. Tools call
//! its shape, magic wand and morphology mutators; edits consult
//! [`selection::SelectionEngine::apply_masked`] to stay inside the selection;
//! the renderer polls [`selection::SelectionEngine::boundary_geometry`] for
//! the marching ants outline.

pub mod config;
pub mod error;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::SelectionConfig;
pub use error::{Result, SelectionError};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::config::SelectionConfig;
    use crate::error::SelectionError;
    use crate::selection::contour;
    use crate::selection::{
        BoundaryGeometry, CombinationMode, IntersectPolicy, MagicWandOptions, OperationStatus,
        Point, SampleSources, SelectionEngine,
    };

    fn value_error(err: SelectionError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn parse_mode(mode: &str) -> PyResult<CombinationMode> {
        mode.parse().map_err(value_error)
    }

    fn applied(status: OperationStatus) -> bool {
        status == OperationStatus::Applied
    }

    // ========================================================================
    // Selection Engine
    // ========================================================================

    /// Selection mask for one raster surface.
    ///
    /// Modes are given as strings: "replace", "add", "subtract", "intersect".
    /// Mutators return True if the mask was changed.
    #[pyclass(name = "SelectionEngine", module = "imagestag_selection")]
    pub struct PySelectionEngine {
        inner: SelectionEngine,
    }

    #[pymethods]
    impl PySelectionEngine {
        #[new]
        #[pyo3(signature = (width, height, tolerance=32, contiguous=true, strict_intersect=false))]
        fn new(width: usize, height: usize, tolerance: u8, contiguous: bool, strict_intersect: bool) -> Self {
            let policy = if strict_intersect {
                IntersectPolicy::Strict
            } else {
                IntersectPolicy::Legacy
            };
            let config = SelectionConfig::default()
                .with_tolerance(tolerance)
                .with_contiguous(contiguous)
                .with_intersect_policy(policy);
            Self {
                inner: SelectionEngine::with_config(width, height, config),
            }
        }

        #[getter]
        fn width(&self) -> usize {
            self.inner.width()
        }

        #[getter]
        fn height(&self) -> usize {
            self.inner.height()
        }

        /// Reallocate for a new canvas size. Drops the selection.
        fn resize(&mut self, width: usize, height: usize) {
            self.inner.resize(width, height);
        }

        fn has_selection(&self) -> bool {
            self.inner.has_selection()
        }

        /// (x, y, width, height) or None.
        fn bounds(&self) -> Option<(usize, usize, usize, usize)> {
            self.inner.bounds().map(|b| b.as_tuple())
        }

        fn is_point_selected(&self, x: i64, y: i64) -> bool {
            self.inner.is_point_selected(x, y)
        }

        fn clear_selection(&mut self) {
            self.inner.clear_selection();
        }

        fn select_all(&mut self) {
            self.inner.select_all();
        }

        fn invert_selection(&mut self) {
            self.inner.invert_selection();
        }

        #[pyo3(signature = (x1, y1, x2, y2, mode="replace"))]
        fn select_rectangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, mode: &str) -> PyResult<bool> {
            let mode = parse_mode(mode)?;
            Ok(applied(self.inner.select_rectangle(x1, y1, x2, y2, mode)))
        }

        #[pyo3(signature = (cx, cy, rx, ry, mode="replace"))]
        fn select_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, mode: &str) -> PyResult<bool> {
            let mode = parse_mode(mode)?;
            Ok(applied(self.inner.select_ellipse(cx, cy, rx, ry, mode)))
        }

        /// Lasso selection from a list of (x, y) points.
        #[pyo3(signature = (points, mode="replace"))]
        fn select_lasso(&mut self, points: Vec<(f32, f32)>, mode: &str) -> PyResult<bool> {
            let mode = parse_mode(mode)?;
            let points: Vec<Point> = points.into_iter().map(Point::from).collect();
            Ok(applied(self.inner.select_lasso(&points, mode)))
        }

        /// Magic wand on `image` (H, W, C) u8.
        ///
        /// The caller decides whether `image` is the active layer or the
        /// merged composite. Omitted options fall back to the engine config.
        #[pyo3(signature = (image, x, y, tolerance=None, contiguous=None, mode="replace"))]
        fn select_magic_wand<'py>(
            &mut self,
            image: PyReadonlyArray3<'py, u8>,
            x: i64,
            y: i64,
            tolerance: Option<u8>,
            contiguous: Option<bool>,
            mode: &str,
        ) -> PyResult<bool> {
            let mode = parse_mode(mode)?;
            let view = image.as_array();
            let defaults = self.inner.config().wand_options();
            let options = MagicWandOptions {
                tolerance: tolerance.unwrap_or(defaults.tolerance),
                contiguous: contiguous.unwrap_or(defaults.contiguous),
                ..defaults
            };
            let status = self
                .inner
                .select_magic_wand(x, y, options, mode, &SampleSources::single(&view))
                .map_err(value_error)?;
            Ok(applied(status))
        }

        fn expand(&mut self, radius: i32) -> bool {
            applied(self.inner.expand(radius))
        }

        fn contract(&mut self, radius: i32) -> bool {
            applied(self.inner.contract(radius))
        }

        fn feather(&mut self, radius: i32) -> bool {
            applied(self.inner.feather(radius))
        }

        /// Copy of the mask as (H, W) u8.
        fn mask<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<u8>> {
            self.inner.snapshot().into_pyarray(py)
        }

        /// Replace the mask with one computed elsewhere.
        fn set_mask<'py>(&mut self, mask: PyReadonlyArray2<'py, u8>) -> PyResult<()> {
            self.inner.publish(mask.as_array().to_owned()).map_err(value_error)
        }

        /// Blend `after` into `before` using the selection as alpha.
        fn apply_masked<'py>(
            &self,
            py: Python<'py>,
            before: PyReadonlyArray3<'py, u8>,
            after: PyReadonlyArray3<'py, u8>,
        ) -> PyResult<Bound<'py, PyArray3<u8>>> {
            let result = self
                .inner
                .apply_masked(before.as_array(), after.as_array())
                .map_err(value_error)?;
            Ok(result.into_pyarray(py))
        }

        /// (x, y, width, height) if the selection is exactly a filled rectangle.
        fn boundary_rectangle(&self) -> Option<(usize, usize, usize, usize)> {
            match self.inner.boundary_geometry() {
                BoundaryGeometry::Rectangle(b) => Some(b.as_tuple()),
                _ => None,
            }
        }

        /// Boundary pixels as (x, y); empty for rectangular or empty selections.
        fn edge_pixels(&self) -> Vec<(usize, usize)> {
            match self.inner.boundary_geometry() {
                BoundaryGeometry::EdgePixels(edges) => edges,
                _ => Vec::new(),
            }
        }

        /// Ordered outline polylines through boundary pixel centers.
        fn outline(&self) -> Vec<Vec<(f32, f32)>> {
            self.inner.outline_contours()
        }
    }

    // ========================================================================
    // Contours
    // ========================================================================

    /// Trace outline polylines from an (H, W) u8 mask.
    #[pyfunction]
    pub fn extract_contours<'py>(mask: PyReadonlyArray2<'py, u8>) -> Vec<Vec<(f32, f32)>> {
        contour::extract_contours(mask.as_array())
    }

    /// ImageStag selection extension module
    #[pymodule]
    pub fn imagestag_selection(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<PySelectionEngine>()?;
        m.add_function(wrap_pyfunction!(extract_contours, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::imagestag_selection;

//! The selection engine: one mask per editing surface.
//!
//! Tool code calls the mutators, downstream edits call [`SelectionEngine::apply_masked`]
//! or [`SelectionEngine::is_point_selected`], and the renderer polls
//! [`SelectionEngine::boundary_geometry`]. The engine is synchronous; the
//! expensive passes accept a [`CancelToken`] and leave the mask untouched
//! when cancelled.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use tracing::{debug, info, trace};

use super::bounds::{compute_bounds, SelectionBounds};
use super::cancel::CancelToken;
use super::combine::{combine, CombinationMode, ScanRegion};
use super::composite;
use super::contour::{self, BoundaryGeometry};
use super::magic_wand::{magic_wand_select, MagicWandOptions};
use super::mask::{MaskStore, FULLY_SELECTED};
use super::morphology;
use super::pixels::SampleSources;
use super::shapes::{rasterize_ellipse, rasterize_polygon, rasterize_rectangle, Point, SelectionShapeSpec};
use crate::config::SelectionConfig;
use crate::error::{Result, SelectionError};

/// Outcome of a mutating call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationStatus {
    /// The mask was rewritten and bounds recomputed.
    Applied,
    /// Input was degenerate or out of range; nothing changed.
    NoOp,
    /// The pass was cancelled; the previous mask is intact.
    Cancelled,
}

#[derive(Clone, Copy, Debug)]
enum Morph {
    Expand,
    Contract,
    Feather,
}

impl Morph {
    fn name(self) -> &'static str {
        match self {
            Morph::Expand => "expand",
            Morph::Contract => "contract",
            Morph::Feather => "feather",
        }
    }
}

/// Selection state for one raster surface.
#[derive(Clone, Debug)]
pub struct SelectionEngine {
    mask: MaskStore,
    bounds: Option<SelectionBounds>,
    config: SelectionConfig,
}

impl SelectionEngine {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_config(width, height, SelectionConfig::default())
    }

    pub fn with_config(width: usize, height: usize, config: SelectionConfig) -> Self {
        Self {
            mask: MaskStore::allocate(width, height),
            bounds: None,
            config,
        }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn width(&self) -> usize {
        self.mask.width()
    }

    pub fn height(&self) -> usize {
        self.mask.height()
    }

    /// Reallocate for a new surface size. The selection is dropped.
    pub fn resize(&mut self, width: usize, height: usize) {
        info!(width, height, "reallocating selection mask");
        self.mask = MaskStore::allocate(width, height);
        self.bounds = None;
    }

    /// Reallocate only if the surface size changed. Returns true if it did.
    pub fn ensure_size(&mut self, width: usize, height: usize) -> bool {
        if self.mask.dimensions() == (width, height) {
            return false;
        }
        self.resize(width, height);
        true
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn has_selection(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn bounds(&self) -> Option<SelectionBounds> {
        self.bounds
    }

    /// Selection weight at `(x, y)`, 0 outside the surface.
    pub fn weight(&self, x: i64, y: i64) -> u8 {
        self.mask.get(x, y)
    }

    /// Everything counts as selected while there is no selection.
    pub fn is_point_selected(&self, x: i64, y: i64) -> bool {
        !self.has_selection() || self.mask.get(x, y) > 0
    }

    pub fn mask(&self) -> ArrayView2<'_, u8> {
        self.mask.view()
    }

    /// Owned copy of the mask for processing on another thread.
    pub fn snapshot(&self) -> Array2<u8> {
        self.mask.snapshot()
    }

    pub fn boundary_geometry(&self) -> BoundaryGeometry {
        contour::boundary_geometry(self.mask.view(), self.bounds)
    }

    /// Ordered outline polylines through boundary pixel centers.
    pub fn outline_contours(&self) -> Vec<Vec<(f32, f32)>> {
        if !self.has_selection() {
            return Vec::new();
        }
        contour::extract_contours(self.mask.view())
    }

    /// Blend an edit into the original pixels using the mask as alpha.
    ///
    /// With no selection the edit applies everywhere and `after` is returned.
    pub fn apply_masked(&self, before: ArrayView3<'_, u8>, after: ArrayView3<'_, u8>) -> Result<Array3<u8>> {
        if !self.has_selection() {
            composite::check_buffers(&before, &after, self.mask.dimensions())?;
            return Ok(after.to_owned());
        }
        composite::apply_masked(before, after, self.mask.view())
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    pub fn clear_selection(&mut self) {
        self.mask.fill(0);
        self.bounds = None;
        debug!("selection cleared");
    }

    pub fn select_all(&mut self) {
        self.mask.fill(FULLY_SELECTED);
        self.refresh_bounds("select_all");
    }

    /// `w -> 255 - w` for every pixel. Inverting an empty mask selects everything.
    pub fn invert_selection(&mut self) {
        self.mask.view_mut().mapv_inplace(|w| 255 - w);
        self.refresh_bounds("invert");
    }

    pub fn select_rectangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, mode: CombinationMode) -> OperationStatus {
        let policy = self.config.intersect_policy;
        let touched = rasterize_rectangle(self.mask.view_mut(), (x1, y1, x2, y2), mode, policy);
        // An empty region still clears under Replace
        if !touched && mode != CombinationMode::Replace {
            trace!(x1, y1, x2, y2, "rectangle outside surface ignored");
            return OperationStatus::NoOp;
        }
        self.refresh_bounds(mode.as_str());
        OperationStatus::Applied
    }

    pub fn select_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, mode: CombinationMode) -> OperationStatus {
        let policy = self.config.intersect_policy;
        if !rasterize_ellipse(self.mask.view_mut(), (cx, cy, rx, ry), mode, policy) {
            trace!(rx, ry, "degenerate ellipse ignored");
            return OperationStatus::NoOp;
        }
        self.refresh_bounds(mode.as_str());
        OperationStatus::Applied
    }

    pub fn select_lasso(&mut self, points: &[Point], mode: CombinationMode) -> OperationStatus {
        let policy = self.config.intersect_policy;
        if !rasterize_polygon(self.mask.view_mut(), points, mode, policy) {
            trace!(points = points.len(), "degenerate lasso ignored");
            return OperationStatus::NoOp;
        }
        self.refresh_bounds(mode.as_str());
        OperationStatus::Applied
    }

    /// Magic wand with the tolerance, connectivity and sampling defaults of
    /// the engine's [`SelectionConfig`].
    pub fn select_magic_wand_default(
        &mut self,
        x: i64,
        y: i64,
        mode: CombinationMode,
        sources: &SampleSources<'_>,
    ) -> Result<OperationStatus> {
        self.select_magic_wand(x, y, self.config.wand_options(), mode, sources)
    }

    pub fn select_magic_wand(
        &mut self,
        x: i64,
        y: i64,
        options: MagicWandOptions,
        mode: CombinationMode,
        sources: &SampleSources<'_>,
    ) -> Result<OperationStatus> {
        self.select_magic_wand_cancellable(x, y, options, mode, sources, &CancelToken::new())
    }

    pub fn select_magic_wand_cancellable(
        &mut self,
        x: i64,
        y: i64,
        options: MagicWandOptions,
        mode: CombinationMode,
        sources: &SampleSources<'_>,
        cancel: &CancelToken,
    ) -> Result<OperationStatus> {
        let Some(source) = sources.pick(options.sample_merged) else {
            trace!("magic wand without an active layer ignored");
            return Ok(OperationStatus::NoOp);
        };
        let (width, height) = source.dimensions();
        self.check_surface(width, height)?;

        let (x_in, y_in) = (x >= 0 && (x as usize) < width, y >= 0 && (y as usize) < height);
        if !(x_in && y_in) {
            trace!(x, y, "magic wand seed outside surface ignored");
            return Ok(OperationStatus::NoOp);
        }

        let Some(result) = magic_wand_select(source, x, y, options.tolerance, options.contiguous, cancel) else {
            debug!(x, y, "magic wand cancelled");
            return Ok(OperationStatus::Cancelled);
        };
        debug!(x, y, tolerance = options.tolerance, matched = result.pixel_count, "magic wand");

        // Nothing matched still gets an empty region so Replace and strict Intersect clear
        let region = result.region.unwrap_or(ScanRegion::EMPTY);
        combine(
            self.mask.view_mut(),
            region,
            mode,
            self.config.intersect_policy,
            |px, py| result.is_match(px, py),
        );
        self.refresh_bounds(mode.as_str());
        Ok(OperationStatus::Applied)
    }

    /// Rasterize any [`SelectionShapeSpec`]. `sources` is only read by the magic wand.
    pub fn apply_shape(
        &mut self,
        spec: &SelectionShapeSpec,
        mode: CombinationMode,
        sources: Option<&SampleSources<'_>>,
    ) -> Result<OperationStatus> {
        Ok(match spec {
            SelectionShapeSpec::Rectangle { x1, y1, x2, y2 } => self.select_rectangle(*x1, *y1, *x2, *y2, mode),
            SelectionShapeSpec::Ellipse { cx, cy, rx, ry } => self.select_ellipse(*cx, *cy, *rx, *ry, mode),
            SelectionShapeSpec::Polygon { points } => self.select_lasso(points, mode),
            SelectionShapeSpec::MagicWand { x, y, options } => match sources {
                Some(sources) => return self.select_magic_wand(*x, *y, *options, mode, sources),
                None => OperationStatus::NoOp,
            },
        })
    }

    pub fn expand(&mut self, radius: i32) -> OperationStatus {
        self.morph(Morph::Expand, radius, &CancelToken::new())
    }

    pub fn contract(&mut self, radius: i32) -> OperationStatus {
        self.morph(Morph::Contract, radius, &CancelToken::new())
    }

    pub fn feather(&mut self, radius: i32) -> OperationStatus {
        self.morph(Morph::Feather, radius, &CancelToken::new())
    }

    pub fn expand_cancellable(&mut self, radius: i32, cancel: &CancelToken) -> OperationStatus {
        self.morph(Morph::Expand, radius, cancel)
    }

    pub fn contract_cancellable(&mut self, radius: i32, cancel: &CancelToken) -> OperationStatus {
        self.morph(Morph::Contract, radius, cancel)
    }

    pub fn feather_cancellable(&mut self, radius: i32, cancel: &CancelToken) -> OperationStatus {
        self.morph(Morph::Feather, radius, cancel)
    }

    /// Swap in a mask processed elsewhere (e.g. from [`snapshot`](Self::snapshot)).
    pub fn publish(&mut self, mask: Array2<u8>) -> Result<()> {
        self.mask.publish(mask)?;
        self.refresh_bounds("publish");
        Ok(())
    }

    // ------------------------------------------------------------------

    fn morph(&mut self, op: Morph, radius: i32, cancel: &CancelToken) -> OperationStatus {
        if radius <= 0 || !self.has_selection() {
            trace!(op = op.name(), radius, "morphology skipped");
            return OperationStatus::NoOp;
        }
        let radius = morphology::clamp_radius(radius as u32, self.mask.view().dim());

        let completed = self.mask.transform(|src, dst| match op {
            Morph::Expand => morphology::expand_into(src, dst, radius, cancel),
            Morph::Contract => morphology::contract_into(src, dst, radius, cancel),
            Morph::Feather => morphology::feather_into(src, dst, radius, cancel),
        });
        if !completed {
            debug!(op = op.name(), radius, "morphology cancelled");
            return OperationStatus::Cancelled;
        }
        self.refresh_bounds(op.name());
        OperationStatus::Applied
    }

    fn refresh_bounds(&mut self, op: &str) {
        self.bounds = compute_bounds(self.mask.view());
        debug!(op, bounds = ?self.bounds, "selection updated");
    }

    fn check_surface(&self, width: usize, height: usize) -> Result<()> {
        if (width, height) != self.mask.dimensions() {
            return Err(SelectionError::DimensionMismatch {
                expected: self.mask.dimensions(),
                actual: (width, height),
            });
        }
        Ok(())
    }
}

//! Selection algorithms for image editing.
//!
//! This module provides the masking engine behind the selection tools:
//! - **Shapes**: rectangle, ellipse and lasso rasterization
//! - **Magic wand**: flood fill and global color matching under a tolerance
//! - **Morphology**: expand, contract and feather on the selection mask
//! - **Contours**: outline geometry for marching ants visualization
//! - **Compositing**: confining an edit to the selected pixels
//!
//! [`SelectionEngine`] ties them together for one raster surface.

pub mod bounds;
pub mod cancel;
pub mod combine;
pub mod composite;
pub mod contour;
pub mod engine;
pub mod magic_wand;
pub mod mask;
pub mod morphology;
pub mod pixels;
pub mod shapes;

pub use bounds::SelectionBounds;
pub use cancel::CancelToken;
pub use combine::{CombinationMode, IntersectPolicy};
pub use contour::{extract_contours, BoundaryGeometry};
pub use engine::{OperationStatus, SelectionEngine};
pub use magic_wand::{magic_wand_select, MagicWandOptions};
pub use pixels::{PixelSample, PixelSource, SampleSources};
pub use shapes::{Point, SelectionShapeSpec};

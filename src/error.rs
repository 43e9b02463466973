//! Error types for the selection engine.
//!
//! Out-of-range coordinates and radii are never errors; they are clamped or
//! ignored by the operations themselves. Only precondition violations at the
//! API boundary end up here.

use thiserror::Error;

/// Errors surfaced by the selection engine and its bindings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// A buffer does not match the surface the mask was allocated for.
    /// Dimensions are `(width, height)`.
    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("invalid buffer: {len} values cannot hold {width}x{height}x{channels}")]
    InvalidBuffer {
        len: usize,
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("unknown combination mode: {0}")]
    UnknownMode(String),
}

pub type Result<T> = std::result::Result<T, SelectionError>;

//! Engine configuration.

use crate::selection::combine::IntersectPolicy;
use crate::selection::magic_wand::MagicWandOptions;

/// Default magic wand tolerance (max per-channel difference).
pub const DEFAULT_TOLERANCE: u8 = 32;

/// Settings shared by every operation of a [`SelectionEngine`].
///
/// [`SelectionEngine`]: crate::selection::SelectionEngine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Tolerance used when a magic wand call does not specify one.
    pub default_tolerance: u8,
    /// Whether the magic wand defaults to flood fill (true) or global match.
    pub contiguous: bool,
    /// Whether the magic wand defaults to sampling the merged composite.
    pub sample_merged: bool,
    /// Semantics of [`CombinationMode::Intersect`](crate::selection::CombinationMode::Intersect).
    pub intersect_policy: IntersectPolicy,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_tolerance: DEFAULT_TOLERANCE,
            contiguous: true,
            sample_merged: false,
            intersect_policy: IntersectPolicy::Legacy,
        }
    }
}

impl SelectionConfig {
    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.default_tolerance = tolerance;
        self
    }

    pub fn with_contiguous(mut self, contiguous: bool) -> Self {
        self.contiguous = contiguous;
        self
    }

    pub fn with_sample_merged(mut self, sample_merged: bool) -> Self {
        self.sample_merged = sample_merged;
        self
    }

    pub fn with_intersect_policy(mut self, policy: IntersectPolicy) -> Self {
        self.intersect_policy = policy;
        self
    }

    /// Magic wand options seeded from this configuration.
    pub fn wand_options(&self) -> MagicWandOptions {
        MagicWandOptions {
            tolerance: self.default_tolerance,
            contiguous: self.contiguous,
            sample_merged: self.sample_merged,
        }
    }
}

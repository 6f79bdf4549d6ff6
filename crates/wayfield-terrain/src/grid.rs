//! Row-major grids of normalized height samples.

use crate::classify::{BandId, HeightClassifier};

/// A `width × depth` grid of normalized heights in `[0, 1]`.
///
/// Stored row-major: the sample at `(x, z)` lives at `z * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    width: usize,
    depth: usize,
    values: Vec<f64>,
}

impl HeightGrid {
    pub(crate) fn from_values(width: usize, depth: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), width * depth);
        Self {
            width,
            depth,
            values,
        }
    }

    /// Number of samples along X.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of samples along Z.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the sample at `(x, z)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `z >= depth`.
    pub fn get(&self, x: usize, z: usize) -> f64 {
        assert!(x < self.width && z < self.depth, "sample ({x}, {z}) out of bounds");
        self.values[z * self.width + x]
    }

    /// Returns row `z` as a slice.
    pub fn row(&self, z: usize) -> &[f64] {
        &self.values[z * self.width..(z + 1) * self.width]
    }

    /// All samples in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mean of all samples, or 0 for an empty grid.
    pub fn mean(&self) -> f64 {
        self.mean_by(|h| h)
    }

    /// Mean of `f(sample)` over all samples, or 0 for an empty grid.
    pub fn mean_by(&self, f: impl Fn(f64) -> f64) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let total: f64 = self.values.iter().map(|&h| f(h)).sum();
        total / self.values.len() as f64
    }

    /// Classify every sample into a terrain band (row-major).
    pub fn classify(&self, classifier: &HeightClassifier) -> Vec<BandId> {
        self.values.iter().map(|&h| classifier.classify(h)).collect()
    }
}

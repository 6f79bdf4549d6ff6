//! Height curve and height scale: turning normalized heights into world heights.

use std::sync::Arc;

use crate::error::TerrainError;

/// Monotonic remapping applied to a normalized height before scaling.
pub trait HeightCurve: Send + Sync {
    /// Remap `height`.
    fn evaluate(&self, height: f64) -> f64;
}

/// The identity curve.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearCurve;

impl HeightCurve for LinearCurve {
    fn evaluate(&self, height: f64) -> f64 {
        height
    }
}

/// Piecewise-linear curve through `(input, output)` keyframes.
///
/// Inputs before the first key or after the last are clamped to the end keys.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeCurve {
    keys: Vec<(f64, f64)>,
}

impl KeyframeCurve {
    /// Creates a curve from keys sorted by input.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] if there are no keys, any
    /// key is non-finite, inputs are not strictly increasing, or outputs
    /// decrease (the curve must be monotonic).
    pub fn new(keys: Vec<(f64, f64)>) -> Result<Self, TerrainError> {
        if keys.is_empty() {
            return Err(TerrainError::invalid("height_curve", "needs at least one key"));
        }
        if keys.iter().any(|(i, o)| !i.is_finite() || !o.is_finite()) {
            return Err(TerrainError::invalid("height_curve", "keys must be finite"));
        }
        for pair in keys.windows(2) {
            let ((i0, o0), (i1, o1)) = (pair[0], pair[1]);
            if i1 <= i0 {
                return Err(TerrainError::invalid(
                    "height_curve",
                    format!("key inputs must increase, got {i0} then {i1}"),
                ));
            }
            if o1 < o0 {
                return Err(TerrainError::invalid(
                    "height_curve",
                    format!("curve must be monotonic, output falls from {o0} to {o1}"),
                ));
            }
        }
        Ok(Self { keys })
    }

    /// The keyframes.
    pub fn keys(&self) -> &[(f64, f64)] {
        &self.keys
    }
}

impl HeightCurve for KeyframeCurve {
    fn evaluate(&self, height: f64) -> f64 {
        let (first_in, first_out) = self.keys[0];
        if height <= first_in {
            return first_out;
        }
        for pair in self.keys.windows(2) {
            let ((i0, o0), (i1, o1)) = (pair[0], pair[1]);
            if height <= i1 {
                let t = (height - i0) / (i1 - i0);
                return o0 + t * (o1 - o0);
            }
        }
        self.keys[self.keys.len() - 1].1
    }
}

/// Height curve plus height scale.
#[derive(Clone)]
pub struct TerrainShape {
    curve: Arc<dyn HeightCurve>,
    height_scale: f64,
}

impl TerrainShape {
    /// Creates a shape.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] unless `height_scale` is
    /// positive and finite.
    pub fn new(curve: Arc<dyn HeightCurve>, height_scale: f64) -> Result<Self, TerrainError> {
        if !height_scale.is_finite() || height_scale <= 0.0 {
            return Err(TerrainError::invalid(
                "height_scale",
                format!("must be positive, got {height_scale}"),
            ));
        }
        Ok(Self {
            curve,
            height_scale,
        })
    }

    /// `curve(height) * height_scale`.
    pub fn world_height(&self, height: f64) -> f64 {
        self.curve.evaluate(height) * self.height_scale
    }

    /// The height scale.
    pub fn height_scale(&self) -> f64 {
        self.height_scale
    }
}

impl std::fmt::Debug for TerrainShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainShape")
            .field("height_scale", &self.height_scale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_keyframe_interpolates() {
        let curve = KeyframeCurve::new(vec![(0.0, 0.0), (0.5, 0.2), (1.0, 1.0)]).unwrap();
        assert!((curve.evaluate(0.25) - 0.1).abs() < EPSILON);
        assert!((curve.evaluate(0.75) - 0.6).abs() < EPSILON);
        assert!((curve.evaluate(0.5) - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_keyframe_clamps_outside_keys() {
        let curve = KeyframeCurve::new(vec![(0.2, 0.1), (0.8, 0.9)]).unwrap();
        assert_eq!(curve.evaluate(0.0), 0.1);
        assert_eq!(curve.evaluate(1.0), 0.9);
    }

    #[test]
    fn test_single_key_is_constant() {
        let curve = KeyframeCurve::new(vec![(0.5, 0.3)]).unwrap();
        assert_eq!(curve.evaluate(0.0), 0.3);
        assert_eq!(curve.evaluate(1.0), 0.3);
    }

    #[test]
    fn test_non_monotonic_keys_rejected() {
        assert!(KeyframeCurve::new(vec![(0.0, 1.0), (1.0, 0.0)]).is_err());
        assert!(KeyframeCurve::new(vec![(0.5, 0.0), (0.5, 1.0)]).is_err());
        assert!(KeyframeCurve::new(Vec::new()).is_err());
    }

    #[test]
    fn test_world_height_applies_curve_then_scale() {
        let curve = KeyframeCurve::new(vec![(0.0, 0.0), (1.0, 0.5)]).unwrap();
        let shape = TerrainShape::new(Arc::new(curve), 4.0).unwrap();
        assert!((shape.world_height(1.0) - 2.0).abs() < EPSILON);
        assert!((shape.world_height(0.5) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        assert!(TerrainShape::new(Arc::new(LinearCurve), 0.0).is_err());
        assert!(TerrainShape::new(Arc::new(LinearCurve), -1.0).is_err());
    }
}

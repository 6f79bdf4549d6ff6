//! Multi-octave fractal noise field producing normalized height grids.
//!
//! Composites several octaves of gradient noise. Each octave is shifted by a
//! seed-derived offset so that different seeds produce unrelated terrain,
//! and the sum is divided by the total amplitude rather than rescaled by the
//! grid's own min/max. That keeps every sample a pure function of its world
//! coordinate, which is what makes independently generated tiles meet
//! without seams.

use glam::DVec2;
use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::TerrainError;
use crate::grid::HeightGrid;

/// Octave offsets are drawn from `[-OCTAVE_OFFSET_RANGE, OCTAVE_OFFSET_RANGE)`.
pub const OCTAVE_OFFSET_RANGE: i32 = 100_000;

/// Configuration for the multi-octave noise field.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    /// World seed for deterministic generation.
    pub seed: u64,
    /// Horizontal size of the first octave's features, in world units.
    /// Values below [`NoiseParams::MIN_SCALE`] are clamped up to it.
    pub scale: f64,
    /// Number of octaves to composite. Zero yields an all-zero field.
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves, in `[0, 1]`.
    pub persistence: f64,
    /// Frequency multiplier between successive octaves, `>= 1`.
    pub lacunarity: f64,
}

impl NoiseParams {
    /// Smallest scale the field will divide by.
    pub const MIN_SCALE: f64 = 0.001;

    /// Check the parameters, rejecting values the math cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] for a non-positive or
    /// non-finite scale, a persistence outside `[0, 1]`, or a lacunarity
    /// below 1.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(TerrainError::invalid(
                "scale",
                format!("must be positive, got {}", self.scale),
            ));
        }
        if !(0.0..=1.0).contains(&self.persistence) {
            return Err(TerrainError::invalid(
                "persistence",
                format!("must be within [0, 1], got {}", self.persistence),
            ));
        }
        if !self.lacunarity.is_finite() || self.lacunarity < 1.0 {
            return Err(TerrainError::invalid(
                "lacunarity",
                format!("must be >= 1, got {}", self.lacunarity),
            ));
        }
        Ok(())
    }

    /// The scale actually used for sampling.
    pub fn effective_scale(&self) -> f64 {
        self.scale.max(Self::MIN_SCALE)
    }
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 50.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Per-octave sampling offsets derived from the world seed.
#[derive(Clone, Debug, PartialEq)]
pub struct OctaveOffsets(Vec<DVec2>);

impl OctaveOffsets {
    /// Draw `octaves` offset pairs from a ChaCha stream seeded with `seed`.
    ///
    /// Each pair is drawn X first, then Z, so the table is reproducible for
    /// a given `(seed, octaves)` and its prefix is stable as octaves grow.
    pub fn generate(seed: u64, octaves: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let offsets = (0..octaves)
            .map(|_| {
                let x = rng.random_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
                let z = rng.random_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE);
                DVec2::new(f64::from(x), f64::from(z))
            })
            .collect();
        Self(offsets)
    }

    /// The offsets, one per octave.
    pub fn as_slice(&self) -> &[DVec2] {
        &self.0
    }
}

/// Deterministic fractal noise field.
///
/// Holds no mutable state; sampling the same window twice yields
/// bit-identical grids.
pub struct NoiseField {
    noise: Perlin,
    params: NoiseParams,
    offsets: OctaveOffsets,
    total_amplitude: f64,
}

impl NoiseField {
    /// Create a noise field.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] if `params` fails
    /// [`NoiseParams::validate`].
    pub fn new(params: NoiseParams) -> Result<Self, TerrainError> {
        params.validate()?;
        let offsets = OctaveOffsets::generate(params.seed, params.octaves);

        let mut total_amplitude = 0.0;
        let mut amplitude = 1.0;
        for _ in 0..params.octaves {
            total_amplitude += amplitude;
            amplitude *= params.persistence;
        }

        Ok(Self {
            noise: Perlin::new(params.seed as u32),
            params,
            offsets,
            total_amplitude,
        })
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// The octave offset table in use.
    pub fn octave_offsets(&self) -> &OctaveOffsets {
        &self.offsets
    }

    /// Sum of all octave amplitudes; the divisor used for normalization.
    pub fn total_amplitude(&self) -> f64 {
        self.total_amplitude
    }

    /// Normalized height at the noise-space point `(u, v)`.
    ///
    /// `(u, v)` is a grid cell index plus the sampling offset, before
    /// division by the scale.
    pub fn height_at(&self, u: f64, v: f64) -> f64 {
        if self.total_amplitude == 0.0 {
            return 0.0;
        }
        let scale = self.params.effective_scale();
        let sample_x = u / scale;
        let sample_z = v / scale;

        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        for offset in self.offsets.as_slice() {
            let value = self.unit_noise(
                sample_x * frequency + offset.x,
                sample_z * frequency + offset.y,
            );
            total += value * amplitude;

            amplitude *= self.params.persistence;
            frequency *= self.params.lacunarity;
        }

        (total / self.total_amplitude).clamp(0.0, 1.0)
    }

    /// Sample a `width × depth` window whose cell `(x, z)` sits at noise
    /// coordinate `(x + offset.x, z + offset.y)`.
    pub fn sample(&self, width: usize, depth: usize, offset: DVec2) -> HeightGrid {
        let mut values = Vec::with_capacity(width * depth);
        for z in 0..depth {
            for x in 0..width {
                values.push(self.height_at(x as f64 + offset.x, z as f64 + offset.y));
            }
        }
        HeightGrid::from_values(width, depth, values)
    }

    /// Smooth 2D noise remapped from `[-1, 1]` to `[0, 1]`.
    fn unit_noise(&self, x: f64, z: f64) -> f64 {
        (self.noise.get([x, z]) * 0.5 + 0.5).clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("params", &self.params)
            .field("total_amplitude", &self.total_amplitude)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(params: NoiseParams) -> NoiseField {
        NoiseField::new(params).unwrap()
    }

    fn seeded(seed: u64) -> NoiseField {
        field(NoiseParams {
            seed,
            ..Default::default()
        })
    }

    #[test]
    fn test_determinism_bit_identical() {
        let a = seeded(42).sample(32, 24, DVec2::new(-48.0, 16.0));
        let b = seeded(42).sample(32, 24, DVec2::new(-48.0, 16.0));
        let bits_a: Vec<u64> = a.values().iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u64> = b.values().iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b, "same inputs must give bit-identical grids");
    }

    #[test]
    fn test_different_seeds_produce_different_heights() {
        let a = seeded(1).sample(16, 16, DVec2::ZERO);
        let b = seeded(999).sample(16, 16, DVec2::ZERO);
        assert_ne!(a, b, "different seeds should produce different terrain");
    }

    #[test]
    fn test_octave_offsets_reproducible() {
        let a = OctaveOffsets::generate(7, 6);
        let b = OctaveOffsets::generate(7, 6);
        assert_eq!(a, b);
        assert_eq!(a.as_slice().len(), 6);
        for offset in a.as_slice() {
            assert!(offset.x >= -100_000.0 && offset.x < 100_000.0);
            assert!(offset.y >= -100_000.0 && offset.y < 100_000.0);
        }
    }

    #[test]
    fn test_octave_offsets_prefix_stable() {
        let short = OctaveOffsets::generate(7, 2);
        let long = OctaveOffsets::generate(7, 5);
        assert_eq!(short.as_slice(), &long.as_slice()[..2]);
    }

    #[test]
    fn test_values_within_unit_range() {
        let cases = [
            (4, 0.5, 2.0),
            (1, 0.0, 1.0),
            (6, 1.0, 3.0),
            (8, 0.0, 2.0),
            (3, 1.0, 1.0),
        ];
        for (octaves, persistence, lacunarity) in cases {
            let f = field(NoiseParams {
                seed: 5,
                scale: 7.5,
                octaves,
                persistence,
                lacunarity,
            });
            let grid = f.sample(40, 40, DVec2::new(-1000.5, 333.25));
            for &h in grid.values() {
                assert!(
                    (0.0..=1.0).contains(&h),
                    "height {h} out of range for octaves={octaves} persistence={persistence}"
                );
            }
        }
    }

    #[test]
    fn test_zero_octaves_is_all_zero() {
        let f = field(NoiseParams {
            octaves: 0,
            ..Default::default()
        });
        let grid = f.sample(8, 8, DVec2::new(3.0, 4.0));
        assert!(grid.values().iter().all(|&h| h == 0.0));
        assert_eq!(f.total_amplitude(), 0.0);
    }

    #[test]
    fn test_total_amplitude_is_geometric_sum() {
        let f = field(NoiseParams {
            octaves: 4,
            persistence: 0.5,
            ..Default::default()
        });
        assert!((f.total_amplitude() - 1.875).abs() < 1e-12);
    }

    #[test]
    fn test_tiny_scale_is_clamped_not_rejected() {
        let f = field(NoiseParams {
            scale: 1e-12,
            ..Default::default()
        });
        assert_eq!(f.params().effective_scale(), NoiseParams::MIN_SCALE);
        let grid = f.sample(4, 4, DVec2::ZERO);
        assert!(grid.values().iter().all(|h| h.is_finite()));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let bad = [
            NoiseParams {
                scale: 0.0,
                ..Default::default()
            },
            NoiseParams {
                scale: -3.0,
                ..Default::default()
            },
            NoiseParams {
                persistence: 1.01,
                ..Default::default()
            },
            NoiseParams {
                lacunarity: 0.5,
                ..Default::default()
            },
        ];
        for params in bad {
            assert!(
                matches!(
                    NoiseField::new(params.clone()),
                    Err(TerrainError::InvalidParameter { .. })
                ),
                "{params:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_windows_agree_on_shared_coordinates() {
        let f = seeded(42);
        let left = f.sample(10, 10, DVec2::new(0.0, 0.0));
        let right = f.sample(10, 10, DVec2::new(9.0, 0.0));
        for z in 0..10 {
            assert_eq!(
                left.get(9, z).to_bits(),
                right.get(0, z).to_bits(),
                "overlapping windows must agree at row {z}"
            );
        }
    }

    #[test]
    fn test_smooth_gradient_no_discontinuities() {
        let f = seeded(42);
        let step = 0.05;
        for i in 0..2_000 {
            let u = i as f64 * step;
            let delta = (f.height_at(u + step, 0.0) - f.height_at(u, 0.0)).abs();
            assert!(delta < 0.1, "discontinuity at u={u}: delta={delta}");
        }
    }
}

//! Height classification: cosmetic terrain bands and the walkable band.

use crate::error::TerrainError;

/// Index of a band within a [`HeightClassifier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BandId(pub u16);

/// One terrain band: every height up to and including `threshold`.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainBand {
    /// Upper height threshold of the band.
    pub threshold: f64,
    /// Display label, e.g. "grass".
    pub label: String,
}

impl TerrainBand {
    /// Creates a band.
    pub fn new(threshold: f64, label: impl Into<String>) -> Self {
        Self {
            threshold,
            label: label.into(),
        }
    }
}

/// Maps normalized heights onto an ordered list of terrain bands.
#[derive(Clone, Debug)]
pub struct HeightClassifier {
    bands: Vec<TerrainBand>,
}

impl HeightClassifier {
    /// Creates a classifier from bands ordered by ascending threshold.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] if `bands` is empty, has
    /// more than `u16::MAX` entries, or is not sorted by threshold.
    pub fn new(bands: Vec<TerrainBand>) -> Result<Self, TerrainError> {
        if bands.is_empty() {
            return Err(TerrainError::invalid("bands", "at least one band is required"));
        }
        if bands.len() > usize::from(u16::MAX) {
            return Err(TerrainError::invalid(
                "bands",
                format!("too many bands: {}", bands.len()),
            ));
        }
        if bands.windows(2).any(|w| w[0].threshold > w[1].threshold) {
            return Err(TerrainError::invalid(
                "bands",
                "thresholds must be in ascending order",
            ));
        }
        Ok(Self { bands })
    }

    /// First band whose threshold is `>= height`, or the last band if none is.
    pub fn classify(&self, height: f64) -> BandId {
        let index = self
            .bands
            .iter()
            .position(|band| band.threshold >= height)
            .unwrap_or(self.bands.len() - 1);
        BandId(index as u16)
    }

    /// Returns the band for the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn band(&self, id: BandId) -> &TerrainBand {
        &self.bands[usize::from(id.0)]
    }

    /// All bands in ascending order.
    pub fn bands(&self) -> &[TerrainBand] {
        &self.bands
    }
}

/// Open height interval `(min, max)` inside which a cell is walkable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkableBand {
    min: f64,
    max: f64,
}

impl WalkableBand {
    /// Creates a walkable band.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] unless `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self, TerrainError> {
        if !(min < max) {
            return Err(TerrainError::invalid(
                "walkable",
                format!("band ({min}, {max}) is empty"),
            ));
        }
        Ok(Self { min, max })
    }

    /// Strict test: `min < height < max`.
    pub fn contains(&self, height: f64) -> bool {
        height > self.min && height < self.max
    }

    /// Lower (exclusive) bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper (exclusive) bound.
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> HeightClassifier {
        HeightClassifier::new(vec![
            TerrainBand::new(0.3, "water"),
            TerrainBand::new(0.4, "sand"),
            TerrainBand::new(0.6, "grass"),
        ])
        .unwrap()
    }

    #[test]
    fn test_first_band_at_or_above_height() {
        let c = classifier();
        assert_eq!(c.band(c.classify(0.0)).label, "water");
        assert_eq!(c.band(c.classify(0.3)).label, "water");
        assert_eq!(c.band(c.classify(0.31)).label, "sand");
        assert_eq!(c.band(c.classify(0.55)).label, "grass");
    }

    #[test]
    fn test_above_all_thresholds_uses_last_band() {
        let c = classifier();
        assert_eq!(c.classify(0.99), BandId(2));
    }

    #[test]
    fn test_empty_bands_rejected() {
        assert!(HeightClassifier::new(Vec::new()).is_err());
    }

    #[test]
    fn test_unsorted_bands_rejected() {
        let result = HeightClassifier::new(vec![
            TerrainBand::new(0.6, "grass"),
            TerrainBand::new(0.3, "water"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_walkable_is_open_interval() {
        let band = WalkableBand::new(0.4, 0.6).unwrap();
        assert!(!band.contains(0.4), "lower bound is exclusive");
        assert!(!band.contains(0.6), "upper bound is exclusive");
        assert!(band.contains(0.5));
        assert!(!band.contains(0.1));
    }

    #[test]
    fn test_empty_walkable_band_rejected() {
        assert!(WalkableBand::new(0.5, 0.5).is_err());
        assert!(WalkableBand::new(0.7, 0.2).is_err());
        assert!(WalkableBand::new(f64::NAN, 0.2).is_err());
    }
}

//! Threshold classifier from (elevation, moisture, temperature) to [`Biome`].

use super::Biome;

/// Classifies environmental samples into biomes.
///
/// Thresholds are strict comparisons evaluated in order; the first rule that
/// matches decides the biome.
#[derive(Clone, Copy, Debug, Default)]
pub struct BiomeClassifier;

impl BiomeClassifier {
    /// Elevation below which a tile is deep water.
    pub const DEEP_WATER_LEVEL: f64 = 0.01;
    /// Elevation below which a tile is water.
    pub const WATER_LEVEL: f64 = 0.3;
    /// Elevation below which a tile is beach sand.
    pub const BEACH_LEVEL: f64 = 0.35;
    /// Elevation above which a tile is a hill.
    pub const HILL_LEVEL: f64 = 0.6;
    /// Elevation above which a tile is a mountain peak.
    pub const PEAK_LEVEL: f64 = 0.8;

    /// Create a classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify one sample.
    pub fn classify(&self, elevation: f64, moisture: f64, temperature: f64) -> Biome {
        if elevation < Self::DEEP_WATER_LEVEL {
            return Biome::DeepWater;
        }
        if elevation < Self::WATER_LEVEL {
            return Biome::Water;
        }
        if elevation < Self::BEACH_LEVEL {
            return Biome::Sand;
        }

        if elevation > Self::PEAK_LEVEL {
            return if temperature < 0.3 {
                Biome::Snow
            } else {
                Biome::Mountain
            };
        }
        if elevation > Self::HILL_LEVEL {
            return if moisture > 0.6 {
                Biome::ForestHill
            } else {
                Biome::Hill
            };
        }

        if moisture > 0.7 {
            Biome::Swamp
        } else if moisture > 0.5 {
            Biome::Forest
        } else if moisture > 0.3 {
            Biome::Grass
        } else if temperature > 0.7 {
            Biome::Desert
        } else {
            Biome::Plains
        }
    }
}

/// Classify one sample with the default classifier.
#[inline]
pub fn classify(elevation: f64, moisture: f64, temperature: f64) -> Biome {
    BiomeClassifier.classify(elevation, moisture, temperature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_boundaries_are_strict() {
        // Exactly on a "<" threshold falls to the next rule.
        assert_eq!(classify(0.0099, 0.5, 0.5), Biome::DeepWater);
        assert_eq!(classify(0.01, 0.5, 0.5), Biome::Water);
        assert_eq!(classify(0.3, 0.5, 0.5), Biome::Sand);
        assert_eq!(classify(0.35, 0.4, 0.5), Biome::Grass);

        // Exactly on a ">" threshold does not trigger it.
        assert_eq!(classify(0.6, 0.4, 0.5), Biome::Grass);
        assert_eq!(classify(0.8, 0.4, 0.5), Biome::Hill);
        assert_eq!(classify(0.8001, 0.4, 0.5), Biome::Mountain);
    }

    #[test]
    fn test_peaks_split_on_temperature() {
        assert_eq!(classify(0.9, 0.5, 0.29), Biome::Snow);
        assert_eq!(classify(0.9, 0.5, 0.3), Biome::Mountain);
    }

    #[test]
    fn test_hills_split_on_moisture() {
        assert_eq!(classify(0.7, 0.61, 0.5), Biome::ForestHill);
        assert_eq!(classify(0.7, 0.6, 0.5), Biome::Hill);
    }

    #[test]
    fn test_lowland_moisture_ladder() {
        assert_eq!(classify(0.5, 0.71, 0.5), Biome::Swamp);
        assert_eq!(classify(0.5, 0.7, 0.5), Biome::Forest);
        assert_eq!(classify(0.5, 0.5, 0.5), Biome::Grass);
        assert_eq!(classify(0.5, 0.3, 0.71), Biome::Desert);
        assert_eq!(classify(0.5, 0.3, 0.7), Biome::Plains);
    }

    #[test]
    fn test_first_match_wins_over_later_rules() {
        // Very wet water is still water, not swamp.
        assert_eq!(classify(0.2, 1.0, 1.0), Biome::Water);
        // Hot, dry peak is still a mountain, not desert.
        assert_eq!(classify(0.95, 0.0, 1.0), Biome::Mountain);
    }

    #[test]
    fn test_grid_of_samples_yields_valid_ids() {
        let steps = 20;
        for e in 0..=steps {
            for m in 0..=steps {
                for t in 0..=steps {
                    let biome = classify(
                        e as f64 / steps as f64,
                        m as f64 / steps as f64,
                        t as f64 / steps as f64,
                    );
                    assert!(biome.tile_id() <= 11);
                }
            }
        }
    }
}

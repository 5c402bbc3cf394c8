//! Radial island mask: pushes elevation down toward the world edges.

use crate::seed::det_hypot;

/// Default shape factor. Higher values shrink the landmass.
pub const DEFAULT_SHAPE_FACTOR: f64 = 4.0;

/// Whether and how strongly elevation is shaped into an island.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IslandShape {
    /// Raw noise elevation, no falloff.
    Disabled,
    /// Subtract [`island_falloff`] with the given shape factor.
    Radial {
        /// Multiplier applied to the normalised centre distance before squaring.
        shape_factor: f64,
    },
}

impl Default for IslandShape {
    fn default() -> Self {
        Self::Radial {
            shape_factor: DEFAULT_SHAPE_FACTOR,
        }
    }
}

impl IslandShape {
    /// Falloff at `(x, y)`, or `0.0` when shaping is disabled.
    pub fn falloff(&self, x: f64, y: f64, world_width: u32, world_height: u32) -> f64 {
        match *self {
            Self::Disabled => 0.0,
            Self::Radial { shape_factor } => {
                island_falloff(x, y, world_width, world_height, shape_factor)
            }
        }
    }
}

/// Falloff in `[0, 1]` for `(x, y)` in a world of the given extent.
///
/// The Euclidean distance to the world centre is normalised by the
/// centre-to-corner distance, scaled by `shape_factor`, squared and capped at 1.
pub fn island_falloff(
    x: f64,
    y: f64,
    world_width: u32,
    world_height: u32,
    shape_factor: f64,
) -> f64 {
    let cx = f64::from(world_width) / 2.0;
    let cy = f64::from(world_height) / 2.0;

    let max_distance = det_hypot(cx, cy);
    if max_distance <= 0.0 {
        return 0.0;
    }

    let normalized = det_hypot(x - cx, y - cy) / max_distance * shape_factor.max(0.0);
    (normalized * normalized).min(1.0)
}

/// Apply the mask to a base elevation: `max(0, base - falloff)`.
#[inline]
pub fn apply_falloff(base_elevation: f64, falloff: f64) -> f64 {
    (base_elevation - falloff).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_center_has_no_falloff() {
        let f = island_falloff(50.0, 50.0, 100, 100, DEFAULT_SHAPE_FACTOR);
        assert!(f.abs() < EPSILON, "centre falloff should be 0, got {f}");
    }

    #[test]
    fn test_corner_saturates() {
        let f = island_falloff(0.0, 0.0, 100, 100, DEFAULT_SHAPE_FACTOR);
        assert!((f - 1.0).abs() < EPSILON, "corner falloff should be 1, got {f}");
    }

    #[test]
    fn test_shape_factor_one_reaches_one_at_corner() {
        let f = island_falloff(100.0, 100.0, 100, 100, 1.0);
        assert!((f - 1.0).abs() < EPSILON);
        let half = island_falloff(75.0, 75.0, 100, 100, 1.0);
        assert!((half - 0.25).abs() < EPSILON, "half distance squared is 0.25, got {half}");
    }

    #[test]
    fn test_higher_shape_factor_shrinks_land() {
        let soft = island_falloff(60.0, 50.0, 100, 100, 2.0);
        let hard = island_falloff(60.0, 50.0, 100, 100, 4.0);
        assert!(hard > soft, "larger shape factor must increase falloff");
    }

    #[test]
    fn test_range_over_world() {
        for x in 0..64 {
            for y in 0..32 {
                let f = island_falloff(x as f64, y as f64, 64, 32, DEFAULT_SHAPE_FACTOR);
                assert!((0.0..=1.0).contains(&f), "falloff {f} out of range");
            }
        }
    }

    #[test]
    fn test_disabled_shape_is_zero() {
        assert_eq!(IslandShape::Disabled.falloff(0.0, 0.0, 10, 10), 0.0);
    }

    #[test]
    fn test_apply_falloff_floors_at_zero() {
        assert_eq!(apply_falloff(0.2, 0.9), 0.0);
        assert!((apply_falloff(0.9, 0.2) - 0.7).abs() < EPSILON);
    }
}

//! World bounds, camera viewports and the region resolved from them.
//!
//! [`resolve`] turns a camera view plus buffer margin into the world-bounded
//! rectangle that is actually generated.

use serde::{Deserialize, Serialize};

use crate::TerrainError;

/// Smallest accepted zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest accepted zoom factor.
pub const MAX_ZOOM: f64 = 10.0;

/// Size of the world in tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Width in tiles, at least 1.
    pub width: u32,
    /// Height in tiles, at least 1.
    pub height: u32,
}

impl WorldConfig {
    /// Create a world of `width` x `height` tiles.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidWorldSize`] if either dimension is 0.
    pub fn new(width: u32, height: u32) -> Result<Self, TerrainError> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidWorldSize { width, height });
        }
        Ok(Self { width, height })
    }
}

/// Camera state for one request.
///
/// Zoom is carried and validated but does not change which tiles are
/// generated; it only matters to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Camera centre x, in tiles.
    pub x: u32,
    /// Camera centre y, in tiles.
    pub y: u32,
    /// Zoom factor in `[0.1, 10]`.
    pub zoom: f64,
    /// Visible width in tiles.
    pub width: u32,
    /// Visible height in tiles.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport at zoom 1.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            zoom: 1.0,
            width,
            height,
        }
    }

    /// Builder-style zoom override.
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Check the camera against `world`: zoom in range and centre inside the world.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ZoomOutOfRange`] or [`TerrainError::CameraOutOfBounds`].
    pub fn check_within(&self, world: &WorldConfig) -> Result<(), TerrainError> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom) {
            return Err(TerrainError::ZoomOutOfRange(self.zoom));
        }
        if self.x >= world.width || self.y >= world.height {
            return Err(TerrainError::CameraOutOfBounds {
                x: self.x,
                y: self.y,
                world_width: world.width,
                world_height: world.height,
            });
        }
        Ok(())
    }
}

/// A world-bounded rectangle of tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    /// Origin x.
    pub x: u32,
    /// Origin y.
    pub y: u32,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
}

impl Region {
    /// Create a region. No bounds checking is performed.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of tiles covered.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// `true` when the region has zero width or zero height.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the global tile `(x, y)` lies inside the region.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x
            && y >= self.y
            && u64::from(x) < u64::from(self.x) + u64::from(self.width)
            && u64::from(y) < u64::from(self.y) + u64::from(self.height)
    }

    /// Whether the region fits inside `world`.
    pub fn fits(&self, world: &WorldConfig) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(world.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(world.height)
    }
}

/// Resolve the region to generate for `camera` plus `buffer` tiles of margin.
///
/// Per axis: the origin is the camera centre minus half the visible extent
/// (integer division) minus the buffer, floored at 0, and the extent is the
/// visible extent plus twice the buffer. The origin is then capped at
/// `world - extent` and re-floored at 0, and only after that is the extent
/// capped at `world - origin`.
pub fn resolve(world: &WorldConfig, camera: &Viewport, buffer: u32) -> Region {
    let (x, width) = resolve_axis(camera.x, camera.width, buffer, world.width);
    let (y, height) = resolve_axis(camera.y, camera.height, buffer, world.height);
    Region {
        x,
        y,
        width,
        height,
    }
}

fn resolve_axis(center: u32, extent: u32, buffer: u32, world: u32) -> (u32, u32) {
    let center = i64::from(center);
    let buffer = i64::from(buffer);
    let world = i64::from(world);

    let mut origin = (center - i64::from(extent / 2) - buffer).max(0);
    let mut span = i64::from(extent) + 2 * buffer;

    origin = origin.min(world - span).max(0);
    span = span.min(world - origin).max(0);

    // Both values are within [0, world] here, and world came from a u32.
    (
        u32::try_from(origin).unwrap_or(u32::MAX),
        u32::try_from(span).unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(w: u32, h: u32) -> WorldConfig {
        WorldConfig::new(w, h).unwrap()
    }

    #[test]
    fn test_centered_camera() {
        let region = resolve(&world(200, 200), &Viewport::new(100, 100, 10, 10), 0);
        assert_eq!(region, Region::new(95, 95, 10, 10));
    }

    #[test]
    fn test_corner_camera_with_buffer() {
        // Origin floors at 0; extent 10 + 2*20 = 50 fits in a 100 wide world.
        let region = resolve(&world(100, 100), &Viewport::new(0, 0, 10, 10), 20);
        assert_eq!(region, Region::new(0, 0, 50, 50));
    }

    #[test]
    fn test_buffer_larger_than_world_covers_whole_axis() {
        let region = resolve(&world(100, 40), &Viewport::new(0, 0, 10, 10), 45);
        assert_eq!(region, Region::new(0, 0, 100, 40));
    }

    #[test]
    fn test_far_edge_shifts_origin_back() {
        // Candidate origin 95 - 5 - 5 = 85 with extent 20 would overrun a 100
        // wide world, so the origin is pulled back to 80 before extent is capped.
        let region = resolve(&world(100, 100), &Viewport::new(95, 50, 10, 10), 5);
        assert_eq!(region.x, 80);
        assert_eq!(region.width, 20);
        assert_eq!(region.y, 40);
        assert_eq!(region.height, 20);
    }

    #[test]
    fn test_odd_extent_uses_integer_half() {
        let region = resolve(&world(100, 100), &Viewport::new(50, 50, 7, 7), 0);
        assert_eq!(region, Region::new(47, 47, 7, 7));
    }

    #[test]
    fn test_zero_extent_is_empty() {
        let region = resolve(&world(10, 10), &Viewport::new(5, 5, 0, 0), 0);
        assert!(region.is_empty());
        assert_eq!(region.area(), 0);
    }

    #[test]
    fn test_resolved_regions_always_fit() {
        let w = world(37, 23);
        for cx in (0..60).step_by(7) {
            for cy in (0..40).step_by(5) {
                for buffer in [0, 1, 5, 30, 100] {
                    for extent in [0, 1, 4, 9, 50] {
                        let region = resolve(&w, &Viewport::new(cx, cy, extent, extent), buffer);
                        assert!(region.fits(&w), "{region:?} exceeds world for camera ({cx}, {cy})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_world_config_rejects_zero() {
        assert_eq!(
            WorldConfig::new(0, 5),
            Err(TerrainError::InvalidWorldSize { width: 0, height: 5 })
        );
        assert!(WorldConfig::new(1, 1).is_ok());
    }

    #[test]
    fn test_check_within() {
        let w = world(10, 10);
        assert!(Viewport::new(9, 9, 4, 4).check_within(&w).is_ok());
        assert!(matches!(
            Viewport::new(10, 0, 4, 4).check_within(&w),
            Err(TerrainError::CameraOutOfBounds { .. })
        ));
        assert_eq!(
            Viewport::new(1, 1, 4, 4).with_zoom(0.05).check_within(&w),
            Err(TerrainError::ZoomOutOfRange(0.05))
        );
        assert!(Viewport::new(1, 1, 4, 4).with_zoom(10.0).check_within(&w).is_ok());
    }

    #[test]
    fn test_region_contains() {
        let region = Region::new(95, 95, 10, 10);
        assert!(region.contains(95, 104));
        assert!(!region.contains(105, 100));
        assert!(!region.contains(94, 100));
    }
}

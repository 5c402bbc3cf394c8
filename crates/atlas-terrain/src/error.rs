//! Terrain error types.

/// Errors raised while configuring a generator or checking a camera.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    /// World width or height is zero.
    #[error("invalid world size {width}x{height}: both dimensions must be at least 1")]
    InvalidWorldSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// Camera centre lies outside the world.
    #[error("camera position ({x}, {y}) is outside the {world_width}x{world_height} world")]
    CameraOutOfBounds {
        /// Camera x.
        x: u32,
        /// Camera y.
        y: u32,
        /// World width.
        world_width: u32,
        /// World height.
        world_height: u32,
    },

    /// Zoom factor outside the accepted range.
    #[error("zoom {0} is outside [0.1, 10]")]
    ZoomOutOfRange(f64),
}

//! Single-request generation printed to stdout.

use atlas_config::Config;
use atlas_server::GenerateResponse;
use atlas_terrain::{
    TerrainError, TerrainGenerator, TileSource, Viewport, default_tileset, metadata,
};
use clap::Args;

/// Camera used by `--once`.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct CameraArgs {
    /// Camera centre x.
    #[arg(long, default_value_t = 100)]
    pub camera_x: u32,

    /// Camera centre y.
    #[arg(long, default_value_t = 100)]
    pub camera_y: u32,

    /// Visible width in tiles.
    #[arg(long, default_value_t = 20)]
    pub camera_width: u32,

    /// Visible height in tiles.
    #[arg(long, default_value_t = 20)]
    pub camera_height: u32,

    /// Zoom factor, 0.1 to 10.
    #[arg(long, default_value_t = 1.0)]
    pub zoom: f64,

    /// Extra tiles generated around the visible area.
    #[arg(long, default_value_t = 2)]
    pub buffer: u32,
}

impl CameraArgs {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.camera_x,
            self.camera_y,
            self.camera_width,
            self.camera_height,
        )
        .with_zoom(self.zoom)
    }
}

/// Errors from a one-shot generation.
#[derive(Debug, thiserror::Error)]
pub enum OneShotError {
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error("failed to encode terrain: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Generate the region around `camera` using the configured world and seed
/// and render the same body the HTTP endpoint returns.
pub fn render(config: &Config, camera: &CameraArgs) -> Result<String, OneShotError> {
    let world = config.map.world()?;
    let viewport = camera.viewport();
    viewport.check_within(&world)?;

    let generator = TerrainGenerator::new(world, config.map.seed, config.generation.settings());
    let grid = generator.generate_visible_area(&viewport, camera.buffer);
    tracing::info!(
        seed = generator.seed(),
        rows = grid.len(),
        "one-shot generation complete"
    );

    let body = GenerateResponse {
        metadata: metadata(&world, &viewport, camera.buffer, generator.seed()),
        terrain: &grid,
        tileset: default_tileset(),
    };
    Ok(serde_json::to_string_pretty(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraArgs {
        CameraArgs {
            camera_x: 100,
            camera_y: 100,
            camera_width: 10,
            camera_height: 10,
            zoom: 1.0,
            buffer: 0,
        }
    }

    #[test]
    fn test_render_uses_config_world_and_seed() {
        let mut config = Config::default();
        config.map.seed = Some(42);
        let json: serde_json::Value =
            serde_json::from_str(&render(&config, &camera()).unwrap()).unwrap();

        assert_eq!(json["metadata"]["seed"], 42);
        assert_eq!(json["metadata"]["visible_area"]["x"], 95);
        assert_eq!(json["terrain"].as_array().unwrap().len(), 10);
        assert_eq!(json["tileset"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn test_render_is_reproducible() {
        let mut config = Config::default();
        config.map.seed = Some(9);
        assert_eq!(
            render(&config, &camera()).unwrap(),
            render(&config, &camera()).unwrap()
        );
    }

    #[test]
    fn test_render_rejects_camera_outside_world() {
        let config = Config::default();
        let outside = CameraArgs {
            camera_x: 200,
            ..camera()
        };
        assert!(matches!(
            render(&config, &outside),
            Err(OneShotError::Terrain(TerrainError::CameraOutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_render_rejects_bad_zoom() {
        let config = Config::default();
        let zoomed = CameraArgs {
            zoom: 11.0,
            ..camera()
        };
        assert!(matches!(
            render(&config, &zoomed),
            Err(OneShotError::Terrain(TerrainError::ZoomOutOfRange(_)))
        ));
    }
}

//! Region generation: samples the three climate fields for every tile of a
//! region and classifies the result.
//!
//! Each tile depends only on its coordinates, the seed and fixed constants,
//! so rows can be computed on the rayon pool without changing the output.

use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::biome::BiomeClassifier;
use crate::island::{IslandShape, apply_falloff};
use crate::noise_field::NoiseField;
use crate::viewport::{Region, Viewport, WorldConfig, resolve};
use crate::{Grid, Tile};

/// Coordinate divisor for the elevation field.
pub const ELEVATION_SCALE: f64 = 100.0;
/// Coordinate divisor for the moisture field.
pub const MOISTURE_SCALE: f64 = 120.0;
/// Coordinate divisor for the temperature field.
pub const TEMPERATURE_SCALE: f64 = 150.0;
/// Seed offset for the moisture field.
pub const MOISTURE_SEED_OFFSET: i64 = 1000;
/// Seed offset for the temperature field.
pub const TEMPERATURE_SEED_OFFSET: i64 = 2000;

/// Range a seed is drawn from when the caller does not supply one.
pub const RANDOM_SEED_RANGE: std::ops::RangeInclusive<i64> = 1..=999_999;

/// Generation switches that do not affect the seed or the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationSettings {
    /// Island falloff applied to raw elevation.
    pub island: IslandShape,
    /// Compute rows on the rayon pool.
    pub parallel_rows: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            island: IslandShape::default(),
            parallel_rows: true,
        }
    }
}

/// Something that can produce the grid for a region.
///
/// Implemented by [`TerrainGenerator`] and by the caching decorator
/// [`CachedGenerator`](crate::CachedGenerator); both must return identical
/// grids for the same region.
pub trait TileSource: Send + Sync {
    /// The world this source generates for.
    fn world(&self) -> WorldConfig;

    /// The seed this source generates with.
    fn seed(&self) -> i64;

    /// Generate (or fetch) the grid for `region`.
    fn generate(&self, region: &Region) -> Arc<Grid>;

    /// Resolve `camera` plus `buffer` against the world, then generate.
    fn generate_visible_area(&self, camera: &Viewport, buffer: u32) -> Arc<Grid> {
        let region = resolve(&self.world(), camera, buffer);
        self.generate(&region)
    }
}

/// The three noise fields of one seed.
#[derive(Clone, Debug)]
struct ClimateFields {
    elevation: NoiseField,
    moisture: NoiseField,
    temperature: NoiseField,
}

impl ClimateFields {
    fn new(seed: i64) -> Self {
        Self {
            elevation: NoiseField::new(seed),
            moisture: NoiseField::new(seed.wrapping_add(MOISTURE_SEED_OFFSET)),
            temperature: NoiseField::new(seed.wrapping_add(TEMPERATURE_SEED_OFFSET)),
        }
    }

    fn tile(&self, world: &WorldConfig, island: &IslandShape, x: u32, y: u32) -> Tile {
        let fx = f64::from(x);
        let fy = f64::from(y);

        let base = self
            .elevation
            .sample(fx / ELEVATION_SCALE, fy / ELEVATION_SCALE);
        let falloff = island.falloff(fx, fy, world.width, world.height);
        let elevation = apply_falloff(base, falloff).clamp(0.0, 1.0);

        let moisture = self.moisture.sample(fx / MOISTURE_SCALE, fy / MOISTURE_SCALE);
        let temperature = self
            .temperature
            .sample(fx / TEMPERATURE_SCALE, fy / TEMPERATURE_SCALE);

        let biome = BiomeClassifier.classify(elevation, moisture, temperature);
        Tile {
            x,
            y,
            biome,
            tile_id: biome.tile_id(),
            elevation,
        }
    }

    fn grid(&self, world: &WorldConfig, region: &Region, settings: &GenerationSettings) -> Grid {
        if region.is_empty() {
            return Vec::new();
        }

        let row = |dy: u32| -> Vec<Tile> {
            let y = region.y + dy;
            (0..region.width)
                .map(|dx| self.tile(world, &settings.island, region.x + dx, y))
                .collect()
        };

        if settings.parallel_rows {
            (0..region.height).into_par_iter().map(row).collect()
        } else {
            (0..region.height).map(row).collect()
        }
    }
}

/// Generate the grid for `region` of `world` with `seed`.
///
/// Pure: the same arguments always yield the same grid, bit for bit. A region
/// with zero width or height yields an empty grid.
pub fn generate_region(
    world: &WorldConfig,
    seed: i64,
    region: &Region,
    settings: &GenerationSettings,
) -> Grid {
    ClimateFields::new(seed).grid(world, region, settings)
}

/// Terrain generator bound to one world and one seed for its lifetime.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    world: WorldConfig,
    seed: i64,
    settings: GenerationSettings,
    fields: ClimateFields,
}

impl TerrainGenerator {
    /// Create a generator. When `seed` is `None` one is drawn from
    /// [`RANDOM_SEED_RANGE`] and kept for the generator's lifetime.
    pub fn new(world: WorldConfig, seed: Option<i64>, settings: GenerationSettings) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random_range(RANDOM_SEED_RANGE));
        Self {
            world,
            seed,
            settings,
            fields: ClimateFields::new(seed),
        }
    }

    /// Generation settings in effect.
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Classify a single global tile.
    pub fn tile_at(&self, x: u32, y: u32) -> Tile {
        self.fields.tile(&self.world, &self.settings.island, x, y)
    }
}

impl TileSource for TerrainGenerator {
    fn world(&self) -> WorldConfig {
        self.world
    }

    fn seed(&self) -> i64 {
        self.seed
    }

    fn generate(&self, region: &Region) -> Arc<Grid> {
        let start = Instant::now();
        let grid = self.fields.grid(&self.world, region, &self.settings);
        tracing::debug!(
            seed = self.seed,
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            elapsed_us = start.elapsed().as_micros() as u64,
            "generated region"
        );
        Arc::new(grid)
    }
}

/// Camera description echoed in [`TerrainMetadata`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraInfo {
    /// Camera centre x.
    pub x: u32,
    /// Camera centre y.
    pub y: u32,
    /// Visible width.
    pub width: u32,
    /// Visible height.
    pub height: u32,
}

/// Report describing a generation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainMetadata {
    /// World extent.
    pub world_size: WorldConfig,
    /// Camera as requested.
    pub camera: CameraInfo,
    /// Region resolved for the camera and buffer.
    pub visible_area: Region,
    /// Buffer margin in tiles.
    pub buffer: u32,
    /// Seed used, echoed for reproducibility.
    pub seed: i64,
}

/// Build the metadata for a request, resolving the region independently of
/// whether generation ran.
pub fn metadata(world: &WorldConfig, camera: &Viewport, buffer: u32, seed: i64) -> TerrainMetadata {
    TerrainMetadata {
        world_size: *world,
        camera: CameraInfo {
            x: camera.x,
            y: camera.y,
            width: camera.width,
            height: camera.height,
        },
        visible_area: resolve(world, camera, buffer),
        buffer,
        seed,
    }
}

//! Procedural tile terrain: seeded noise fields, island shaping, biome
//! classification, viewport resolution and a time-limited region cache.

mod cache;
mod error;
mod generator;
mod island;
mod noise_field;
mod tile;
mod viewport;

pub mod biome;
pub mod seed;

pub use biome::{
    Biome, BiomeClassifier, BiomeDefinition, classify, default_tileset, tile_id_for_name,
};
pub use cache::{
    CacheKey, CacheStats, CachedGenerator, ChunkCache, DEFAULT_TTL, MAX_SWEEP_INTERVAL,
};
pub use error::TerrainError;
pub use generator::{
    CameraInfo, GenerationSettings, RANDOM_SEED_RANGE, TerrainGenerator, TerrainMetadata,
    TileSource, generate_region, metadata,
};
pub use island::{DEFAULT_SHAPE_FACTOR, IslandShape, apply_falloff, island_falloff};
pub use noise_field::{NoiseField, noise};
pub use tile::{Grid, Tile};
pub use viewport::{MAX_ZOOM, MIN_ZOOM, Region, Viewport, WorldConfig, resolve};

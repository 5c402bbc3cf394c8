//! Biome system: the authoritative biome enumeration, threshold classification
//! and the tileset metadata derived from it.
//!
//! Classification is a first-match decision list over elevation, moisture and
//! temperature, all normalised to `[0, 1]`.

mod classifier;
mod kind;
mod tileset;

pub use classifier::{BiomeClassifier, classify};
pub use kind::{Biome, BiomeParseError, tile_id_for_name};
pub use tileset::{BiomeDefinition, default_tileset};

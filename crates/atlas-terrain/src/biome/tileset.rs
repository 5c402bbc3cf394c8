//! Tileset metadata: one [`BiomeDefinition`] per biome, in tile id order.

use serde::{Deserialize, Serialize};

use super::Biome;

/// Descriptor of a tile type as exposed to renderers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeDefinition {
    /// Tile id, equal to [`Biome::tile_id`].
    pub id: u8,
    /// Snake-case biome tag.
    pub name: String,
    /// Whether units can move across the tile.
    pub walkable: bool,
    /// Asset path of the tile image.
    pub image: String,
}

impl From<Biome> for BiomeDefinition {
    fn from(biome: Biome) -> Self {
        Self {
            id: biome.tile_id(),
            name: biome.name().to_string(),
            walkable: biome.walkable(),
            image: format!("tiles/{}.png", biome.name()),
        }
    }
}

/// The twelve-entry tileset, indexed by tile id.
pub fn default_tileset() -> Vec<BiomeDefinition> {
    Biome::ALL.into_iter().map(BiomeDefinition::from).collect()
}

//! The closed set of biome tags and their stable tile ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the twelve terrain categories a tile can take.
///
/// The discriminant is the tile id used by renderers and the tileset; the
/// order of [`Biome::ALL`] is therefore part of the wire contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Biome {
    DeepWater = 0,
    Water = 1,
    Sand = 2,
    Grass = 3,
    Plains = 4,
    Forest = 5,
    ForestHill = 6,
    Hill = 7,
    Mountain = 8,
    Snow = 9,
    Desert = 10,
    Swamp = 11,
}

/// Error returned when a biome name is not one of the twelve known tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown biome: {0}")]
pub struct BiomeParseError(pub String);

impl Biome {
    /// Every biome, ordered by tile id.
    pub const ALL: [Biome; 12] = [
        Biome::DeepWater,
        Biome::Water,
        Biome::Sand,
        Biome::Grass,
        Biome::Plains,
        Biome::Forest,
        Biome::ForestHill,
        Biome::Hill,
        Biome::Mountain,
        Biome::Snow,
        Biome::Desert,
        Biome::Swamp,
    ];

    /// Numeric tile id in `0..=11`.
    #[inline]
    pub const fn tile_id(self) -> u8 {
        self as u8
    }

    /// Reverse of [`Biome::tile_id`].
    pub fn from_tile_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Snake-case tag, as serialised on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            Biome::DeepWater => "deep_water",
            Biome::Water => "water",
            Biome::Sand => "sand",
            Biome::Grass => "grass",
            Biome::Plains => "plains",
            Biome::Forest => "forest",
            Biome::ForestHill => "forest_hill",
            Biome::Hill => "hill",
            Biome::Mountain => "mountain",
            Biome::Snow => "snow",
            Biome::Desert => "desert",
            Biome::Swamp => "swamp",
        }
    }

    /// Look a biome up by its snake-case tag.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Whether a unit standing on this biome can move across it.
    pub const fn walkable(self) -> bool {
        !matches!(self, Biome::DeepWater | Biome::Water | Biome::Mountain)
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Biome {
    type Err = BiomeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| BiomeParseError(s.to_string()))
    }
}

/// Tile id for a tag, falling back to 0 for anything unrecognised.
pub fn tile_id_for_name(name: &str) -> u8 {
    Biome::from_name(name).map_or(0, Biome::tile_id)
}

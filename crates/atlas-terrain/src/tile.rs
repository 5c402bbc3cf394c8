//! Generated tile records.

use serde::{Deserialize, Serialize};

use crate::Biome;

/// One generated tile. Serialises as `{x, y, type, tile_id, elevation}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Global x coordinate.
    pub x: u32,
    /// Global y coordinate.
    pub y: u32,
    /// Biome tag.
    #[serde(rename = "type")]
    pub biome: Biome,
    /// Tile id in `0..=11`, equal to `biome.tile_id()`.
    pub tile_id: u8,
    /// Masked elevation in `[0, 1]`.
    pub elevation: f64,
}

/// Row-major tiles: `grid[row][column]`.
pub type Grid = Vec<Vec<Tile>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_wire_shape() {
        let tile = Tile {
            x: 3,
            y: 4,
            biome: Biome::Forest,
            tile_id: Biome::Forest.tile_id(),
            elevation: 0.5,
        };
        let value = serde_json::to_value(tile).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"x": 3, "y": 4, "type": "forest", "tile_id": 5, "elevation": 0.5})
        );
    }
}

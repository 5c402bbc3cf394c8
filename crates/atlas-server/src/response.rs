//! JSON bodies returned by the terrain endpoints.

use atlas_terrain::{BiomeDefinition, Grid, TerrainMetadata};
use serde::Serialize;

/// Body of `GET /terrain/info`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

impl Default for InfoResponse {
    fn default() -> Self {
        Self {
            name: "Procedural Terrain API",
            version: "1.0.0",
            description: "API for generating procedural terrain based on camera position and zoom level",
        }
    }
}

/// Body of a successful generation.
#[derive(Debug, Serialize)]
pub struct GenerateResponse<'a> {
    pub metadata: TerrainMetadata,
    pub terrain: &'a Grid,
    pub tileset: Vec<BiomeDefinition>,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

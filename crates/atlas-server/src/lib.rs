//! HTTP API for the Atlas terrain service.
//!
//! Exposes terrain generation over JSON: a health probe, a service
//! description, and the generation endpoint that resolves a camera into a
//! region, generates it (through the shared region cache when enabled) and
//! returns the tiles together with request metadata and the tileset.

mod request;
mod response;
mod server;

pub use request::{
    GenerateRequest, MAX_BUFFER, MAX_WORLD_DIMENSION, ValidatedRequest, ValidationError, validate,
};
pub use response::{GenerateResponse, HealthResponse, InfoResponse};
pub use server::{MAX_BODY_BYTES, ServerError, TerrainServer};

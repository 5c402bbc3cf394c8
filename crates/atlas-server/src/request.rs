//! Generation request body and its validation.

use std::collections::BTreeMap;

use atlas_terrain::{MAX_ZOOM, MIN_ZOOM, Region, Viewport, WorldConfig, resolve};
use serde::Deserialize;

/// Largest world dimension a request may ask for.
pub const MAX_WORLD_DIMENSION: i64 = 100_000;
/// Largest buffer margin a request may ask for.
pub const MAX_BUFFER: i64 = 100;

/// Body of `POST /api/terrain/generate`. Every field is optional here so that
/// missing fields are reported by [`validate`] rather than by the JSON parser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub world_width: Option<i64>,
    pub world_height: Option<i64>,
    pub camera_x: Option<i64>,
    pub camera_y: Option<i64>,
    pub camera_z: Option<f64>,
    pub camera_width: Option<i64>,
    pub camera_height: Option<i64>,
    pub buffer: Option<i64>,
    pub seed: Option<i64>,
}

/// A request that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest {
    pub world: WorldConfig,
    pub camera: Viewport,
    pub buffer: u32,
    pub seed: Option<i64>,
    pub region: Region,
}

/// Reasons a request is rejected before generation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("malformed request body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid request fields")]
    Fields(BTreeMap<&'static str, Vec<String>>),

    #[error("Camera position out of world bounds")]
    CameraOutOfBounds,

    #[error("requested region covers {area} tiles, the limit is {max}")]
    RegionTooLarge { area: u64, max: u64 },
}

impl ValidationError {
    /// JSON body sent back with the 400 response.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Fields(fields) => serde_json::json!({ "error": fields }),
            other => serde_json::json!({ "error": other.to_string() }),
        }
    }
}

#[derive(Default)]
struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: String) {
        self.0.entry(field).or_default().push(message);
    }

    fn int_between(&mut self, field: &'static str, value: Option<i64>, min: i64, max: i64) -> i64 {
        match value {
            None => {
                self.push(field, format!("The {field} field is required."));
                0
            }
            Some(v) if v < min || v > max => {
                self.push(field, format!("The {field} must be between {min} and {max}."));
                0
            }
            Some(v) => v,
        }
    }

    fn int_at_least(&mut self, field: &'static str, value: Option<i64>, min: i64) -> i64 {
        match value {
            Some(v) if v < min => {
                self.push(field, format!("The {field} must be at least {min}."));
                0
            }
            _ => self.int_between(field, value, min, i64::from(u32::MAX)),
        }
    }
}

/// Validate a request, resolve its region and enforce the area cap.
///
/// # Errors
///
/// Returns [`ValidationError::Fields`] listing every failing field, then
/// [`ValidationError::CameraOutOfBounds`] when the camera lies outside the
/// world, then [`ValidationError::RegionTooLarge`] when the resolved region
/// exceeds `max_region_area` tiles.
pub fn validate(
    request: &GenerateRequest,
    max_region_area: u64,
) -> Result<ValidatedRequest, ValidationError> {
    let mut errors = FieldErrors::default();

    let world_width =
        errors.int_between("world_width", request.world_width, 1, MAX_WORLD_DIMENSION);
    let world_height =
        errors.int_between("world_height", request.world_height, 1, MAX_WORLD_DIMENSION);
    let camera_x = errors.int_at_least("camera_x", request.camera_x, 0);
    let camera_y = errors.int_at_least("camera_y", request.camera_y, 0);
    let camera_width = errors.int_at_least("camera_width", request.camera_width, 1);
    let camera_height = errors.int_at_least("camera_height", request.camera_height, 1);
    let buffer = errors.int_between("buffer", request.buffer, 0, MAX_BUFFER);

    let zoom = match request.camera_z {
        None => {
            errors.push("camera_z", "The camera_z field is required.".to_string());
            1.0
        }
        Some(z) if !(MIN_ZOOM..=MAX_ZOOM).contains(&z) => {
            errors.push(
                "camera_z",
                format!("The camera_z must be between {MIN_ZOOM} and {MAX_ZOOM}."),
            );
            1.0
        }
        Some(z) => z,
    };

    if !errors.0.is_empty() {
        return Err(ValidationError::Fields(errors.0));
    }

    if camera_x >= world_width || camera_y >= world_height {
        return Err(ValidationError::CameraOutOfBounds);
    }

    // Every value below was range-checked against u32 bounds above.
    let as_u32 = |v: i64| u32::try_from(v).unwrap_or(u32::MAX);

    let world = WorldConfig {
        width: as_u32(world_width),
        height: as_u32(world_height),
    };
    let camera = Viewport::new(
        as_u32(camera_x),
        as_u32(camera_y),
        as_u32(camera_width),
        as_u32(camera_height),
    )
    .with_zoom(zoom);
    let buffer = as_u32(buffer);

    let region = resolve(&world, &camera, buffer);
    if region.area() > max_region_area {
        return Err(ValidationError::RegionTooLarge {
            area: region.area(),
            max: max_region_area,
        });
    }

    Ok(ValidatedRequest {
        world,
        camera,
        buffer,
        seed: request.seed,
        region,
    })
}

//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use atlas_terrain::{IslandShape, TerrainError, WorldConfig};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Default world for one-shot generation.
    pub map: MapConfig,
    /// Terrain generation switches.
    pub generation: GenerationConfig,
    /// Region cache settings.
    pub cache: CacheConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Default world size and seed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// World width in tiles.
    pub width: u32,
    /// World height in tiles.
    pub height: u32,
    /// Fixed seed. `None` draws a random seed per generator.
    pub seed: Option<i64>,
}

/// Terrain generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Shape elevation into a central island.
    pub island_shaping: bool,
    /// Island shape factor (higher = smaller landmass).
    pub shape_factor: f64,
    /// Generate rows of a region in parallel.
    pub parallel_rows: bool,
}

/// Region cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Memoise generated regions.
    pub enabled: bool,
    /// Entry lifetime in minutes.
    pub ttl_minutes: u64,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub address: String,
    /// Bind port (0 lets the OS choose).
    pub port: u16,
    /// Request worker threads (0 = one per CPU).
    pub worker_threads: usize,
    /// Largest region, in tiles, a single request may generate.
    pub max_region_area: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            seed: None,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            island_shaping: true,
            shape_factor: atlas_terrain::DEFAULT_SHAPE_FACTOR,
            parallel_rows: true,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_minutes: 60,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            worker_threads: 0,
            max_region_area: 1_000_000,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Conversions into terrain types ---

impl MapConfig {
    /// The configured world.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidWorldSize`] when a dimension is 0.
    pub fn world(&self) -> Result<WorldConfig, TerrainError> {
        WorldConfig::new(self.width, self.height)
    }
}

impl GenerationConfig {
    /// Settings understood by the terrain generator.
    pub fn settings(&self) -> atlas_terrain::GenerationSettings {
        let island = if self.island_shaping {
            IslandShape::Radial {
                shape_factor: self.shape_factor,
            }
        } else {
            IslandShape::Disabled
        };
        atlas_terrain::GenerationSettings {
            island,
            parallel_rows: self.parallel_rows,
        }
    }
}

impl CacheConfig {
    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }
}

// --- Persistence ---

/// File name of the persisted configuration.
pub const CONFIG_FILE_NAME: &str = "config.ron";

impl Config {
    /// Path of the config file inside `config_dir`.
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE_NAME)
    }

    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// when the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(config_dir);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config to `config_dir` as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path_in(config_dir);
        let write_error = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(config_dir).map_err(write_error)?;
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;
        std::fs::write(&path, serialized).map_err(write_error)
    }

    /// Reject settings the service cannot run with. Called after CLI
    /// overrides are applied, since either source can introduce them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Map`] for a zero-sized world and
    /// [`ConfigError::Setting`] for an unusable shape factor, TTL or area cap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.map.world()?;

        let shape_factor = self.generation.shape_factor;
        if !shape_factor.is_finite() || shape_factor < 0.0 {
            return Err(ConfigError::Setting {
                field: "generation.shape_factor",
                reason: "must be a finite, non-negative number",
            });
        }
        if self.cache.enabled && self.cache.ttl_minutes == 0 {
            return Err(ConfigError::Setting {
                field: "cache.ttl_minutes",
                reason: "must be at least 1 while the cache is enabled",
            });
        }
        if self.server.max_region_area == 0 {
            return Err(ConfigError::Setting {
                field: "server.max_region_area",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

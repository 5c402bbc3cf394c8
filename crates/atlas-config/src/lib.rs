//! Configuration for the Atlas terrain service.
//!
//! Settings persist to disk as `config.ron`, accept CLI overrides via clap,
//! and tolerate missing or unknown fields so older files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, CacheConfig, Config, DebugConfig, GenerationConfig, MapConfig, ServerConfig,
};
pub use error::ConfigError;

//! Command-line argument parsing for the Atlas terrain service.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Configuration overrides accepted on the command line.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Server bind address.
    #[arg(long)]
    pub address: Option<String>,

    /// Server port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Fixed world seed.
    #[arg(long, allow_hyphen_values = true)]
    pub seed: Option<i64>,

    /// World width in tiles.
    #[arg(long)]
    pub world_width: Option<u32>,

    /// World height in tiles.
    #[arg(long)]
    pub world_height: Option<u32>,

    /// Island shape factor.
    #[arg(long)]
    pub shape_factor: Option<f64>,

    /// Disable island shaping.
    #[arg(long)]
    pub no_island: bool,

    /// Disable the region cache.
    #[arg(long)]
    pub no_cache: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref address) = args.address {
            self.server.address = address.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(seed) = args.seed {
            self.map.seed = Some(seed);
        }
        if let Some(w) = args.world_width {
            self.map.width = w;
        }
        if let Some(h) = args.world_height {
            self.map.height = h;
        }
        if let Some(factor) = args.shape_factor {
            self.generation.shape_factor = factor;
        }
        if args.no_island {
            self.generation.island_shaping = false;
        }
        if args.no_cache {
            self.cache.enabled = false;
        }
    }
}

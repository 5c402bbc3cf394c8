//! The binary entry point for the Atlas terrain service.

mod oneshot;
mod platform;

use atlas_config::{CliArgs, Config, ConfigError};
use atlas_server::{ServerError, TerrainServer};
use clap::Parser;

use crate::oneshot::{CameraArgs, OneShotError};
use crate::platform::{PlatformDirs, PlatformError};

/// Procedural tile terrain over HTTP.
#[derive(Parser, Debug)]
#[command(name = "atlas", version, about)]
struct Args {
    #[command(flatten)]
    cli: CliArgs,

    /// Generate one region, print it as JSON and exit instead of serving.
    #[arg(long)]
    once: bool,

    #[command(flatten)]
    camera: CameraArgs,
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error(transparent)]
    OneShot(#[from] OneShotError),
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("atlas: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let dirs = match &args.cli.config {
        Some(root) => PlatformDirs::resolve_with_root(root),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(&args.cli);
    config.validate()?;
    atlas_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    tracing::debug!(config_dir = %dirs.config_dir.display(), "configuration loaded");

    if args.once {
        println!("{}", oneshot::render(&config, &args.camera)?);
        return Ok(());
    }

    let mut server = TerrainServer::from_config(&config);
    server.start()?;
    server.join();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_once_mode() {
        let args = Args::try_parse_from([
            "atlas",
            "--once",
            "--seed",
            "-5",
            "--camera-x",
            "10",
            "--zoom",
            "2.5",
            "--no-cache",
        ])
        .unwrap();
        assert!(args.once);
        assert_eq!(args.cli.seed, Some(-5));
        assert!(args.cli.no_cache);
        assert_eq!(args.camera.camera_x, 10);
        assert_eq!(args.camera.camera_y, 100);
        assert_eq!(args.camera.zoom, 2.5);
    }

    #[test]
    fn test_args_default_to_serving() {
        let args = Args::try_parse_from(["atlas", "--port", "0"]).unwrap();
        assert!(!args.once);
        assert_eq!(args.cli.port, Some(0));
    }
}

//! Configuration error types.

use std::path::PathBuf;

use atlas_terrain::TerrainError;

/// Errors raised while loading, saving or checking `config.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),

    /// The configured world cannot be generated.
    #[error("invalid map settings: {0}")]
    Map(#[from] TerrainError),

    /// A numeric setting is outside its usable range.
    #[error("invalid setting {field}: {reason}")]
    Setting {
        field: &'static str,
        reason: &'static str,
    },
}

//! CLI error type.

use std::fmt;

use lbs::config::ConfigError;
use lbs::coord::CoordError;
use lbs::provider::ProviderError;
use lbs::tile::TileError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Loading or saving the config file failed, or a credential is missing.
    Config(ConfigError),

    /// A provider request failed.
    Provider(ProviderError),

    /// A quad key could not be decoded.
    Tile(TileError),

    /// A coordinate argument could not be parsed.
    Coord(CoordError),

    /// A command argument was rejected.
    InvalidArgument(String),

    /// Failed to write output.
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Provider(e) => write!(f, "Request failed: {}", e),
            CliError::Tile(e) => write!(f, "Tile error: {}", e),
            CliError::Coord(e) => write!(f, "Coordinate error: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Tile(e) => Some(e),
            CliError::Coord(e) => Some(e),
            CliError::InvalidArgument(_) => None,
            CliError::Output(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<TileError> for CliError {
    fn from(e: TileError) -> Self {
        CliError::Tile(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

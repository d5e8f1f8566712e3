//! Error types for geotiles.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoTilesError>;

#[derive(Debug, Error)]
pub enum GeoTilesError {
    /// Region has zero extent on an axis or is narrower than one pixel.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// Tile payload does not match the owning layer's capabilities.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Map provider error: {0}")]
    Provider(String),

    #[error("Feature extraction failed: {0}")]
    Extraction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid snapshot format")]
    InvalidFormat,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for GeoTilesError {
    fn from(e: serde_json::Error) -> Self {
        GeoTilesError::Serialization(e.to_string())
    }
}

#[cfg(feature = "snapshot")]
impl From<bincode::Error> for GeoTilesError {
    fn from(e: bincode::Error) -> Self {
        GeoTilesError::Serialization(e.to_string())
    }
}

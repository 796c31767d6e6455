//! Error types for the 3D editing layer.
//!
//! Interactive operations never fail: a missing node, a disabled controller
//! or an unavailable 3D context turns them into no-ops. Errors only surface
//! from loading and validating settings.

use std::path::PathBuf;

use thiserror::Error;

/// 3D editing layer errors
#[derive(Debug, Error)]
pub enum Editor3dError {
    /// Settings file could not be read or written
    #[error("Failed to access settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for the expected layout
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be encoded
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Settings parsed but are out of range
    #[error("Invalid settings: {0}")]
    InvalidConfig(String),
}

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, Editor3dError>;

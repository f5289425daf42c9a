//! Error types for the asset core.

use std::path::PathBuf;
use thiserror::Error;

use crate::asset::AssetKind;

/// Errors raised by the registry, readers, transforms and the delivery endpoint.
#[derive(Debug, Error)]
pub enum AssetError {
    /// A required parameter was missing, blank or otherwise unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Text did not name a supported asset kind.
    #[error("unknown asset kind `{0}`")]
    UnknownKind(String),

    #[error("IO error when reading `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} compression failed: {message}")]
    Compress { kind: AssetKind, message: String },

    #[error("cannot resolve `{relative}` against `{base}`: {message}")]
    Resolve {
        base: String,
        relative: String,
        message: String,
    },

    /// The content cache holds no entry for the requested key.
    #[error("cache does not contain key `{0}`")]
    MissingKey(String),
}

impl AssetError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

pub type Result<T, E = AssetError> = std::result::Result<T, E>;

//! Error types for key material operations
//!
//! Key loading is the only fallible part of this crate: once a key is in a
//! snapshot, lookup and verification report plain negative results.

use std::path::PathBuf;
use thiserror::Error;

/// Key material error types.
#[derive(Debug, Error)]
pub enum KeyError {
    /// A key file or directory could not be read
    #[error("Unable to read key material from {}: {source}", .path.display())]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The input is not a PEM document this crate understands
    #[error("Unsupported PEM document: {0}")]
    Pem(String),

    /// The key encoding was recognised but the key itself is unusable
    #[error("Invalid public key: {0}")]
    InvalidKey(String),

    /// A file under a key directory has no usable alias
    #[error("Cannot derive a key alias from {}", .0.display())]
    InvalidAlias(PathBuf),
}

/// Result type for key material operations.
pub type KeyResult<T> = Result<T, KeyError>;

impl KeyError {
    /// Get error code for diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            KeyError::Io { .. } => "KEY_IO",
            KeyError::Pem(_) => "KEY_PEM",
            KeyError::InvalidKey(_) => "KEY_INVALID",
            KeyError::InvalidAlias(_) => "KEY_ALIAS",
        }
    }
}

//! Error types for catalog building, exporting and packaging.

use std::io;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LocalizeError>;

/// Everything that can go wrong between raw records and a finished bundle.
///
/// Variants fall into three classes:
/// - configuration errors (bad registry data), fatal at startup
/// - validation errors (bad input), recoverable and reported to the caller
/// - packaging errors (I/O while writing, zipping or deleting), server-side
#[derive(Debug, thiserror::Error)]
pub enum LocalizeError {
    // ==================== Configuration ====================
    #[error("Invalid language registry data: {0}")]
    Configuration(String),

    // ==================== Validation ====================
    #[error("Invalid record '{code}': {reason}")]
    InvalidRecord { code: String, reason: String },

    #[error("Duplicate catalog entry code: '{0}'")]
    DuplicateEntry(String),

    #[error("Unknown language code: '{0}'")]
    UnknownLanguage(String),

    #[error("Unknown namespace: '{0}'")]
    UnknownNamespace(String),

    #[error("Unsupported platform: '{0}'")]
    UnsupportedPlatform(String),

    #[error("Entry '{code}' expects a {expected} value")]
    KindMismatch { code: String, expected: &'static str },

    #[error("Invalid build id '{0}': must be a plain file name")]
    InvalidBuildId(String),

    // ==================== Packaging ====================
    #[error("Failed to {action} {}: {source}", path.display())]
    Packaging {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to encode export: {0}")]
    Encode(String),

    #[error("Failed to prepare staging directory: {0}")]
    Staging(#[source] io::Error),

    #[error("Build task failed: {0}")]
    Task(String),
}

impl LocalizeError {
    /// Build a `Packaging` error for an I/O failure on `path`.
    pub fn packaging(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        LocalizeError::Packaging {
            action,
            path: path.into(),
            source,
        }
    }

    /// Unknown language, platform or namespace: the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LocalizeError::UnknownLanguage(_)
                | LocalizeError::UnknownNamespace(_)
                | LocalizeError::UnsupportedPlatform(_)
        )
    }

    /// The caller supplied bad input; retrying the same request cannot succeed.
    pub fn is_client_error(&self) -> bool {
        self.is_not_found()
            || matches!(
                self,
                LocalizeError::InvalidRecord { .. }
                    | LocalizeError::DuplicateEntry(_)
                    | LocalizeError::KindMismatch { .. }
                    | LocalizeError::InvalidBuildId(_)
            )
    }

    /// Failure on our side (registry data or filesystem).
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }
}

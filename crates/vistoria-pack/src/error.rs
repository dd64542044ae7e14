//! Pack-specific error types.
//!
//! Structured errors for manifest loading, table configuration and sizing
//! rule execution. File errors carry the offending path.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during pack operations.
#[derive(Debug, Error)]
pub enum PackError {
    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing failed.
    #[error("failed to parse JSON at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A required file was not found.
    #[error("required file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The file extension maps to no supported format.
    #[error("unsupported file format at {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },

    /// A pack manifest parsed but is not usable.
    #[error("invalid pack manifest: {detail}")]
    InvalidManifest { detail: String },

    /// Sizing rules produced output that is not an object.
    #[error("malformed sizing output from pack {pack_id}: {detail}")]
    MalformedOutput { pack_id: String, detail: String },

    /// A table calculator failed.
    #[error("calculator {calculator} failed: {detail}")]
    Calculator { calculator: String, detail: String },

    /// Sizing rules failed for a pack-specific reason.
    #[error("sizing rules of pack {pack_id} failed: {detail}")]
    Rules { pack_id: String, detail: String },

    /// No pack registered under the requested id.
    #[error("unknown pack: {id:?}")]
    UnknownPack { id: String },

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic serde_json error (not file-specific).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic serde_yaml error (not file-specific).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for pack operations.
pub type PackResult<T> = Result<T, PackError>;

//! # Error Types
//!
//! Defines the error types used by the core crate. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! Normalization is total and has no error path: coercion replaces
//! rejection. Errors here only arise from *strict* constructors
//! (`FromStr` on enums, strict timestamp parsing) and from record
//! serialization performed by callers.

use thiserror::Error;

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum VistoriaError {
    /// A strict parser rejected its input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = VistoriaError::Validation("unknown severity".to_string());
        assert_eq!(format!("{err}"), "validation error: unknown severity");
    }

    #[test]
    fn serde_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json");
        let err = VistoriaError::from(bad.unwrap_err());
        assert!(format!("{err}").starts_with("serialization error"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = VistoriaError::from(io);
        assert!(format!("{err}").contains("gone"));
    }
}

//! Error types for objectfilter.
//!
//! Filtering itself never fails: malformed filter input degrades to a
//! passthrough. These errors come from the layers around it, namely
//! configuration loading, preset lookup and reading input documents.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for objectfilter operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// A filter type other than `include` or `exclude` was given.
    #[error("unknown filter type '{value}' (expected 'include' or 'exclude')")]
    UnknownFilterType {
        /// The rejected value.
        value: String,
    },

    /// The requested preset is not defined.
    #[error("unknown preset '{name}'")]
    UnknownPreset {
        /// Name of the preset that was requested.
        name: String,
    },

    // === I/O Errors ===
    /// Failed to read an input document.
    #[error("failed to read input {path}: {source}")]
    ReadInput {
        /// Path of the input file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for objectfilter operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create an unknown preset error.
    #[must_use]
    pub fn unknown_preset(name: impl Into<String>) -> Self {
        Self::UnknownPreset { name: name.into() }
    }

    /// Check if this error comes from configuration loading or validation.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } | Self::UnknownFilterType { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation_display() {
        let err = Error::config_validation("max_depth must be greater than 0");
        assert_eq!(
            err.to_string(),
            "invalid configuration: max_depth must be greater than 0"
        );
        assert!(err.is_config_error());
    }

    #[test]
    fn test_unknown_filter_type_display() {
        let err = Error::UnknownFilterType {
            value: "sideways".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sideways"));
        assert!(msg.contains("include"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_unknown_preset_display() {
        let err = Error::unknown_preset("missing");
        assert_eq!(err.to_string(), "unknown preset 'missing'");
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_read_input_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::ReadInput {
            path: PathBuf::from("/tmp/payload.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/payload.json"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_figment_error() {
        let err: Error = figment::Error::from("bad value".to_string()).into();
        assert!(matches!(err, Error::ConfigLoad(_)));
        assert!(err.to_string().contains("bad value"));
    }
}

//! Result and error types for the recorder.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for recorder operations
pub type RecorderResult<T> = Result<T, RecorderError>;

/// Errors that can occur while recording a test run
///
/// None of these ever change the outcome of the test being recorded. The
/// event bus logs them and moves on.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Output directory for a test could not be created
    #[error("Failed to create recording directory {}: {source}", path.display())]
    DirectoryCreate {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Screenshot capture failed
    #[error("Screenshot capture to {} failed: {message}", path.display())]
    Capture {
        /// Destination the driver was asked to write
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Template substitution hit a placeholder with no value
    #[error("Unresolved template placeholder: {{{{{placeholder}}}}}")]
    Render {
        /// Placeholder name without braces
        placeholder: String,
    },

    /// Invalid recorder configuration
    #[error("Invalid recorder configuration: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl RecorderError {
    /// Create a capture error for a destination path
    #[must_use]
    pub fn capture(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Capture {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error only cost a single frame
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        matches!(self, Self::Capture { .. })
    }
}

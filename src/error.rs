//! Custom error types for tagflow.
//!
//! This module provides structured error types using `thiserror` for better
//! error handling and more informative error messages.

use std::io;
use thiserror::Error;

/// Main error type for tagflow operations.
#[derive(Error, Debug)]
pub enum TagFlowError {
    /// Error reading the tag file.
    #[error("failed to read tag file '{path}': {reason}")]
    TagFile { path: String, reason: String },

    /// Configuration validation error.
    #[error("configuration error: {0}")]
    ConfigValidation(String),

    /// Error reading or parsing configuration file.
    #[error("failed to load config from '{path}': {reason}")]
    ConfigLoad { path: String, reason: String },

    /// Error writing configuration file.
    #[error("failed to save config to '{path}': {reason}")]
    ConfigSave { path: String, reason: String },

    /// Error parsing duration string.
    #[error("invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },

    /// The specified key is invalid or unsupported.
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// Error parsing a theme color value.
    #[error("invalid color '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    /// Error reading or parsing a theme file.
    #[error("failed to load theme from '{path}': {reason}")]
    ThemeLoad { path: String, reason: String },

    /// Error accessing the system clipboard.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Error injecting a keystroke into the focused application.
    #[error("keystroke injection error: {0}")]
    Inject(String),

    /// Error registering or handling hotkey.
    #[error("hotkey error: {0}")]
    Hotkey(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tagflow operations.
pub type Result<T> = std::result::Result<T, TagFlowError>;

impl TagFlowError {
    /// Create a new TagFile error.
    pub fn tag_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TagFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new ConfigValidation error.
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation(message.into())
    }

    /// Create a new ConfigLoad error.
    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new ConfigSave error.
    pub fn config_save(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigSave {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new InvalidDuration error.
    pub fn invalid_duration(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDuration {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new InvalidKey error.
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a new InvalidColor error.
    pub fn invalid_color(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new ThemeLoad error.
    pub fn theme_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ThemeLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new Clipboard error.
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard(message.into())
    }

    /// Create a new Inject error.
    pub fn inject(message: impl Into<String>) -> Self {
        Self::Inject(message.into())
    }

    /// Create a new Hotkey error.
    pub fn hotkey(message: impl Into<String>) -> Self {
        Self::Hotkey(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TagFlowError::tag_file("tags.txt", "permission denied");
        assert_eq!(
            err.to_string(),
            "failed to read tag file 'tags.txt': permission denied"
        );

        let err = TagFlowError::invalid_key("xyz", "unknown key");
        assert_eq!(err.to_string(), "invalid key 'xyz': unknown key");

        let err = TagFlowError::config_validation("tags_file cannot be empty");
        assert_eq!(
            err.to_string(),
            "configuration error: tags_file cannot be empty"
        );

        let err = TagFlowError::invalid_color("#12", "expected 3 or 6 hex digits");
        assert_eq!(
            err.to_string(),
            "invalid color '#12': expected 3 or 6 hex digits"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: TagFlowError = io_err.into();
        assert!(matches!(err, TagFlowError::Io(_)));
    }
}

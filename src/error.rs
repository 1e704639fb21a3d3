//! Library error type.
//!
//! A failing partition or a rejected query is reported through [`ScreenerError`] and
//! never takes the rest of the catalog down; the binary wraps these in `anyhow` context.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while loading, querying or drawing the catalog.
#[derive(Error, Debug)]
pub enum ScreenerError {
    /// Reading a partition or config file failed
    #[error("Cannot read source: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A configured catalog source does not exist
    #[error("Source not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Path exists but is not a regular file
    #[error("Path is not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Source file exists but holds no data
    #[error("Source is empty: {path}")]
    EmptySource { path: PathBuf },

    /// Compressed partition could not be decoded
    #[error("Decompression failed: {message}")]
    DecompressionError { message: String },

    #[error("Query pattern failed: {message}")]
    PatternError { message: String },

    /// Terminal setup, drawing or teardown
    #[error("Terminal error: {message}")]
    UIError { message: String },

    /// Bad configuration file or partition layout
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Rejected query, filter or argument
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{message}")]
    Other { message: String },
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

impl ScreenerError {
    /// Wrap an io error with what was being attempted.
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    pub fn decompression(message: impl Into<String>) -> Self {
        Self::DecompressionError {
            message: message.into(),
        }
    }

    pub fn pattern(message: impl Into<String>) -> Self {
        Self::PatternError {
            message: message.into(),
        }
    }

    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ScreenerError {
    fn from(err: std::io::Error) -> Self {
        let message = match err.kind() {
            std::io::ErrorKind::NotFound => "no such file",
            std::io::ErrorKind::PermissionDenied => "permission denied",
            _ => "read failed",
        };
        Self::FileError {
            message: message.to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for ScreenerError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.message().to_string())
    }
}

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Custom error type for the feaLab tools
#[derive(Debug, Error)]
pub enum Error {
    /// IO operations errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Font parsing errors
    #[error("Font error: {0}")]
    Font(String),
    /// Invalid file or directory path
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
    /// Batch file errors
    #[error("Batch processing error: {0}")]
    Batch(String),
    /// An external HarfBuzz utility could not be run or failed
    #[error("{tool} failed: {message}")]
    Tool {
        /// Name of the executable
        tool: String,
        /// Exit status and captured stderr
        message: String,
    },
    /// Malformed JSON from `hb-shape` or an options file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for feaLab operations
pub type Result<T> = std::result::Result<T, Error>;

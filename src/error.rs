//! Error handling for SerialVis-RS
//!
//! This module defines the crate-wide error type and a Result alias.
//!
//! Errors in the sample-ingestion path (`LineDecode`, `LineFormat`,
//! `UnknownTag`) are absorbed by the capture coordinator and only counted;
//! they exist as variants so tests and logs can name them. Registry misuse
//! and export failures are returned to the caller.

use crate::capture::parser::ParseError;
use thiserror::Error;

/// Main error type for SerialVis-RS operations
#[derive(Error, Debug)]
pub enum SerialVisError {
    /// Raw line bytes were not valid UTF-8
    #[error("Line decode error: {0}")]
    LineDecode(#[from] std::str::Utf8Error),

    /// A line did not follow the `TAG:VALUE(,TAG:VALUE)*` grammar
    #[error("Line format error: {0}")]
    LineFormat(#[from] ParseError),

    /// A parsed tag has no registered channel
    #[error("Unknown channel tag: {0}")]
    UnknownTag(String),

    /// A channel with this tag is already registered
    #[error("Channel already registered: {0}")]
    DuplicateTag(String),

    /// Channel lookup by tag or index failed
    #[error("Channel not found: {0}")]
    NotFound(String),

    /// Export was requested with no recorded samples
    #[error("No data to export")]
    EmptyExport,

    /// Ring buffers need room for at least one sample
    #[error("Invalid buffer capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors from the serial link or line source
    #[error("Transport error: {0}")]
    Transport(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SerialVisError>,
    },
}

impl SerialVisError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SerialVisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serialport::Error> for SerialVisError {
    fn from(err: serialport::Error) -> Self {
        SerialVisError::Transport(err.to_string())
    }
}

/// Result type alias for SerialVis-RS operations
pub type Result<T> = std::result::Result<T, SerialVisError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

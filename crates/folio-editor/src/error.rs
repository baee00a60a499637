//! Error types for the editor

use thiserror::Error;

/// Errors raised inside an editing surface
///
/// These are engine defects or refused input documents, never ordinary
/// editing mistakes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// A document handed to `load` fails structural validation
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A command argument the engine cannot represent
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// The engine broke one of its own invariants
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Errors that can occur in the adapter and the article form
#[derive(Error, Debug)]
pub enum EditorError {
    /// Editing surface error (fatal)
    #[error("Editing surface error: {0}")]
    Surface(String),

    /// Content API error
    #[error("API error: {0}")]
    Api(String),

    /// Thumbnail upload failed
    #[error("Upload error: {0}")]
    Upload(String),

    /// Form fields failed validation
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A submission is already in progress
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<SurfaceError> for EditorError {
    fn from(e: SurfaceError) -> Self {
        EditorError::Surface(e.to_string())
    }
}

impl From<toml::de::Error> for EditorError {
    fn from(e: toml::de::Error) -> Self {
        EditorError::Config(e.to_string())
    }
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;

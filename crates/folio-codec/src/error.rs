//! Error types for the codec

use thiserror::Error;

/// Errors that can occur while decoding a Document string
///
/// Callers treat any of these as "not canonical form" and fall back to the
/// legacy markup path; they never reach the user.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The string is not JSON at all
    #[error("JSON parse error: {0}")]
    Json(String),

    /// JSON without a root node holding a children array
    #[error("Not canonical form: {0}")]
    NotCanonical(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e.to_string())
    }
}

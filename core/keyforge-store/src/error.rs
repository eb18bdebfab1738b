//! Error types for the store layer.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while decoding a tagged-value document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The document (or its `fields` member) is not a JSON object.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// An `integerValue` payload is not a valid 64-bit integer.
    #[error("invalid integer value for field '{field}': {value}")]
    InvalidInteger { field: String, value: String },

    /// A `doubleValue` payload is neither a number nor numeric text.
    #[error("invalid double value for field '{field}': {value}")]
    InvalidDouble { field: String, value: String },

    /// A known tag carries a payload of the wrong JSON type.
    #[error("invalid {tag} payload for field '{field}'")]
    InvalidValue { field: String, tag: &'static str },
}

/// Errors that can occur talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a non-success status. `body` is the raw payload.
    #[error("store rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned a body that is not JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A document handed to the store is not a JSON object.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns the payload to surface to callers.
    ///
    /// For rejected requests this is the store's body verbatim; for every
    /// other error it is the display text.
    pub fn raw_payload(&self) -> String {
        match self {
            StoreError::Rejected { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    /// Returns the HTTP status the store answered with, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Rejected { status, .. } => Some(*status),
            StoreError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

//! Error types for the licensing module.

use keyforge_store::{CodecError, StoreError};
use thiserror::Error;

/// Licensing-specific errors.
///
/// Negative check results (not found, inactive, expired) are not errors; see
/// [`crate::CheckOutcome`].
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The document store failed or rejected the request.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A stored document could not be decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A timestamp string could not be parsed.
    #[error("malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// The requested validity window overflows the supported date range.
    #[error("expiry of {0} days is out of range")]
    InvalidExpiry(u32),

    /// A stored record is missing a required field.
    #[error("malformed license record: {0}")]
    MalformedRecord(String),
}

impl LicenseError {
    /// Returns the payload to surface to API callers.
    ///
    /// Store rejections pass the store's body through unmodified.
    pub fn raw_payload(&self) -> String {
        match self {
            LicenseError::Store(e) => e.raw_payload(),
            other => other.to_string(),
        }
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

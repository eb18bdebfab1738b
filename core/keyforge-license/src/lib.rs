//! License lifecycle for Keyforge.
//!
//! This module handles:
//! - Generating random license keys
//! - Issuing licenses with a fixed validity window
//! - Checking a key against the stored record
//! - Revoking a key (soft delete; records are never removed)
//!
//! # Design Principles
//!
//! - **Store owns state**: every operation is one fresh round trip, nothing is cached
//! - **One-way revocation**: once inactive, a key is never reactivated
//! - **Fixed check order**: not found, then inactive, then expired
//!
//! # License Key Format
//!
//! Keys are uppercase hexadecimal strings drawn from the OS random source,
//! 16 characters by default.

mod error;
mod key;
mod record;
mod service;

pub use error::{LicenseError, LicenseResult};
pub use key::{generate_license_key, DEFAULT_KEY_LENGTH};
pub use record::{
    parse_timestamp, LicenseRecord, LicenseStatus, FIELD_CREATED_AT, FIELD_EXPIRES_AT, FIELD_KEY,
    FIELD_STATUS,
};
pub use service::{
    CheckOutcome, IssuedLicense, LicenseService, COLLECTION, DEFAULT_EXPIRES_IN_DAYS,
};

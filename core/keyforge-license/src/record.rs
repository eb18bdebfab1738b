//! The persisted license record and its field mapping.

use crate::error::{LicenseError, LicenseResult};
use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeDelta, Utc};
use keyforge_store::{DecodedFields, FieldValue, Fields};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored field holding the license key.
pub const FIELD_KEY: &str = "key";
/// Stored field holding the status text.
pub const FIELD_STATUS: &str = "status";
/// Stored field holding the creation time.
pub const FIELD_CREATED_AT: &str = "createdAt";
/// Stored field holding the expiry time.
pub const FIELD_EXPIRES_AT: &str = "expiresAt";

/// Whether a license may still be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    /// Issued and not revoked.
    Active,
    /// Revoked. Never transitions back to active.
    Inactive,
}

impl LicenseStatus {
    /// Returns the stored text for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Reads a decoded status field.
    ///
    /// Only the exact text `"active"` is active; anything else, including a
    /// missing or unrecognized field, counts as inactive.
    #[must_use]
    pub fn from_field(value: Option<&FieldValue>) -> Self {
        match value.and_then(FieldValue::as_text) {
            Some("active") => Self::Active,
            _ => Self::Inactive,
        }
    }

    /// Returns true for [`LicenseStatus::Active`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A license as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRecord {
    /// The license key, also used as the document id.
    pub key: String,
    /// Current status.
    pub status: LicenseStatus,
    /// Creation time (naive UTC, microsecond precision).
    pub created_at: NaiveDateTime,
    /// Expiry time (naive UTC, microsecond precision).
    pub expires_at: NaiveDateTime,
}

impl LicenseRecord {
    /// Builds a new active record valid for `expires_in_days` days from `now`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidExpiry`] if the expiry falls outside the
    /// representable date range.
    pub fn issue(key: String, now: NaiveDateTime, expires_in_days: u32) -> LicenseResult<Self> {
        let created_at = now.trunc_subsecs(6);
        let expires_at = TimeDelta::try_days(i64::from(expires_in_days))
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .ok_or(LicenseError::InvalidExpiry(expires_in_days))?;

        Ok(Self {
            key,
            status: LicenseStatus::Active,
            created_at,
            expires_at,
        })
    }

    /// Maps the record onto typed fields for encoding.
    #[must_use]
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(FIELD_KEY.to_string(), self.key.clone().into());
        fields.insert(FIELD_STATUS.to_string(), self.status.as_str().into());
        fields.insert(FIELD_CREATED_AT.to_string(), self.created_at.into());
        fields.insert(FIELD_EXPIRES_AT.to_string(), self.expires_at.into());
        fields
    }

    /// Rebuilds a full record from decoded fields, parsing both timestamps.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is missing, not text, or a timestamp is malformed.
    pub fn from_fields(fields: &DecodedFields) -> LicenseResult<Self> {
        let key = required_text(fields, FIELD_KEY)?.to_string();
        let status = LicenseStatus::from_field(fields.get(FIELD_STATUS).and_then(Option::as_ref));
        let created_at = parse_timestamp(required_text(fields, FIELD_CREATED_AT)?)?.naive_utc();
        let expires_at = parse_timestamp(required_text(fields, FIELD_EXPIRES_AT)?)?.naive_utc();

        Ok(Self {
            key,
            status,
            created_at,
            expires_at,
        })
    }
}

/// Returns the text of a decoded field, or a [`LicenseError::MalformedRecord`].
pub(crate) fn required_text<'a>(fields: &'a DecodedFields, name: &str) -> LicenseResult<&'a str> {
    fields
        .get(name)
        .and_then(Option::as_ref)
        .and_then(FieldValue::as_text)
        .ok_or_else(|| LicenseError::MalformedRecord(format!("missing text field '{name}'")))
}

/// Parses a stored timestamp.
///
/// Accepts RFC 3339 text with an offset, or naive ISO-8601 text (taken as
/// UTC). Either form may carry extra trailing `Z` designators, as written
/// when the encoder suffixed a value that already had a zone.
///
/// # Errors
///
/// Returns [`LicenseError::MalformedTimestamp`] if neither form matches.
pub fn parse_timestamp(text: &str) -> LicenseResult<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }

    let stripped = text.trim_end_matches('Z');
    if let Ok(ts) = DateTime::parse_from_rfc3339(stripped) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(stripped, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ts| ts.and_utc())
        .map_err(|e| LicenseError::MalformedTimestamp(format!("{text}: {e}")))
}

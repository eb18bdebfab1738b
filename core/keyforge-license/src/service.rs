//! License service: create, check and revoke against the document store.

use crate::error::LicenseResult;
use crate::key::{generate_license_key, DEFAULT_KEY_LENGTH};
use crate::record::{
    parse_timestamp, required_text, LicenseRecord, LicenseStatus, FIELD_EXPIRES_AT, FIELD_STATUS,
};
use chrono::Utc;
use keyforge_store::{codec, format_timestamp, DocumentStore, Fields};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Store collection holding license documents.
pub const COLLECTION: &str = "licenses";

/// Validity window used when the caller does not specify one.
pub const DEFAULT_EXPIRES_IN_DAYS: u32 = 30;

/// A freshly issued license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedLicense {
    /// The new license key.
    pub key: String,
    /// Expiry as ISO-8601 text (no zone designator).
    pub expires_at: String,
}

/// Result of checking a license key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum CheckOutcome {
    /// Active and unexpired. `expires_at` is the stored text, unchanged.
    Valid { expires_at: String },
    /// No document exists for the key.
    NotFound,
    /// The key has been revoked.
    Inactive,
    /// The key is active but past its expiry.
    Expired,
}

impl CheckOutcome {
    /// Returns true only for [`CheckOutcome::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Returns the user-facing message for this outcome.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Valid { .. } => "License key valid",
            Self::NotFound => "License key not found",
            Self::Inactive => "License key inactive",
            Self::Expired => "License key expired",
        }
    }
}

/// Orchestrates the license lifecycle against a document store.
///
/// Holds no state besides the store handle; every call is one round trip.
#[derive(Clone)]
pub struct LicenseService {
    store: Arc<dyn DocumentStore>,
}

impl LicenseService {
    /// Creates a service backed by `store`.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Issues a new active license valid for `expires_in_days` days.
    ///
    /// The document is upserted under the generated key. The key is not
    /// checked for an existing record first.
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry is out of range or the store rejects the write.
    pub async fn create(&self, expires_in_days: u32) -> LicenseResult<IssuedLicense> {
        let key = generate_license_key(DEFAULT_KEY_LENGTH);
        let record = LicenseRecord::issue(key, Utc::now().naive_utc(), expires_in_days)?;

        let document = codec::encode(&record.to_fields());
        self.store.patch(COLLECTION, &record.key, &document).await?;

        info!("Issued license {} (expires {})", record.key, record.expires_at);

        Ok(IssuedLicense {
            expires_at: format_timestamp(&record.expires_at),
            key: record.key,
        })
    }

    /// Checks whether `license_key` is currently valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails, or if an active record is missing
    /// or has a malformed `expiresAt`. Negative results are [`CheckOutcome`]s.
    pub async fn check(&self, license_key: &str) -> LicenseResult<CheckOutcome> {
        let Some(document) = self.store.get(COLLECTION, license_key).await? else {
            debug!("License {} not found", license_key);
            return Ok(CheckOutcome::NotFound);
        };

        let fields = codec::decode(&document)?;

        let status = LicenseStatus::from_field(fields.get(FIELD_STATUS).and_then(Option::as_ref));
        if !status.is_active() {
            return Ok(CheckOutcome::Inactive);
        }

        let expires_text = required_text(&fields, FIELD_EXPIRES_AT)?;
        let expires_at = parse_timestamp(expires_text)?;
        if expires_at < Utc::now() {
            return Ok(CheckOutcome::Expired);
        }

        Ok(CheckOutcome::Valid {
            expires_at: expires_text.to_string(),
        })
    }

    /// Marks `license_key` inactive.
    ///
    /// Only the status field is sent. No existence check is made, so revoking
    /// an unknown key may leave a partial record behind, depending on the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub async fn revoke(&self, license_key: &str) -> LicenseResult<()> {
        let mut fields = Fields::new();
        fields.insert(FIELD_STATUS.to_string(), LicenseStatus::Inactive.as_str().into());

        self.store
            .patch(COLLECTION, license_key, &codec::encode(&fields))
            .await?;

        info!("Revoked license {}", license_key);
        Ok(())
    }

    /// Returns the backing store's name.
    pub fn store_name(&self) -> &'static str {
        self.store.provider_name()
    }
}

//! Shared test helpers for license tests.

#![allow(dead_code)]

use chrono::{NaiveDateTime, TimeDelta, Utc};
use keyforge_license::{LicenseService, COLLECTION};
use keyforge_store::{encode, FieldValue, Fields, MemoryDocumentStore};
use std::sync::Arc;

/// Returns a service over a fresh in-memory store, plus the store handle.
pub fn memory_service() -> (LicenseService, MemoryDocumentStore) {
    let store = MemoryDocumentStore::new();
    let service = LicenseService::new(Arc::new(store.clone()));
    (service, store)
}

/// Builds a stored license document with the given status and expiry.
pub fn license_document(key: &str, status: &str, expires_at: NaiveDateTime) -> serde_json::Value {
    let mut fields = Fields::new();
    fields.insert("key".into(), FieldValue::Text(key.to_string()));
    fields.insert("status".into(), FieldValue::Text(status.to_string()));
    fields.insert(
        "createdAt".into(),
        FieldValue::Timestamp(expires_at - TimeDelta::days(30)),
    );
    fields.insert("expiresAt".into(), FieldValue::Timestamp(expires_at));
    encode(&fields)
}

/// Stores a license document directly, bypassing the service.
pub async fn seed(store: &MemoryDocumentStore, key: &str, status: &str, expires_at: NaiveDateTime) {
    store
        .put(COLLECTION, key, license_document(key, status, expires_at))
        .await;
}

/// A naive UTC time `days` days from now (negative for the past).
pub fn days_from_now(days: i64) -> NaiveDateTime {
    Utc::now().naive_utc() + TimeDelta::days(days)
}

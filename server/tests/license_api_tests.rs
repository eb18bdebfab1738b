use std::sync::Arc;
use keyforge_license::{LicenseService, COLLECTION};
use keyforge_server::{
    build_router, CheckLicenseResponse, CreateLicenseResponse, RevokeLicenseResponse,
};
use keyforge_store::{DocumentStore, MemoryDocumentStore, StoreError, StoreResult};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_with_store(store: Arc<dyn DocumentStore>) -> String {
    let app = build_router(Arc::new(LicenseService::new(store)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

async fn spawn_test_server() -> (String, MemoryDocumentStore) {
    let store = MemoryDocumentStore::new();
    let base = spawn_with_store(Arc::new(store.clone())).await;
    (base, store)
}

async fn create_license(base: &str, body: Value) -> CreateLicenseResponse {
    let resp = reqwest::Client::new()
        .post(format!("{}/create", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn create_returns_201_with_key_and_expiry() {
    let (base, store) = spawn_test_server().await;

    let created = create_license(&base, json!({"expires_in_days": 7})).await;

    assert_eq!(created.license_key.len(), 16);
    assert!(!created.expires_at.is_empty());
    assert!(store.get(COLLECTION, &created.license_key).await.unwrap().is_some());
}

#[tokio::test]
async fn create_without_body_uses_default_expiry() {
    let (base, _store) = spawn_test_server().await;

    let resp = reqwest::Client::new()
        .post(format!("{}/create", base))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 201);
    let created: CreateLicenseResponse = resp.json().await.unwrap();
    assert_eq!(created.license_key.len(), 16);
}

#[tokio::test]
async fn create_with_malformed_body_is_400() {
    let (base, store) = spawn_test_server().await;

    let resp = reqwest::Client::new()
        .post(format!("{}/create", base))
        .header("content-type", "application/json")
        .body(r#"{"expires_in_days": -3}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("invalid request body"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn create_with_out_of_range_expiry_is_400() {
    let (base, store) = spawn_test_server().await;

    let resp = reqwest::Client::new()
        .post(format!("{}/create", base))
        .json(&json!({"expires_in_days": u32::MAX}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "expiry of 4294967295 days is out of range");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn check_valid_license() {
    let (base, _store) = spawn_test_server().await;
    let created = create_license(&base, json!({})).await;

    let resp = reqwest::get(format!("{}/check/{}", base, created.license_key))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: CheckLicenseResponse = resp.json().await.unwrap();
    assert!(body.valid);
    assert_eq!(body.message, "License key valid");
    assert_eq!(body.expires_at, Some(format!("{}Z", created.expires_at)));
}

#[tokio::test]
async fn check_unknown_license_is_404() {
    let (base, _store) = spawn_test_server().await;

    let resp = reqwest::get(format!("{}/check/NOPE", base)).await.unwrap();

    assert_eq!(resp.status(), 404);
    let body: CheckLicenseResponse = resp.json().await.unwrap();
    assert_eq!(
        body,
        CheckLicenseResponse {
            valid: false,
            message: "License key not found".to_string(),
            expires_at: None,
        }
    );
}

#[tokio::test]
async fn delete_then_check_is_403_inactive() {
    let (base, _store) = spawn_test_server().await;
    let created = create_license(&base, json!({"expires_in_days": 30})).await;
    let client = reqwest::Client::new();

    let resp = client
        .delete(format!("{}/delete/{}", base, created.license_key))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: RevokeLicenseResponse = resp.json().await.unwrap();
    assert!(body.success);
    assert_eq!(body.message, "License key deactivated");

    let resp = reqwest::get(format!("{}/check/{}", base, created.license_key))
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    let body: CheckLicenseResponse = resp.json().await.unwrap();
    assert!(!body.valid);
    assert_eq!(body.message, "License key inactive");
}

#[tokio::test]
async fn expired_license_is_403() {
    let (base, store) = spawn_test_server().await;
    store
        .put(
            COLLECTION,
            "OLDKEY",
            json!({"fields": {
                "status": {"stringValue": "active"},
                "expiresAt": {"timestampValue": "2020-01-01T00:00:00Z"}
            }}),
        )
        .await;

    let resp = reqwest::get(format!("{}/check/OLDKEY", base)).await.unwrap();

    assert_eq!(resp.status(), 403);
    let body: CheckLicenseResponse = resp.json().await.unwrap();
    assert_eq!(body.message, "License key expired");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (base, _store) = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/v1/nonexistent", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

struct BrokenStore;

#[async_trait::async_trait]
impl DocumentStore for BrokenStore {
    fn provider_name(&self) -> &'static str {
        "broken"
    }

    async fn get(&self, _collection: &str, _doc_id: &str) -> StoreResult<Option<Value>> {
        Err(StoreError::Rejected {
            status: 401,
            body: r#"{"error":"Permission denied"}"#.to_string(),
        })
    }

    async fn patch(&self, _collection: &str, _doc_id: &str, _document: &Value) -> StoreResult<()> {
        Err(StoreError::Rejected {
            status: 401,
            body: r#"{"error":"Permission denied"}"#.to_string(),
        })
    }
}

#[tokio::test]
async fn store_errors_are_500_with_raw_payload() {
    let base = spawn_with_store(Arc::new(BrokenStore)).await;
    let client = reqwest::Client::new();

    let create = client.post(format!("{}/create", base)).send().await.unwrap();
    let check = client.get(format!("{}/check/K", base)).send().await.unwrap();
    let revoke = client.delete(format!("{}/delete/K", base)).send().await.unwrap();

    for resp in [create, check, revoke] {
        assert_eq!(resp.status(), 500);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], r#"{"error":"Permission denied"}"#);
    }
}

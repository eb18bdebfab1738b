//! HTTP API for the Keyforge license service.

mod error;

pub use error::ApiError;

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use keyforge_license::{CheckOutcome, LicenseService, DEFAULT_EXPIRES_IN_DAYS};
use serde::{Deserialize, Serialize};

/// Body of `POST /create`. The whole body is optional.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CreateLicenseRequest {
    #[serde(default)]
    pub expires_in_days: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreateLicenseResponse {
    pub license_key: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CheckLicenseResponse {
    pub valid: bool,
    pub message: String,
    #[serde(rename = "expiresAt", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RevokeLicenseResponse {
    pub success: bool,
    pub message: String,
}

async fn create_handler(
    State(service): State<Arc<LicenseService>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateLicenseResponse>), ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CreateLicenseRequest::default()
    } else {
        serde_json::from_slice::<CreateLicenseRequest>(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid request body: {e}")))?
    };

    let issued = service
        .create(request.expires_in_days.unwrap_or(DEFAULT_EXPIRES_IN_DAYS))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateLicenseResponse {
            license_key: issued.key,
            expires_at: issued.expires_at,
        }),
    ))
}

async fn check_handler(
    State(service): State<Arc<LicenseService>>,
    Path(license_key): Path<String>,
) -> Result<Response, ApiError> {
    let outcome = service.check(&license_key).await?;

    let status = match outcome {
        CheckOutcome::Valid { .. } => StatusCode::OK,
        CheckOutcome::NotFound => StatusCode::NOT_FOUND,
        CheckOutcome::Inactive | CheckOutcome::Expired => StatusCode::FORBIDDEN,
    };

    let body = CheckLicenseResponse {
        valid: outcome.is_valid(),
        message: outcome.message().to_string(),
        expires_at: match outcome {
            CheckOutcome::Valid { expires_at } => Some(expires_at),
            _ => None,
        },
    };

    Ok((status, Json(body)).into_response())
}

async fn revoke_handler(
    State(service): State<Arc<LicenseService>>,
    Path(license_key): Path<String>,
) -> Result<Json<RevokeLicenseResponse>, ApiError> {
    service.revoke(&license_key).await?;

    Ok(Json(RevokeLicenseResponse {
        success: true,
        message: "License key deactivated".to_string(),
    }))
}

/// Build the HTTP API router around the given service.
pub fn build_router(service: Arc<LicenseService>) -> Router {
    Router::new()
        .route("/create", post(create_handler))
        .route("/check/{license_key}", get(check_handler))
        .route("/delete/{license_key}", delete(revoke_handler))
        .with_state(service)
}

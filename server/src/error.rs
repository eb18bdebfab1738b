use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use keyforge_license::LicenseError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    License(#[from] LicenseError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::License(e @ LicenseError::InvalidExpiry(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::License(e) => {
                tracing::error!("License operation failed: {}", e);
                // Store payloads pass through verbatim.
                (StatusCode::INTERNAL_SERVER_ERROR, e.raw_payload())
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

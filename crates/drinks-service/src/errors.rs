//! Drinks service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl, and every
//! error response carries the same JSON body shape:
//!
//! ```json
//! {"success": false, "error": 404, "message": "resource not found"}
//! ```
//!
//! Authorization failures are a distinct typed error ([`AuthError`]) carried
//! inside [`ApiError`] and mapped centrally to their own status and message.
//! Storage faults are logged server-side and collapsed to a generic 422 body.

use crate::auth::AuthError;
use crate::repositories::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Drinks service error type.
///
/// Maps to HTTP status codes:
/// - `BadRequest`: 400
/// - `Auth`: the status carried by the authorization failure (400/401/403/503)
/// - `NotFound`: 404
/// - `MethodNotAllowed`: 405
/// - `Conflict`: 409
/// - `Unprocessable`: 422
/// - `Internal`: 500
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(e) => e.status_code(),
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body returned on every failure path.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

/// Build the canonical error response for a status and message.
fn error_response(status: StatusCode, message: String) -> Response {
    let body = ErrorBody {
        success: false,
        error: status.as_u16(),
        message,
    };

    let mut response = (status, Json(body)).into_response();

    // Add WWW-Authenticate header for 401 responses
    if status == StatusCode::UNAUTHORIZED {
        if let Ok(header_value) = "Bearer realm=\"drinks-api\", error=\"invalid_token\"".parse() {
            response
                .headers_mut()
                .insert("WWW-Authenticate", header_value);
        }
    }

    response
}

/// Canonical message for a bare status, used when reshaping framework
/// responses that carry no message of their own.
fn canonical_message(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "bad request".to_string(),
        401 => "unauthorized".to_string(),
        403 => "forbidden".to_string(),
        404 => "resource not found".to_string(),
        405 => "method not allowed".to_string(),
        409 => "conflict".to_string(),
        422 => "unprocessable".to_string(),
        500 => "internal server error".to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("error")
            .to_ascii_lowercase(),
    }
}

/// Build the canonical error response for a bare status.
///
/// Used by the response-shaping layer to give framework-generated failures
/// (unknown method, body rejections, timeouts) the same JSON body as
/// service errors.
#[must_use]
pub fn response_for_status(status: StatusCode) -> Response {
    error_response(status, canonical_message(status))
}

/// Map a typed storage failure to its response status.
///
/// `NotFound` -> 404, `DuplicateTitle` -> 409, anything else -> 422.
impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound => ApiError::NotFound("resource not found".to_string()),
            StorageError::DuplicateTitle => {
                ApiError::Conflict("a drink with this title already exists".to_string())
            }
            StorageError::Database(reason) => ApiError::Unprocessable(reason),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Auth(e) => (e.status_code(), e.to_string()),
            ApiError::NotFound(resource) => (StatusCode::NOT_FOUND, resource.clone()),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "method not allowed".to_string(),
            ),
            ApiError::Conflict(reason) => (StatusCode::CONFLICT, reason.clone()),
            ApiError::Unprocessable(reason) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "drinks.storage", error = %reason, "Storage operation failed");
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable".to_string())
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        error_response(status, message)
    }
}

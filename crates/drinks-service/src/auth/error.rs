//! Typed authorization failures.
//!
//! Authorization errors are distinct from ordinary application errors: each
//! carries the HTTP status it maps to, and the error-response path maps them
//! centrally. Messages are generic on purpose; details are logged where the
//! failure is detected.

use axum::http::StatusCode;
use thiserror::Error;

/// An authorization failure with a fixed HTTP status.
///
/// Maps to HTTP status codes:
/// - `MissingBearer`, `MalformedHeader`, `TokenExpired`, `InvalidClaims`: 401
/// - `KeyNotFound`, `UnparseableToken`: 400
/// - `Forbidden`: 403
/// - `KeySetUnavailable`: 503
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Authorization header absent or not a well-formed bearer header.
    #[error("authorization header missing or invalid")]
    MissingBearer,

    /// Token header undecodable, oversized, or missing a key ID.
    #[error("authorization token header is malformed")]
    MalformedHeader,

    /// No key in the fetched key set matches the token's key ID.
    #[error("unable to find the appropriate signing key")]
    KeyNotFound,

    /// Token signature is valid but the token has expired.
    #[error("token expired")]
    TokenExpired,

    /// Audience or issuer does not match the configured values.
    #[error("incorrect claims, please check the audience and issuer")]
    InvalidClaims,

    /// Any other decode or verification failure.
    #[error("unable to parse authentication token")]
    UnparseableToken,

    /// The claim set does not grant the required permission.
    #[error("permission not found")]
    Forbidden,

    /// The key set endpoint is unreachable or returned malformed data.
    #[error("signing key set unavailable")]
    KeySetUnavailable,
}

impl AuthError {
    /// The HTTP status this failure maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingBearer
            | AuthError::MalformedHeader
            | AuthError::TokenExpired
            | AuthError::InvalidClaims => StatusCode::UNAUTHORIZED,
            AuthError::KeyNotFound | AuthError::UnparseableToken => StatusCode::BAD_REQUEST,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::KeySetUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::MissingBearer.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::MalformedHeader.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::TokenExpired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidClaims.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::KeyNotFound.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::UnparseableToken.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::KeySetUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_display_messages_are_generic() {
        // No message should leak key material or token contents
        let errors = [
            AuthError::MissingBearer,
            AuthError::MalformedHeader,
            AuthError::KeyNotFound,
            AuthError::TokenExpired,
            AuthError::InvalidClaims,
            AuthError::UnparseableToken,
            AuthError::Forbidden,
            AuthError::KeySetUnavailable,
        ];
        for error in errors {
            let msg = error.to_string();
            assert!(!msg.is_empty());
            assert!(!msg.contains("kid="));
        }
    }
}

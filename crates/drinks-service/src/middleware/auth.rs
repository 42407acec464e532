//! Authentication and permission middleware for protected routes.
//!
//! Two pipeline stages, applied per route:
//!
//! 1. [`require_auth`] extracts the bearer token from the Authorization
//!    header, verifies it, and injects the claim set into request extensions.
//! 2. [`require_permission`] is parameterized by a required-permission string
//!    and enforces it against the injected claim set.
//!
//! Verification failures propagate with the status carried by the
//! authorization error; they are not collapsed to 403.

use crate::auth::{check_permission, AuthError, Claims, TokenVerifier};
use crate::errors::ApiError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Token verifier with its JWKS client.
    pub verifier: Arc<TokenVerifier>,
}

/// Required permission for a route, carried as middleware state.
#[derive(Clone, Copy)]
pub struct RequiredPermission(pub &'static str);

/// Authentication middleware that verifies bearer tokens.
///
/// Extracts the bearer token from the Authorization header, verifies the
/// signature and claims, then stores the claim set in request extensions
/// for downstream stages and handlers.
///
/// # Authorization Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// The scheme is matched case-insensitively; anything other than exactly
/// two space-separated parts is rejected.
///
/// # Response
///
/// - 401 if the header is missing or not a well-formed bearer header
/// - the verifier's own status (400/401/503) if verification fails
/// - continues to the next stage with claims in extensions if valid
#[instrument(skip(state, req, next), name = "drinks.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(req.headers())?;

    // Verify the token; failures keep their original status
    let claims = state.verifier.verify(token).await?;

    // Store claims in request extensions for downstream stages and handlers
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Permission middleware for routes gated on a specific permission.
///
/// Must run after [`require_auth`]; reads the claim set from request
/// extensions and enforces the configured permission.
///
/// # Response
///
/// - 403 if the claim set is absent or does not grant the permission
/// - continues to the handler otherwise
#[instrument(skip(req, next), name = "drinks.middleware.permission", fields(required = required.0))]
pub async fn require_permission(
    State(required): State<RequiredPermission>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(AuthError::Forbidden)?;

    check_permission(required.0, claims)?;

    Ok(next.run(req).await)
}

/// Extract the bearer token from request headers.
///
/// Mirrors the wire contract exactly: the header value must be two
/// space-separated parts, the first case-insensitively equal to `bearer`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "drinks.middleware.auth", "Missing Authorization header");
            AuthError::MissingBearer
        })?;

    let mut parts = value.split(' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next();

    match (token, parts.next()) {
        (Some(token), None) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token)
        }
        _ => {
            tracing::debug!(target: "drinks.middleware.auth", "Invalid Authorization header format");
            Err(AuthError::MissingBearer)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_valid() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_case_insensitive_scheme() {
        assert_eq!(
            bearer_token(&headers_with("bearer abc.def.ghi")),
            Ok("abc.def.ghi")
        );
        assert_eq!(
            bearer_token(&headers_with("BEARER abc.def.ghi")),
            Ok("abc.def.ghi")
        );
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingBearer));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let headers = headers_with("Basic abc123");
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingBearer));
    }

    #[test]
    fn test_bearer_token_one_part() {
        let headers = headers_with("Bearer");
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingBearer));
    }

    #[test]
    fn test_bearer_token_three_parts() {
        let headers = headers_with("Bearer abc def");
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingBearer));
    }

    #[test]
    fn test_bearer_token_empty_token_part() {
        // "Bearer " splits into ["Bearer", ""], which is not a usable token
        let headers = headers_with("Bearer ");
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingBearer));
    }

    #[test]
    fn test_auth_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AuthState>();
        assert_clone::<RequiredPermission>();
    }
}

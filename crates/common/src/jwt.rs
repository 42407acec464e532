//! JWT utilities shared across Drinks API services.
//!
//! This module provides the pieces of token handling that happen before any
//! cryptography: size limits and key ID extraction from the unverified
//! header. Signature verification itself lives with the service that owns
//! the key set.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Error messages are intentionally generic to prevent information leakage

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use thiserror::Error;

/// Maximum allowed JWT size in bytes (8KB).
///
/// This limit prevents denial-of-service attacks via oversized tokens.
/// JWTs larger than this size are rejected BEFORE any parsing or
/// cryptographic operations.
///
/// Typical JWTs are 200-800 bytes; access tokens carrying a permissions
/// array stay well under 2KB. The check runs before base64 decode and
/// signature verification so an oversized token costs almost nothing.
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Errors that can occur while parsing a JWT header.
///
/// Note: the Display strings are intentionally generic. Detailed information
/// is logged at debug level for troubleshooting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtHeaderError {
    /// Token size exceeds maximum allowed.
    #[error("the access token is malformed")]
    TokenTooLarge,

    /// Token format is invalid (not a valid JWT structure).
    #[error("the access token is malformed")]
    MalformedToken,

    /// Token is missing required `kid` header.
    #[error("the access token is malformed")]
    MissingKid,
}

/// Extract the `kid` (key ID) from a JWT header without verifying the
/// signature.
///
/// This is used to look up the correct signing key for verification when
/// multiple keys may be valid (e.g., during key rotation).
///
/// # Security
///
/// - Token size is checked BEFORE any parsing
/// - This function does NOT validate the token signature
/// - The token MUST still be verified after fetching the key
/// - The `kid` value should only be used for key lookup in a trusted JWKS
///
/// # Errors
///
/// - `TokenTooLarge` - token exceeds [`MAX_JWT_SIZE_BYTES`]
/// - `MalformedToken` - not three dot-separated parts, bad base64, or
///   invalid header JSON
/// - `MissingKid` - header has no `kid` field, or `kid` is not a non-empty
///   string
pub fn extract_kid(token: &str) -> Result<String, JwtHeaderError> {
    // Check token size first (DoS prevention)
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtHeaderError::TokenTooLarge);
    }

    // JWT format: header.payload.signature
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        tracing::debug!(
            target: "common.jwt",
            parts = parts.len(),
            "Token rejected: invalid JWT format"
        );
        return Err(JwtHeaderError::MalformedToken);
    }

    let header_part = parts.first().ok_or(JwtHeaderError::MalformedToken)?;
    let header_bytes = URL_SAFE_NO_PAD.decode(header_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT header base64");
        JwtHeaderError::MalformedToken
    })?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT header JSON");
        JwtHeaderError::MalformedToken
    })?;

    // Extract kid as string, rejecting empty values
    let kid = header
        .get("kid")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or(JwtHeaderError::MissingKid)?;

    Ok(kid)
}

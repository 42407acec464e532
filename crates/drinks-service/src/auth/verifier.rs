//! Token verification for the drinks service.
//!
//! Verifies incoming bearer tokens using RSA public keys fetched from the
//! identity provider's JWKS endpoint, with explicit audience, issuer, and
//! expiry validation.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (via `common::jwt`)
//! - Only the RS256 algorithm is accepted
//! - Audience and issuer must match the configured values exactly
//! - Generic error messages prevent information leakage

use crate::auth::claims::Claims;
use crate::auth::error::AuthError;
use crate::auth::jwks::{Jwk, JwksClient};
use common::jwt::extract_kid;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tracing::instrument;

/// Token verifier using JWKS from the identity provider.
///
/// Pure validation logic: deterministic given a fixed key set and token,
/// with no side effects beyond the key fetch.
pub struct TokenVerifier {
    /// JWKS client for fetching public keys.
    jwks_client: Arc<JwksClient>,

    /// Expected audience claim.
    audience: String,

    /// Expected issuer claim (`https://{auth_domain}/`).
    issuer: String,
}

impl TokenVerifier {
    /// Create a new token verifier.
    ///
    /// # Arguments
    ///
    /// * `jwks_client` - Client for fetching public keys
    /// * `audience` - Expected audience claim
    /// * `issuer` - Expected issuer claim
    pub fn new(jwks_client: Arc<JwksClient>, audience: String, issuer: String) -> Self {
        Self {
            jwks_client,
            audience,
            issuer,
        }
    }

    /// Verify a bearer token and return its claim set.
    ///
    /// # Steps
    ///
    /// 1. Extract `kid` from the unverified header (includes size check)
    /// 2. Fetch the matching public key from JWKS
    /// 3. Verify the RS256 signature and validate audience/issuer/expiry
    ///
    /// # Errors
    ///
    /// - `MalformedHeader` - header undecodable, oversized, or without `kid`
    /// - `KeyNotFound` - no key in the set matches the `kid`
    /// - `KeySetUnavailable` - the key set could not be fetched
    /// - `TokenExpired` - signature valid but the token expired
    /// - `InvalidClaims` - audience or issuer mismatch
    /// - `UnparseableToken` - any other decode or verification failure
    #[instrument(skip_all)]
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        // 1. Extract kid from the JWT header (includes size check)
        let kid = extract_kid(token).map_err(|e| {
            tracing::debug!(target: "drinks.auth.verify", error = ?e, "Token kid extraction failed");
            AuthError::MalformedHeader
        })?;

        // 2. Fetch the matching public key from JWKS
        let jwk = self.jwks_client.get_key(&kid).await?;

        // 3. Verify signature and extract claims
        let claims = verify_token(token, &jwk, &self.audience, &self.issuer)?;

        tracing::debug!(target: "drinks.auth.verify", "Token verified successfully");
        Ok(claims)
    }
}

/// Verify an RS256 signature and validate the claim set.
fn verify_token(
    token: &str,
    jwk: &Jwk,
    audience: &str,
    issuer: &str,
) -> Result<Claims, AuthError> {
    // Validate JWK is RSA key material
    if jwk.kty != "RSA" {
        tracing::warn!(target: "drinks.auth.verify", kty = %jwk.kty, "Unexpected JWK key type");
        return Err(AuthError::UnparseableToken);
    }
    if let Some(alg) = &jwk.alg {
        if alg != "RS256" {
            tracing::warn!(target: "drinks.auth.verify", alg = %alg, "Unexpected JWK algorithm");
            return Err(AuthError::UnparseableToken);
        }
    }

    // Get modulus and exponent from JWK
    let modulus = jwk.n.as_ref().ok_or_else(|| {
        tracing::error!(target: "drinks.auth.verify", kid = %jwk.kid, "JWK missing n field");
        AuthError::UnparseableToken
    })?;
    let exponent = jwk.e.as_ref().ok_or_else(|| {
        tracing::error!(target: "drinks.auth.verify", kid = %jwk.kid, "JWK missing e field");
        AuthError::UnparseableToken
    })?;

    // Create decoding key from the RSA components
    let decoding_key = DecodingKey::from_rsa_components(modulus, exponent).map_err(|e| {
        tracing::error!(target: "drinks.auth.verify", error = %e, "Invalid RSA key components");
        AuthError::UnparseableToken
    })?;

    // Configure validation: RS256 only, exact audience and issuer
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[audience]);
    validation.set_issuer(&[issuer]);
    validation.validate_exp = true;

    // Decode and verify
    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "drinks.auth.verify", error = %e, "Token verification failed");
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
            _ => AuthError::UnparseableToken,
        }
    })?;

    Ok(token_data.claims)
}

//! JWT claim set and permission enforcement.
//!
//! Contains the claims extracted from verified tokens. The `sub` field is
//! redacted in Debug output to prevent exposure in logs.

use crate::auth::error::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `aud` claim: a single audience or a list of them.
///
/// Identity providers emit a plain string when a token has one audience and
/// an array when it has several.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// Single audience string.
    Single(String),
    /// Multiple audiences.
    Many(Vec<String>),
}

impl fmt::Debug for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::Single(aud) => write!(f, "{aud:?}"),
            Audience::Many(auds) => write!(f, "{auds:?}"),
        }
    }
}

/// Claim set decoded from a verified token.
///
/// Exists only for the duration of one request. The `sub` field contains a
/// user or client identifier which should not be exposed in logs; a custom
/// Debug implementation redacts it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer (`https://{auth_domain}/`).
    pub iss: String,

    /// Subject (user or client identifier) - redacted in Debug output.
    pub sub: String,

    /// Audience(s) the token was issued for.
    pub aud: Audience,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Permission strings granted to this token. `None` when the identity
    /// provider did not include a `permissions` claim at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Custom Debug implementation that redacts the `sub` field.
impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("iss", &self.iss)
            .field("sub", &"[REDACTED]")
            .field("aud", &self.aud)
            .field("exp", &self.exp)
            .field("permissions", &self.permissions)
            .finish()
    }
}

impl Claims {
    /// Check if the token grants a specific permission.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|perms| perms.iter().any(|p| p == permission))
    }
}

/// Enforce a required permission against a claim set.
///
/// # Errors
///
/// Returns `AuthError::Forbidden` if the claim set carries no `permissions`
/// entry, or if `required` is not a member of it. Call sites always supply a
/// concrete permission name, so absence is rejected strictly.
pub fn check_permission(required: &str, claims: &Claims) -> Result<(), AuthError> {
    let Some(permissions) = claims.permissions.as_deref() else {
        tracing::debug!(
            target: "drinks.auth.permissions",
            "Claim set has no permissions entry"
        );
        return Err(AuthError::Forbidden);
    };

    if !permissions.iter().any(|p| p == required) {
        tracing::debug!(
            target: "drinks.auth.permissions",
            required = %required,
            "Required permission not granted"
        );
        return Err(AuthError::Forbidden);
    }

    Ok(())
}

//! Authentication and authorization for the drinks service.
//!
//! This module handles JWT verification via the identity provider's JWKS
//! endpoint and permission enforcement against the decoded claim set.
//!
//! # Components
//!
//! - `jwks` - JWKS client for fetching and caching public signing keys
//! - `verifier` - RS256 token verification using fetched keys
//! - `claims` - Claim set structure and the permission check
//! - `error` - Typed authorization failures with their HTTP status

pub mod claims;
pub mod error;
pub mod jwks;
pub mod verifier;

pub use claims::{check_permission, Claims};
pub use error::AuthError;
pub use jwks::JwksClient;
pub use verifier::TokenVerifier;

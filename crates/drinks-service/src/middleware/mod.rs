//! Middleware for the drinks service.
//!
//! # Components
//!
//! - `auth` - bearer extraction + token verification, and the per-route
//!   permission stage

pub mod auth;

pub use auth::{require_auth, require_permission, AuthState, RequiredPermission};

//! HTTP routes for the drinks service.
//!
//! Defines the Axum router and application state. The storage handle and
//! configuration are injected explicitly; there are no process-wide
//! singletons.

use crate::auth::{JwksClient, TokenVerifier};
use crate::config::Config;
use crate::errors;
use crate::handlers;
use crate::middleware::{require_auth, require_permission, AuthState, RequiredPermission};
use crate::repositories::DrinkRepository;
use axum::{
    middleware,
    response::Response,
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Permission required by `GET /drinks-detail`.
pub const PERMISSION_GET_DRINKS_DETAIL: &str = "get:drinks-detail";

/// Permission required by `POST /drinks`.
pub const PERMISSION_POST_DRINKS: &str = "post:drinks";

/// Permission required by `PATCH /drinks/{id}`.
pub const PERMISSION_PATCH_DRINKS: &str = "patch:drinks";

/// Permission required by `DELETE /drinks/{id}`.
pub const PERMISSION_DELETE_DRINKS: &str = "delete:drinks";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Storage handle.
    pub repo: Arc<dyn DrinkRepository>,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `GET /health` - health check (public)
/// - `GET /drinks` - short-form listing (public)
/// - `GET /drinks-detail` - long-form listing (`get:drinks-detail`)
/// - `POST /drinks` - create (`post:drinks`)
/// - `PATCH /drinks/:id` - update (`patch:drinks`)
/// - `DELETE /drinks/:id` - delete (`delete:drinks`)
/// - TraceLayer for request logging
/// - 30 second request timeout
/// - a response-shaping layer so framework-generated failures carry the
///   canonical JSON error body
pub fn build_routes(state: Arc<AppState>) -> Router {
    // Create JWKS client and token verifier
    let jwks_client = Arc::new(JwksClient::new(
        state.config.jwks_url.clone(),
        Duration::from_secs(state.config.jwks_cache_ttl_seconds),
    ));
    let verifier = Arc::new(TokenVerifier::new(
        jwks_client,
        state.config.auth_audience.clone(),
        state.config.issuer(),
    ));
    let auth_state = Arc::new(AuthState { verifier });

    Router::new()
        // Health check endpoint (public)
        .route("/health", get(handlers::health_check))
        // Public short-form listing; POST on the same path is gated
        .route(
            "/drinks",
            get(handlers::list_drinks).merge(gated(
                post(handlers::create_drink),
                PERMISSION_POST_DRINKS,
                &auth_state,
            )),
        )
        // Long-form listing
        .route(
            "/drinks-detail",
            gated(
                get(handlers::list_drinks_detail),
                PERMISSION_GET_DRINKS_DETAIL,
                &auth_state,
            ),
        )
        // Update and delete, each gated on its own permission
        .route(
            "/drinks/:id",
            gated(
                patch(handlers::update_drink),
                PERMISSION_PATCH_DRINKS,
                &auth_state,
            )
            .merge(gated(
                delete(handlers::delete_drink),
                PERMISSION_DELETE_DRINKS,
                &auth_state,
            )),
        )
        // Unknown paths get the canonical 404 body
        .fallback(not_found)
        .with_state(state)
        // Layer order (bottom-to-top execution):
        // 1. TimeoutLayer - Timeout the request (innermost)
        // 2. TraceLayer - Log request details
        // 3. shape_error_response - reshape framework errors (outermost)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::map_response(shape_error_response))
}

/// Gate a method router behind the auth and permission stages.
///
/// The permission layer is added first so the auth layer wraps it and runs
/// first: extract + verify, then enforce.
fn gated(
    method_router: MethodRouter<Arc<AppState>>,
    permission: &'static str,
    auth_state: &Arc<AuthState>,
) -> MethodRouter<Arc<AppState>> {
    method_router
        .route_layer(middleware::from_fn_with_state(
            RequiredPermission(permission),
            require_permission,
        ))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            require_auth,
        ))
}

/// Fallback for unmatched paths.
async fn not_found() -> Response {
    errors::response_for_status(axum::http::StatusCode::NOT_FOUND)
}

/// Reshape error responses that did not come from `ApiError`.
///
/// Method mismatches, extractor rejections, and timeouts are produced by
/// the framework with plain-text bodies; every error leaving the service
/// must carry the canonical JSON body instead.
async fn shape_error_response(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));

    if is_json {
        // Already shaped by the error path
        return response;
    }

    errors::response_for_status(status)
}

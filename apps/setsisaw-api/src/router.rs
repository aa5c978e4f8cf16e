//! Router construction.

use crate::handlers::{
    authcheck_handler, current_user_handler, refresh_handler, signin_handler, signup_handler,
};
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Preflight cache lifetime.
const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// Build the application router with CORS and request tracing.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/signin", post(signin_handler))
        .route("/refresh", get(refresh_handler))
        .route("/authcheck", get(authcheck_handler))
        .route("/user/current", get(current_user_handler))
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: any origin, no credentials.
pub fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::PUT,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_LENGTH,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
        .max_age(CORS_MAX_AGE)
}

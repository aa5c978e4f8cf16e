//! Integration tests for CORS configuration.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use setsisaw_api::{app_router, AppState};
use setsisaw_auth::{InMemoryCredentialStore, SessionConfig, SessionManager, SigningSecret};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    let sessions = SessionManager::new(
        SigningSecret::new("cors-test-secret").unwrap(),
        SessionConfig::default(),
        Arc::new(InMemoryCredentialStore::new()),
    );
    app_router(AppState::new(sessions))
}

#[tokio::test]
async fn test_cors_preflight_any_origin() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/signin")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap()
            .to_str()
            .unwrap(),
        "*"
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_MAX_AGE)
            .unwrap()
            .to_str()
            .unwrap(),
        "43200"
    );

    let methods = headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    for method in ["POST", "GET", "PUT", "DELETE", "HEAD", "OPTIONS"] {
        assert!(methods.contains(method), "{method} missing from {methods}");
    }

    let allowed_headers = headers
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap()
        .to_lowercase();
    for name in ["origin", "content-length", "content-type", "authorization"] {
        assert!(allowed_headers.contains(name), "{name} missing");
    }

    // Credentials are never allowed alongside a wildcard origin
    assert!(headers
        .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
        .is_none());
}

#[tokio::test]
async fn test_cors_simple_request_gets_origin_header() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/authcheck")
                .header(header::ORIGIN, "http://example.org")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Unauthenticated, but CORS headers are still present
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap()
            .to_str()
            .unwrap(),
        "*"
    );
}

//! Integration tests for authentication and RBAC enforcement.
//!
//! These run against the real router and middleware stack but never reach
//! the database: every request is rejected by the auth or RBAC extractor
//! first, so a lazily-created pool pointed at nothing is sufficient.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, send, send_as};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: requests without a token are rejected with 401
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_returns_401() {
    let app = build_test_app();
    let response = send(app, "POST", "/api/v1/estimates/1/approve").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

// ---------------------------------------------------------------------------
// Test: a malformed Authorization header is rejected with 401
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_authorization_header_returns_401() {
    let app = build_test_app();
    let response = app
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/v1/estimates/1/approve")
                .header("authorization", "Token abc123")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Test: a garbage bearer token is rejected with 401
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_token_returns_401() {
    let app = build_test_app();
    let response = app
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/v1/estimates/1/approve")
                .header("authorization", "Bearer not-a-jwt")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

// ---------------------------------------------------------------------------
// Test: non-managers cannot approve
// ---------------------------------------------------------------------------

#[tokio::test]
async fn estimator_cannot_approve() {
    let app = build_test_app();
    let response = send_as(app, "POST", "/api/v1/estimates/1/approve", 7, "estimator").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], "Manager role required");
}

#[tokio::test]
async fn crew_cannot_reject() {
    let app = build_test_app();
    let response = send_as(app, "POST", "/api/v1/estimates/1/reject", 8, "crew").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

// ---------------------------------------------------------------------------
// Test: non-managers cannot set a price override
// ---------------------------------------------------------------------------

#[tokio::test]
async fn estimator_cannot_set_price_override() {
    let app = build_test_app();
    let response = send_as(
        app,
        "PUT",
        "/api/v1/measurements/1/price-override",
        7,
        "estimator",
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], "Manager role required");
}

// ---------------------------------------------------------------------------
// Test: unknown routes return 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = send(app, "GET", "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: /health responds even when the database is unreachable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = build_test_app();
    let response = send(app, "GET", "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert!(json["version"].is_string());
}

//! Authentication integration tests.
//!
//! Tests verify:
//! - Missing and invalid keys are rejected with 401 and a JSON body
//! - X-API-Key, Bearer and raw Authorization credentials are accepted
//! - Disabled mode accepts any key but still requires one
//! - Authentication runs before parameter validation

use axum::http::StatusCode;
use serde_json::json;

use qr_service::{create_router, QrService, RouterConfig};

use super::test_utils::{body_json, get, TEST_API_KEY};

const QR_URI: &str = "/v1/qr?data=hello";

fn router() -> axum::Router {
    create_router(QrService::new(), RouterConfig::new(TEST_API_KEY))
}

// =============================================================================
// Rejection
// =============================================================================

#[tokio::test]
async fn test_missing_key_rejected() {
    let router = router();

    let response = get(&router, QR_URI, &[]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(
        body_json(response).await,
        json!({
            "error": "API key is required",
            "message": "Please provide an API key in the X-API-Key header or Authorization header"
        })
    );
}

#[tokio::test]
async fn test_wrong_key_rejected() {
    let router = router();

    let response = get(&router, QR_URI, &[("x-api-key", "wrong-key")]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(
        body_json(response).await,
        json!({
            "error": "Invalid API key",
            "message": "The provided API key is invalid"
        })
    );
}

#[tokio::test]
async fn test_wrong_bearer_rejected() {
    let router = router();

    let response = get(&router, QR_URI, &[("authorization", "Bearer nope")]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_key_prefix_rejected() {
    let router = router();

    let response = get(&router, QR_URI, &[("x-api-key", "test-api")]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_checked_before_validation() {
    let router = router();

    // Invalid parameters, but the missing key wins
    let response = get(&router, "/v1/qr?margin=99", &[]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rejection_has_no_cache_headers() {
    let router = router();

    let response = get(&router, QR_URI, &[("x-api-key", "wrong-key")]).await;
    assert!(!response.headers().contains_key("etag"));
    assert!(!response.headers().contains_key("cache-control"));
}

// =============================================================================
// Accepted Credentials
// =============================================================================

#[tokio::test]
async fn test_x_api_key_accepted() {
    let router = router();

    let response = get(&router, QR_URI, &[("x-api-key", TEST_API_KEY)]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let router = router();
    let header = format!("Bearer {}", TEST_API_KEY);

    let response = get(&router, QR_URI, &[("authorization", &header)]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_raw_authorization_accepted() {
    let router = router();

    let response = get(&router, QR_URI, &[("authorization", TEST_API_KEY)]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_x_api_key_takes_precedence() {
    let router = router();
    let bearer = format!("Bearer {}", TEST_API_KEY);

    let response = get(
        &router,
        QR_URI,
        &[("x-api-key", "wrong-key"), ("authorization", &bearer)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_x_api_key_falls_back_to_authorization() {
    let router = router();
    let bearer = format!("Bearer {}", TEST_API_KEY);

    let response = get(&router, QR_URI, &[("x-api-key", ""), ("authorization", &bearer)]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_check_needs_no_key() {
    let router = router();

    let response = get(&router, "/healthz", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Disabled Mode
// =============================================================================

#[tokio::test]
async fn test_disabled_mode_accepts_any_key() {
    let router = create_router(QrService::new(), RouterConfig::without_auth());

    let response = get(&router, QR_URI, &[("x-api-key", "whatever")]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&router, QR_URI, &[("authorization", "Bearer anything")]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_disabled_mode_still_requires_a_key() {
    let router = create_router(QrService::new(), RouterConfig::without_auth());

    let response = get(&router, QR_URI, &[]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = body_json(response).await;
    assert_eq!(error["error"], "API key is required");
}

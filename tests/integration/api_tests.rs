//! API integration tests for QR generation and error handling.
//!
//! Tests verify:
//! - Successful generation with headers and SVG body
//! - Validation errors (missing data, bad margin, bad ecc/version)
//! - Encoder failures map to a generic 500
//! - Health check

use axum::http::StatusCode;

use qr_service::{create_router, QrService, RouterConfig};

use super::test_utils::{
    body_json, body_string, etag, get, get_authed, is_svg, FailingEncoder, FAILURE_DETAIL,
    TEST_API_KEY,
};

fn router() -> axum::Router {
    create_router(QrService::new(), RouterConfig::new(TEST_API_KEY))
}

// =============================================================================
// Successful Generation
// =============================================================================

#[tokio::test]
async fn test_generate_qr_success() {
    let router = router();

    let response = get_authed(&router, "/v1/qr?data=https://example.com&margin=4").await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/svg+xml"
    );
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=31536000, immutable"
    );

    let tag = etag(&response);
    assert!(tag.starts_with('"') && tag.ends_with('"'));
    assert_eq!(tag.len(), 66);

    let body = body_string(response).await;
    assert!(is_svg(&body), "Response should be an SVG document");
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let router = router();
    let uri = "/v1/qr?data=https%3A%2F%2Fexample.com&margin=4";

    let first = get_authed(&router, uri).await;
    let second = get_authed(&router, uri).await;

    assert_eq!(etag(&first), etag(&second));
    assert_eq!(body_string(first).await, body_string(second).await);
}

#[tokio::test]
async fn test_default_margin_matches_explicit_four() {
    let router = router();

    let implicit = get_authed(&router, "/v1/qr?data=hello").await;
    let explicit = get_authed(&router, "/v1/qr?data=hello&margin=4").await;

    assert_eq!(etag(&implicit), etag(&explicit));
    assert_eq!(body_string(implicit).await, body_string(explicit).await);
}

#[tokio::test]
async fn test_margin_changes_etag_and_image() {
    let router = router();

    let narrow = get_authed(&router, "/v1/qr?data=hello&margin=0").await;
    let wide = get_authed(&router, "/v1/qr?data=hello&margin=10").await;

    assert_ne!(etag(&narrow), etag(&wide));
    assert_ne!(body_string(narrow).await, body_string(wide).await);
}

#[tokio::test]
async fn test_parameter_order_does_not_change_etag() {
    let router = router();

    let a = get_authed(&router, "/v1/qr?data=hello&margin=2&ecc=Q").await;
    let b = get_authed(&router, "/v1/qr?ecc=Q&margin=2&data=hello").await;

    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(etag(&a), etag(&b));
}

#[tokio::test]
async fn test_optional_ecc_and_version() {
    let router = router();

    let response = get_authed(&router, "/v1/qr?data=hello&ecc=H&version=3&margin=0").await;
    assert_eq!(response.status(), StatusCode::OK);

    // Version 3 is 29x29 modules
    let body = body_string(response).await;
    assert!(body.contains("viewBox=\"0 0 29 29\""));
}

// =============================================================================
// Validation Errors
// =============================================================================

#[tokio::test]
async fn test_missing_data_rejected() {
    let router = router();

    let response = get_authed(&router, "/v1/qr").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error = body_json(response).await;
    assert_eq!(
        error,
        serde_json::json!({ "error": "Missing required parameter: data" })
    );
}

#[tokio::test]
async fn test_empty_data_rejected() {
    let router = router();

    let response = get_authed(&router, "/v1/qr?data=").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_data_rejected_with_auth_disabled() {
    let router = create_router(QrService::new(), RouterConfig::without_auth());

    let response = get(&router, "/v1/qr?data=", &[("x-api-key", "anything")]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_utf8_data_rejected() {
    let router = router();

    for uri in ["/v1/qr?data=%FF", "/v1/qr?data=%FE"] {
        let response = get_authed(&router, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert!(!response.headers().contains_key("etag"));

        let error = body_json(response).await;
        assert_eq!(
            error,
            serde_json::json!({ "error": "Invalid data parameter. Must be valid UTF-8 text." })
        );
    }
}

#[tokio::test]
async fn test_invalid_margin_rejected() {
    let router = router();

    for margin in ["11", "abc", "-1", ""] {
        let uri = format!("/v1/qr?data=hello&margin={}", margin);
        let response = get_authed(&router, &uri).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "margin={:?} should be rejected",
            margin
        );

        let error = body_json(response).await;
        assert_eq!(
            error["error"],
            "Invalid margin parameter. Must be a number between 0 and 10."
        );
    }
}

#[tokio::test]
async fn test_invalid_ecc_and_version_rejected() {
    let router = router();

    let response = get_authed(&router, "/v1/qr?data=hello&ecc=X").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_authed(&router, "/v1/qr?data=hello&version=41").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validation_errors_have_no_cache_headers() {
    let router = router();

    let response = get_authed(&router, "/v1/qr?data=hello&margin=11").await;
    assert!(!response.headers().contains_key("etag"));
    assert!(!response.headers().contains_key("cache-control"));
}

// =============================================================================
// Encoding Errors
// =============================================================================

#[tokio::test]
async fn test_encoder_failure_returns_generic_500() {
    let router = create_router(
        QrService::with_encoder(FailingEncoder),
        RouterConfig::new(TEST_API_KEY),
    );

    let response = get_authed(&router, "/v1/qr?data=hello").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_string(response).await;
    assert!(!body.contains(FAILURE_DETAIL));

    let error: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error, serde_json::json!({ "error": "Failed to generate QR code" }));
}

#[tokio::test]
async fn test_data_too_long_for_version_returns_500() {
    let router = router();
    let uri = format!("/v1/qr?data={}&version=1", "x".repeat(200));

    let response = get_authed(&router, &uri).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Health Check
// =============================================================================

#[tokio::test]
async fn test_health_check_is_public() {
    let router = router();

    let response = get(&router, "/healthz", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let router = router();

    let response = get(&router, "/v2/qr?data=hello", &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

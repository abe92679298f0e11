//! CORS integration tests.
//!
//! Tests verify:
//! - Browser GETs can read the ETag
//! - Preflights succeed without an API key and allow the credential headers
//! - Configured origin lists are honored

use axum::http::{Method, StatusCode};

use qr_service::{create_router, QrService, RouterConfig};

use super::test_utils::{body_string, get, header, send, TEST_API_KEY};

const QR_URI: &str = "/v1/qr?data=hello";
const ORIGIN: &str = "https://app.example.com";

fn router() -> axum::Router {
    create_router(QrService::new(), RouterConfig::new(TEST_API_KEY))
}

async fn preflight(router: &axum::Router, origin: &str) -> axum::http::Response<axum::body::Body> {
    send(
        router,
        Method::OPTIONS,
        QR_URI,
        &[
            ("origin", origin),
            ("access-control-request-method", "GET"),
            ("access-control-request-headers", "x-api-key,if-none-match"),
        ],
    )
    .await
}

// =============================================================================
// Simple Requests
// =============================================================================

#[tokio::test]
async fn test_get_exposes_etag() {
    let router = router();

    let response = get(
        &router,
        QR_URI,
        &[("origin", ORIGIN), ("x-api-key", TEST_API_KEY)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        header(&response, "access-control-allow-origin").as_deref(),
        Some("*")
    );
    let exposed = header(&response, "access-control-expose-headers").unwrap();
    assert!(exposed.to_ascii_lowercase().contains("etag"));
}

#[tokio::test]
async fn test_rejected_request_still_carries_cors_headers() {
    let router = router();

    let response = get(&router, QR_URI, &[("origin", ORIGIN)]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(header(&response, "access-control-allow-origin").is_some());
}

// =============================================================================
// Preflight
// =============================================================================

#[tokio::test]
async fn test_preflight_needs_no_api_key() {
    let router = router();

    let response = preflight(&router, ORIGIN).await;
    assert_eq!(response.status(), StatusCode::OK);

    let allowed = header(&response, "access-control-allow-headers")
        .unwrap()
        .to_ascii_lowercase();
    for name in ["authorization", "x-api-key", "if-none-match"] {
        assert!(allowed.contains(name), "{} missing from {}", name, allowed);
    }

    let methods = header(&response, "access-control-allow-methods").unwrap();
    assert!(methods.contains("GET"));

    assert!(body_string(response).await.is_empty());
}

// =============================================================================
// Origin Allow-List
// =============================================================================

#[tokio::test]
async fn test_configured_origin_allowed() {
    let router = create_router(
        QrService::new(),
        RouterConfig::new(TEST_API_KEY).with_cors_origins(vec![ORIGIN.to_string()]),
    );

    let response = preflight(&router, ORIGIN).await;
    assert_eq!(
        header(&response, "access-control-allow-origin").as_deref(),
        Some(ORIGIN)
    );
}

#[tokio::test]
async fn test_unlisted_origin_not_allowed() {
    let router = create_router(
        QrService::new(),
        RouterConfig::new(TEST_API_KEY).with_cors_origins(vec![ORIGIN.to_string()]),
    );

    let response = get(
        &router,
        QR_URI,
        &[("origin", "https://evil.example"), ("x-api-key", TEST_API_KEY)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header(&response, "access-control-allow-origin").is_none());
}

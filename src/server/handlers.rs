//! HTTP request handlers for the QR API.
//!
//! # Endpoints
//!
//! - `GET /v1/qr?data=...&margin=...` - Render a QR code as SVG
//! - `GET /healthz` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::GenerationError;
use crate::qr::{CacheFingerprint, Generation, QrService, SymbolEncoder, SVG_CONTENT_TYPE};

/// Default Cache-Control max-age in seconds (one year).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 31_536_000;

/// Message returned for every encoding failure.
const GENERATION_FAILED: &str = "Failed to generate QR code";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the QR service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<E: SymbolEncoder> {
    /// The service running the generation pipeline
    pub qr_service: Arc<QrService<E>>,

    /// Cache-Control max-age in seconds sent with images
    pub cache_max_age: u32,
}

impl<E: SymbolEncoder> AppState<E> {
    /// Create a new application state with the default one-year max-age.
    pub fn new(qr_service: QrService<E>) -> Self {
        Self::with_cache_max_age(qr_service, DEFAULT_CACHE_MAX_AGE)
    }

    /// Create a new application state with custom cache max-age.
    pub fn with_cache_max_age(qr_service: QrService<E>, cache_max_age: u32) -> Self {
        Self {
            qr_service: Arc::new(qr_service),
            cache_max_age,
        }
    }

    /// Value of the Cache-Control header for generated images.
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}, immutable", self.cache_max_age)
    }
}

impl<E: SymbolEncoder> Clone for AppState<E> {
    fn clone(&self) -> Self {
        Self {
            qr_service: Arc::clone(&self.qr_service),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error summary
    pub error: String,

    /// Human-readable detail, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Create an error response with only an `error` field.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    /// Create an error response with an additional message.
    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert GenerationError to HTTP response.
///
/// Validation failures become 400 with the validator's message. Encoding
/// failures become 500 with a fixed message; the cause is only logged.
impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        match self {
            GenerationError::Validation(err) => {
                let status = StatusCode::BAD_REQUEST;
                warn!(
                    field = err.field(),
                    status = status.as_u16(),
                    "Client error: {}",
                    err
                );
                (status, Json(ErrorResponse::new(err.to_string()))).into_response()
            }
            GenerationError::Encoding(err) => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                error!(status = status.as_u16(), "Server error: {}", err);
                (status, Json(ErrorResponse::new(GENERATION_FAILED))).into_response()
            }
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle QR code requests.
///
/// # Endpoint
///
/// `GET /v1/qr`
///
/// # Query Parameters
///
/// - `data`: Text to encode (required, non-empty)
/// - `margin`: Quiet zone width 0-10 (default: 4)
/// - `ecc`: Error correction level `L`, `M`, `Q` or `H` (default: `M`)
/// - `version`: Fixed symbol version 1-40 (default: smallest that fits)
///
/// # Response
///
/// - `200 OK`: SVG image with `Content-Type: image/svg+xml`
/// - `304 Not Modified`: `If-None-Match` matched the current ETag
/// - `400 Bad Request`: Missing or invalid parameter
/// - `500 Internal Server Error`: Encoding failed
///
/// # Headers
///
/// - `ETag: "<sha256-hex>"`
/// - `Cache-Control: public, max-age={cache_max_age}, immutable`
pub async fn qr_handler<E: SymbolEncoder>(
    State(state): State<AppState<E>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response, GenerationError> {
    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok());

    let generation = state
        .qr_service
        .generate(query.as_deref(), if_none_match)
        .await?;

    let response = match generation {
        Generation::NotModified { fingerprint } => {
            debug!(fingerprint = %fingerprint, "Not modified");
            (StatusCode::NOT_MODIFIED, cache_headers(&state, &fingerprint)).into_response()
        }
        Generation::Generated { fingerprint, image } => {
            debug!(fingerprint = %fingerprint, bytes = image.len(), "Generated QR code");
            (
                StatusCode::OK,
                cache_headers(&state, &fingerprint),
                [(header::CONTENT_TYPE, SVG_CONTENT_TYPE)],
                image,
            )
                .into_response()
        }
    };

    Ok(response)
}

/// ETag and Cache-Control, sent with both 200 and 304 responses.
fn cache_headers<E: SymbolEncoder>(
    state: &AppState<E>,
    fingerprint: &CacheFingerprint,
) -> [(HeaderName, String); 2] {
    [
        (header::ETAG, fingerprint.etag()),
        (header::CACHE_CONTROL, state.cache_control()),
    ]
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /healthz`
///
/// # Response
///
/// `200 OK` with `text/plain` body `ok`.
pub async fn health_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "ok")
}

// =============================================================================
// Tests
// =============================================================================

//! # QR Service
//!
//! An HTTP service that renders arbitrary text into scannable SVG QR codes.
//!
//! Every image is a pure function of its query parameters, so responses carry
//! a deterministic `ETag` and long-lived cache directives. Clients that send
//! the ETag back in `If-None-Match` get a `304` without any encoding work.
//!
//! ## Features
//!
//! - **SVG output**: Configurable quiet zone, error correction level and version
//! - **Deterministic ETags**: SHA-256 over the canonicalized parameters
//! - **Conditional requests**: `If-None-Match` short-circuits before encoding
//! - **Authentication**: API key via `X-API-Key` or `Authorization: Bearer`
//!
//! ## Architecture
//!
//! - [`qr`] - Request validation, fingerprints and SVG encoding
//! - [`server`] - Axum-based HTTP server, auth middleware and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use qr_service::{create_router, QrService, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = create_router(QrService::new(), RouterConfig::new("my-api-key"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod qr;
pub mod server;

// Re-export commonly used types
pub use config::{Cli, Command, RenderConfig, ServeConfig};
pub use error::{EncodeError, GenerationError, ValidationError};
pub use qr::{
    canonical_query, resolve_freshness, CacheFingerprint, EncodeOptions, ErrorCorrection,
    Freshness, Generation, GenerationRequest, QrService, SvgQrEncoder, SymbolEncoder,
    DEFAULT_MARGIN, MAX_MARGIN, MAX_VERSION, MIN_MARGIN, MIN_VERSION, SVG_CONTENT_TYPE,
};
pub use server::{
    auth_middleware, create_router, health_handler, qr_handler, ApiKeyAuth, AppState, AuthConfig,
    AuthContext, AuthError, AuthOutcome, ErrorResponse, RouterConfig, API_KEY_HEADER,
    DEFAULT_CACHE_MAX_AGE,
};

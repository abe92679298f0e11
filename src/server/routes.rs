//! Router configuration for the QR service.
//!
//! This module defines the HTTP routes and applies middleware for
//! authentication, CORS and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /healthz            - Health check (public)
//! /v1/qr              - QR code endpoint (API key required)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use qr_service::qr::QrService;
//! use qr_service::server::routes::{create_router, RouterConfig};
//!
//! let config = RouterConfig::new("my-secret-key")
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(QrService::new(), config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{middleware, routing::get, Router};
use http::header::{AUTHORIZATION, CONTENT_TYPE, ETAG, IF_NONE_MATCH};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, ApiKeyAuth, AuthConfig, API_KEY_HEADER};
use super::handlers::{health_handler, qr_handler, AppState, DEFAULT_CACHE_MAX_AGE};
use crate::qr::{QrService, SymbolEncoder};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// API key authentication settings
    pub auth: AuthConfig,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Cache-Control max-age in seconds
    pub cache_max_age: u32,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration enforcing the given API key.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Cache max-age is one year (31536000 seconds)
    /// - Tracing is enabled
    pub fn new(api_key: impl AsRef<str>) -> Self {
        Self::with_auth(AuthConfig::enforced(api_key))
    }

    /// Create a configuration with authentication disabled.
    ///
    /// **Warning**: This should only be used for development/testing.
    pub fn without_auth() -> Self {
        Self::with_auth(AuthConfig::disabled())
    }

    /// Create a configuration from explicit auth settings.
    pub fn with_auth(auth: AuthConfig) -> Self {
        Self {
            auth,
            cors_origins: None, // Allow any origin by default
            cache_max_age: DEFAULT_CACHE_MAX_AGE,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set the Cache-Control max-age in seconds.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Public routes (health check)
/// - Versioned API routes behind API key authentication
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router<E: SymbolEncoder>(qr_service: QrService<E>, config: RouterConfig) -> Router {
    let app_state = AppState::with_cache_max_age(qr_service, config.cache_max_age);
    let auth = ApiKeyAuth::new(config.auth.clone());
    let cors = build_cors_layer(&config);

    // Auth only wraps the versioned API; health checks stay public
    let v1_routes = Router::new()
        .route("/qr", get(qr_handler::<E>))
        .with_state(app_state)
        .layer(middleware::from_fn_with_state(auth, auth_middleware));

    let router = Router::new()
        .nest("/v1", v1_routes)
        .route("/healthz", get(health_handler))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, IF_NONE_MATCH, API_KEY_HEADER])
        .expose_headers([ETAG])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

//! HTTP server layer for the QR service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                      GET /v1/qr?data=...                        │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │  (API key)  │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{
    auth_middleware, ApiKeyAuth, AuthConfig, AuthContext, AuthError, AuthOutcome, API_KEY_HEADER,
};
pub use handlers::{health_handler, qr_handler, AppState, ErrorResponse, DEFAULT_CACHE_MAX_AGE};
pub use routes::{create_router, RouterConfig};

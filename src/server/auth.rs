//! API key authentication for the QR service.
//!
//! Clients present a shared secret in one of two headers:
//!
//! ```text
//! X-API-Key: <token>
//! Authorization: Bearer <token>      (or a raw token without prefix)
//! ```
//!
//! `X-API-Key` takes precedence. When a header is repeated, its first value
//! is used. The `Bearer ` prefix is only recognized on `Authorization` and
//! its scheme name is matched case-insensitively.
//!
//! # Modes
//!
//! The expected secret is read once at startup into an [`AuthConfig`]:
//!
//! - **Enforced**: the credential must equal the secret (constant-time
//!   comparison).
//! - **Disabled**: no secret configured. A credential must still be present,
//!   but any value is accepted. This is a development convenience and is
//!   logged as such; it is not a security boundary.
//!
//! # Example
//!
//! ```rust
//! use axum::http::HeaderMap;
//! use qr_service::server::auth::{ApiKeyAuth, AuthConfig, AuthOutcome};
//!
//! let auth = ApiKeyAuth::new(AuthConfig::enforced("my-secret"));
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("authorization", "Bearer my-secret".parse().unwrap());
//!
//! assert!(matches!(auth.authenticate(&headers), AuthOutcome::Authorized(_)));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderName, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::handlers::ErrorResponse;

/// Primary credential header.
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Prefix stripped from `Authorization` values (compared case-insensitively).
const BEARER_PREFIX: &str = "Bearer ";

static DISABLED_NOTICE: AtomicBool = AtomicBool::new(false);

// =============================================================================
// Configuration
// =============================================================================

/// Process-wide authentication settings, fixed at startup.
#[derive(Clone)]
pub enum AuthConfig {
    /// Credentials must match this secret
    Enforced { secret: Arc<str> },

    /// No secret configured; any presented credential is accepted
    Disabled,
}

impl AuthConfig {
    /// Require the given secret.
    pub fn enforced(secret: impl AsRef<str>) -> Self {
        AuthConfig::Enforced {
            secret: Arc::from(secret.as_ref()),
        }
    }

    /// Accept any presented credential.
    ///
    /// **Warning**: This should only be used for development/testing.
    pub fn disabled() -> Self {
        AuthConfig::Disabled
    }

    /// Build from an optional configured secret. `None` and the empty string
    /// both disable enforcement.
    pub fn from_secret(secret: Option<&str>) -> Self {
        match secret {
            Some(secret) if !secret.is_empty() => Self::enforced(secret),
            _ => Self::disabled(),
        }
    }

    /// Whether credentials are checked against a secret.
    pub fn is_enforced(&self) -> bool {
        matches!(self, AuthConfig::Enforced { .. })
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthConfig::Enforced { .. } => f
                .debug_struct("Enforced")
                .field("secret", &"<redacted>")
                .finish(),
            AuthConfig::Disabled => f.write_str("Disabled"),
        }
    }
}

// =============================================================================
// Outcomes and Errors
// =============================================================================

/// Authentication error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Neither header carried a credential
    MissingApiKey,

    /// The credential does not match the configured secret
    InvalidApiKey,
}

impl AuthError {
    /// Machine-readable reason: `"missing"` or `"invalid"`.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingApiKey => "missing",
            AuthError::InvalidApiKey => "invalid",
        }
    }

    /// Human-readable hint sent alongside the error.
    pub fn hint(&self) -> &'static str {
        match self {
            AuthError::MissingApiKey => {
                "Please provide an API key in the X-API-Key header or Authorization header"
            }
            AuthError::InvalidApiKey => "The provided API key is invalid",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingApiKey => write!(f, "API key is required"),
            AuthError::InvalidApiKey => write!(f, "Invalid API key"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;

        match &self {
            AuthError::InvalidApiKey => warn!(
                reason = self.reason(),
                status = status.as_u16(),
                "Authentication failed: {}",
                self
            ),
            AuthError::MissingApiKey => debug!(
                reason = self.reason(),
                status = status.as_u16(),
                "Authentication failed: {}",
                self
            ),
        }

        let body = ErrorResponse::with_message(self.to_string(), self.hint());
        (status, Json(body)).into_response()
    }
}

/// Result of inspecting a request's credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credential matched the configured secret
    Authorized(String),

    /// Enforcement is off; the credential was not checked
    Disabled(String),

    /// Request must be answered with 401
    Rejected(AuthError),
}

impl AuthOutcome {
    /// Convert into the request context, or the error to respond with.
    pub fn into_context(self) -> Result<AuthContext, AuthError> {
        match self {
            AuthOutcome::Authorized(credential) => Ok(AuthContext {
                credential,
                verified: true,
            }),
            AuthOutcome::Disabled(credential) => Ok(AuthContext {
                credential,
                verified: false,
            }),
            AuthOutcome::Rejected(err) => Err(err),
        }
    }
}

/// Credential attached to request extensions after authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Normalized credential the client presented
    pub credential: String,

    /// `false` when enforcement is disabled
    pub verified: bool,
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("credential", &"<redacted>")
            .field("verified", &self.verified)
            .finish()
    }
}

// =============================================================================
// API Key Authentication
// =============================================================================

/// API key authenticator.
///
/// Pure with respect to its configuration: the outcome depends only on the
/// headers passed in and the [`AuthConfig`] it was built with.
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    config: AuthConfig,
}

impl ApiKeyAuth {
    /// Create an authenticator with the given configuration.
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Resolve the authentication outcome for a set of request headers.
    pub fn authenticate(&self, headers: &HeaderMap) -> AuthOutcome {
        let credential = match extract_credential(headers) {
            Some(credential) => credential,
            None => return AuthOutcome::Rejected(AuthError::MissingApiKey),
        };

        match &self.config {
            AuthConfig::Disabled => {
                warn_disabled_once();
                AuthOutcome::Disabled(credential)
            }
            AuthConfig::Enforced { secret } => {
                if credential.as_bytes().ct_eq(secret.as_bytes()).into() {
                    AuthOutcome::Authorized(credential)
                } else {
                    AuthOutcome::Rejected(AuthError::InvalidApiKey)
                }
            }
        }
    }
}

/// Emit the disabled-mode warning the first time it is reached in this
/// process. Returns whether this call emitted it.
fn warn_disabled_once() -> bool {
    if DISABLED_NOTICE.swap(true, Ordering::Relaxed) {
        return false;
    }
    warn!("No API key configured - authentication disabled, accepting any key");
    true
}

/// Pull the credential out of the headers, normalized to one string.
///
/// Empty header values count as absent.
pub fn extract_credential(headers: &HeaderMap) -> Option<String> {
    if let Some(key) = first_value(headers, &API_KEY_HEADER) {
        return Some(key);
    }

    first_value(headers, &AUTHORIZATION)
        .map(|value| strip_bearer(&value).to_string())
        .filter(|token| !token.is_empty())
}

fn first_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .filter(|value| !value.is_empty())
}

fn strip_bearer(value: &str) -> &str {
    match value.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            &value[BEARER_PREFIX.len()..]
        }
        _ => value,
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware enforcing API key authentication.
///
/// Rejected requests get a 401 JSON body; accepted ones carry an
/// [`AuthContext`] in their extensions.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware, routing::get};
/// use qr_service::server::auth::{ApiKeyAuth, AuthConfig, auth_middleware};
///
/// let auth = ApiKeyAuth::new(AuthConfig::enforced("secret-key"));
/// let app = Router::new()
///     .route("/qr", get(qr_handler))
///     .layer(middleware::from_fn_with_state(auth, auth_middleware));
/// ```
pub async fn auth_middleware(
    State(auth): State<ApiKeyAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let context = auth.authenticate(request.headers()).into_context()?;
    debug!(verified = context.verified, "Request authenticated");
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================

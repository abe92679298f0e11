//! QR service orchestrating a generation request.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         QrService                             │
//! │                                                               │
//! │  raw query ──▶ validate ──▶ fingerprint ──▶ If-None-Match ?   │
//! │                   │                             │       │     │
//! │                 400                          match   mismatch │
//! │                                                 │       │     │
//! │                                               304    encode   │
//! │                                                      │    │   │
//! │                                                    200  500   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Authentication happens before the service is reached. Nothing here is
//! retried and nothing is cached server-side: only the fingerprint is reused,
//! by clients, through conditional requests.

use std::sync::Arc;

use tracing::debug;

use crate::error::{EncodeError, GenerationError};

use super::encoder::{SvgQrEncoder, SymbolEncoder};
use super::fingerprint::{resolve_freshness, CacheFingerprint, Freshness};
use super::request::GenerationRequest;

/// Result of a successful pass through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// The client's validator matched; no image was produced
    NotModified { fingerprint: CacheFingerprint },

    /// A freshly encoded image
    Generated {
        fingerprint: CacheFingerprint,
        image: String,
    },
}

impl Generation {
    /// Fingerprint of the requested image.
    pub fn fingerprint(&self) -> &CacheFingerprint {
        match self {
            Generation::NotModified { fingerprint } => fingerprint,
            Generation::Generated { fingerprint, .. } => fingerprint,
        }
    }
}

/// Service turning query strings into QR images.
///
/// # Type Parameters
///
/// * `E` - The symbol encoder (defaults to [`SvgQrEncoder`])
///
/// # Example
///
/// ```
/// use qr_service::qr::{Generation, QrService};
///
/// #[tokio::main]
/// async fn main() {
///     let service = QrService::new();
///
///     let first = service.generate(Some("data=hello"), None).await.unwrap();
///     let etag = first.fingerprint().etag();
///
///     let second = service.generate(Some("data=hello"), Some(&etag)).await.unwrap();
///     assert!(matches!(second, Generation::NotModified { .. }));
/// }
/// ```
pub struct QrService<E: SymbolEncoder = SvgQrEncoder> {
    encoder: Arc<E>,
}

impl QrService<SvgQrEncoder> {
    /// Create a service backed by the SVG encoder.
    pub fn new() -> Self {
        Self::with_encoder(SvgQrEncoder::new())
    }
}

impl Default for QrService<SvgQrEncoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SymbolEncoder> QrService<E> {
    /// Create a service backed by the given encoder.
    pub fn with_encoder(encoder: E) -> Self {
        Self {
            encoder: Arc::new(encoder),
        }
    }

    /// Get a reference to the encoder.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Run the full pipeline for a raw query string.
    ///
    /// `if_none_match` is the client's `If-None-Match` header value, if any.
    pub async fn generate(
        &self,
        query: Option<&str>,
        if_none_match: Option<&str>,
    ) -> Result<Generation, GenerationError> {
        let request = GenerationRequest::from_query(query)?;
        self.generate_request(request, if_none_match).await
    }

    /// Run the pipeline for an already validated request.
    pub async fn generate_request(
        &self,
        request: GenerationRequest,
        if_none_match: Option<&str>,
    ) -> Result<Generation, GenerationError> {
        let fingerprint = CacheFingerprint::derive(&request);

        if resolve_freshness(if_none_match, &fingerprint) == Freshness::NotModified {
            debug!(fingerprint = %fingerprint, "Client copy is current, skipping encode");
            return Ok(Generation::NotModified { fingerprint });
        }

        let image = self.encode(request).await?;

        Ok(Generation::Generated { fingerprint, image })
    }

    /// Encode on the blocking pool so the runtime's worker threads stay free.
    async fn encode(&self, request: GenerationRequest) -> Result<String, EncodeError> {
        let encoder = Arc::clone(&self.encoder);

        tokio::task::spawn_blocking(move || {
            encoder.encode(&request.text, &request.encode_options())
        })
        .await
        .map_err(|e| EncodeError::Task(e.to_string()))?
    }
}

// =============================================================================
// Tests
// =============================================================================

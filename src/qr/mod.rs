//! QR generation layer.
//!
//! This module holds everything between the HTTP handler and the QR symbol
//! algorithm: request validation, cache fingerprints, conditional request
//! resolution and SVG encoding.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │               QrService                 │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ Generation-  │  │ CacheFingerprint│  │
//! │  │ Request      │  │ (ETag)          │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │        SymbolEncoder (SvgQrEncoder)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`QrService`]: Entry point, runs the full pipeline
//! - [`GenerationRequest`]: Validated query parameters
//! - [`CacheFingerprint`]: SHA-256 digest used as the ETag
//! - [`SymbolEncoder`]: Encoder seam; [`SvgQrEncoder`] is the production one

mod encoder;
mod fingerprint;
mod request;
mod service;

pub use encoder::{
    EncodeOptions, ErrorCorrection, SvgQrEncoder, SymbolEncoder, DEFAULT_MARGIN, MAX_MARGIN,
    MAX_VERSION, MIN_MARGIN, MIN_VERSION, SVG_CONTENT_TYPE,
};
pub use fingerprint::{canonical_query, resolve_freshness, CacheFingerprint, Freshness};
pub use request::GenerationRequest;
pub use service::{Generation, QrService};

//! Cache fingerprints (ETags) for generated QR codes.
//!
//! The fingerprint is a SHA-256 digest over a canonical query string built
//! from the validated request:
//!
//! ```text
//! fingerprint = hex(SHA-256("data=<text>&margin=<n>[&ecc=<L|Q|H>][&version=<v>]"))
//! ```
//!
//! Pairs are sorted by key and form-urlencoded, so the order in which a
//! client supplied its parameters never matters. `ecc` only takes part when
//! it differs from the default, so spelling out `ecc=M` yields the same
//! fingerprint as omitting it.
//!
//! The fingerprint is a cache validator, not a security token.

use std::fmt;

use sha2::{Digest, Sha256};
use url::form_urlencoded;

use super::encoder::ErrorCorrection;
use super::request::GenerationRequest;

/// Lowercase hex digest identifying the output of a [`GenerationRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheFingerprint(String);

impl CacheFingerprint {
    /// Derive the fingerprint for a validated request.
    pub fn derive(request: &GenerationRequest) -> Self {
        let canonical = canonical_query(request);
        let digest = Sha256::digest(canonical.as_bytes());
        Self(hex::encode(digest))
    }

    /// The bare hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digest wrapped in double quotes, as sent in `ETag`.
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for CacheFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the sorted, form-urlencoded parameter string that gets hashed.
pub fn canonical_query(request: &GenerationRequest) -> String {
    let mut pairs: Vec<(&str, String)> = vec![
        ("data", request.text.clone()),
        ("margin", request.margin.to_string()),
    ];
    if request.error_correction != ErrorCorrection::default() {
        pairs.push(("ecc", request.error_correction.as_str().to_string()));
    }
    if let Some(version) = request.version {
        pairs.push(("version", version.to_string()));
    }
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

// =============================================================================
// Conditional Requests
// =============================================================================

/// Outcome of comparing a client validator with the current fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The client already holds this image; answer 304
    NotModified,
    /// The image must be generated
    Stale,
}

/// Compare an `If-None-Match` value against the current fingerprint.
///
/// Only an exact textual match with the quoted fingerprint counts. Lists,
/// weak validators and `*` are treated as mismatches, which costs at most a
/// redundant encode.
pub fn resolve_freshness(if_none_match: Option<&str>, fingerprint: &CacheFingerprint) -> Freshness {
    match if_none_match {
        Some(validator) if validator == fingerprint.etag() => Freshness::NotModified,
        _ => Freshness::Stale,
    }
}

// =============================================================================
// Tests
// =============================================================================

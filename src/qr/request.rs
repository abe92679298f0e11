//! Generation request parsing and validation.
//!
//! Query parameters are parsed once at the HTTP boundary into a
//! [`GenerationRequest`]. Nothing downstream re-validates: a value of this
//! type always satisfies the bounds below.
//!
//! | Parameter | Required | Rule                            | Default |
//! |-----------|----------|---------------------------------|---------|
//! | `data`    | yes      | non-empty, no trimming          |         |
//! | `margin`  | no       | integer in 0-10                 | 4       |
//! | `ecc`     | no       | `L`, `M`, `Q` or `H`            | `M`     |
//! | `version` | no       | integer in 1-40                 | auto    |
//!
//! A parameter that is present but empty is invalid, not defaulted. Values
//! are decoded as `application/x-www-form-urlencoded`; `data` must decode to
//! valid UTF-8.

use crate::error::ValidationError;

use super::encoder::{
    EncodeOptions, ErrorCorrection, DEFAULT_MARGIN, MAX_MARGIN, MAX_VERSION, MIN_MARGIN,
    MIN_VERSION,
};

/// A validated request to render one QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Text to encode (never empty)
    pub text: String,

    /// Quiet zone width in modules (0-10)
    pub margin: u8,

    /// Error correction level
    pub error_correction: ErrorCorrection,

    /// Fixed symbol version (1-40), if requested
    pub version: Option<u8>,
}

impl GenerationRequest {
    /// Create a request with default margin and error correction.
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_options(text, EncodeOptions::default())
    }

    /// Create a request from text and explicit encoding options.
    pub fn with_options(
        text: impl Into<String>,
        options: EncodeOptions,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.is_empty() {
            return Err(ValidationError::MissingData);
        }
        if !(MIN_MARGIN..=MAX_MARGIN).contains(&options.margin) {
            return Err(ValidationError::InvalidMargin {
                value: options.margin.to_string(),
            });
        }
        if let Some(version) = options.version {
            if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
                return Err(ValidationError::InvalidVersion {
                    value: version.to_string(),
                });
            }
        }

        Ok(Self {
            text,
            margin: options.margin,
            error_correction: options.error_correction,
            version: options.version,
        })
    }

    /// Parse and validate a raw (still percent-encoded) query string.
    ///
    /// When a parameter is repeated, its first occurrence is used. Unknown
    /// parameters are ignored.
    pub fn from_query(query: Option<&str>) -> Result<Self, ValidationError> {
        let params = QueryParams::parse(query.unwrap_or(""));

        let text = match params.data {
            Some(data) if !data.is_empty() => {
                String::from_utf8(data).map_err(|_| ValidationError::InvalidData)?
            }
            _ => return Err(ValidationError::MissingData),
        };

        let margin = match params.margin {
            Some(raw) => parse_margin(&String::from_utf8_lossy(&raw))?,
            None => DEFAULT_MARGIN,
        };

        let error_correction = match params.ecc {
            Some(raw) => String::from_utf8_lossy(&raw).parse()?,
            None => ErrorCorrection::default(),
        };

        let version = match params.version {
            Some(raw) => Some(parse_version(&String::from_utf8_lossy(&raw))?),
            None => None,
        };

        Self::with_options(
            text,
            EncodeOptions {
                margin,
                error_correction,
                version,
            },
        )
    }

    /// Encoding options carried by this request.
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            margin: self.margin,
            error_correction: self.error_correction,
            version: self.version,
        }
    }
}

/// Decoded query values of interest, first occurrence only.
///
/// Values stay as bytes until each parameter is validated, so invalid UTF-8
/// is reported instead of being replaced.
#[derive(Debug, Default)]
struct QueryParams {
    data: Option<Vec<u8>>,
    margin: Option<Vec<u8>>,
    ecc: Option<Vec<u8>>,
    version: Option<Vec<u8>>,
}

impl QueryParams {
    fn parse(query: &str) -> Self {
        let mut params = Self::default();

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let slot = match decode_component(key).as_slice() {
                b"data" => &mut params.data,
                b"margin" => &mut params.margin,
                b"ecc" => &mut params.ecc,
                b"version" => &mut params.version,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(decode_component(value));
            }
        }

        params
    }
}

/// Decode one form-urlencoded component: `+` is a space, then `%XX` escapes.
fn decode_component(raw: &str) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .bytes()
        .map(|b| if b == b'+' { b' ' } else { b })
        .collect();
    urlencoding::decode_binary(&spaced).into_owned()
}

fn parse_margin(raw: &str) -> Result<u8, ValidationError> {
    parse_bounded(raw, MIN_MARGIN, MAX_MARGIN).ok_or_else(|| ValidationError::InvalidMargin {
        value: raw.to_string(),
    })
}

fn parse_version(raw: &str) -> Result<u8, ValidationError> {
    parse_bounded(raw, MIN_VERSION, MAX_VERSION).ok_or_else(|| {
        ValidationError::InvalidVersion {
            value: raw.to_string(),
        }
    })
}

/// Strict decimal integer parse with inclusive bounds.
fn parse_bounded(raw: &str, min: u8, max: u8) -> Option<u8> {
    let value: i64 = raw.parse().ok()?;
    if value < i64::from(min) || value > i64::from(max) {
        return None;
    }
    u8::try_from(value).ok()
}

// =============================================================================
// Tests
// =============================================================================

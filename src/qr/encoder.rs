//! SVG QR code encoder.
//!
//! This module turns text into QR symbol markup. Symbol construction (mode
//! selection, Reed-Solomon blocks, masking) is delegated to the `qrcode`
//! crate; this module only chooses the parameters and writes the module
//! matrix out as SVG.
//!
//! # Design Decisions
//!
//! - **Own SVG writer**: the quiet zone must be configurable from 0 to 10
//!   modules, so the matrix is rendered here instead of through a fixed-border
//!   renderer.
//!
//! - **Deterministic output**: identical text and options always produce
//!   byte-identical markup. Clients rely on this to reuse cached images.
//!
//! - **Trait seam**: [`SymbolEncoder`] lets the HTTP layer run against any
//!   encoder, which keeps handler tests independent of the QR algorithm.

use std::fmt;
use std::str::FromStr;

use qrcode::{Color, EcLevel, QrCode, Version};

use crate::error::{EncodeError, ValidationError};

/// Default quiet zone width in modules.
pub const DEFAULT_MARGIN: u8 = 4;

/// Minimum allowed quiet zone width.
pub const MIN_MARGIN: u8 = 0;

/// Maximum allowed quiet zone width.
pub const MAX_MARGIN: u8 = 10;

/// Smallest QR version.
pub const MIN_VERSION: u8 = 1;

/// Largest QR version.
pub const MAX_VERSION: u8 = 40;

/// Content type of the markup produced by [`SvgQrEncoder`].
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

// =============================================================================
// Encoding Options
// =============================================================================

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCorrection {
    /// Recovers ~7% of damaged codewords
    Low,
    /// Recovers ~15% of damaged codewords
    #[default]
    Medium,
    /// Recovers ~25% of damaged codewords
    Quartile,
    /// Recovers ~30% of damaged codewords
    High,
}

impl ErrorCorrection {
    /// Single-letter name used on the wire (`L`, `M`, `Q`, `H`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCorrection::Low => "L",
            ErrorCorrection::Medium => "M",
            ErrorCorrection::Quartile => "Q",
            ErrorCorrection::High => "H",
        }
    }

    fn ec_level(self) -> EcLevel {
        match self {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCorrection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Ok(ErrorCorrection::Low),
            "M" => Ok(ErrorCorrection::Medium),
            "Q" => Ok(ErrorCorrection::Quartile),
            "H" => Ok(ErrorCorrection::High),
            _ => Err(ValidationError::InvalidErrorCorrection {
                value: s.to_string(),
            }),
        }
    }
}

/// Parameters passed to a [`SymbolEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Quiet zone width in modules
    pub margin: u8,

    /// Error correction level
    pub error_correction: ErrorCorrection,

    /// Fixed symbol version; `None` picks the smallest version that fits
    pub version: Option<u8>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            error_correction: ErrorCorrection::default(),
            version: None,
        }
    }
}

impl EncodeOptions {
    /// Options with the given margin and defaults elsewhere.
    pub fn with_margin(margin: u8) -> Self {
        Self {
            margin,
            ..Self::default()
        }
    }
}

// =============================================================================
// Encoder Trait
// =============================================================================

/// Turns text into image markup.
///
/// Implementations must be deterministic: the same text and options always
/// yield the same markup. Encoding is CPU-bound and synchronous; callers on
/// an async runtime should move it to a blocking thread.
pub trait SymbolEncoder: Send + Sync + 'static {
    /// Encode `text` into image markup.
    fn encode(&self, text: &str, options: &EncodeOptions) -> Result<String, EncodeError>;
}

// =============================================================================
// SVG Encoder
// =============================================================================

/// QR encoder producing standalone SVG documents.
///
/// Dark modules are drawn as one path; each horizontal run of dark modules
/// becomes a single rectangle sub-path.
///
/// # Example
///
/// ```
/// use qr_service::qr::{EncodeOptions, SvgQrEncoder, SymbolEncoder};
///
/// let encoder = SvgQrEncoder::new();
/// let svg = encoder.encode("https://example.com", &EncodeOptions::default()).unwrap();
/// assert!(svg.contains("<svg"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SvgQrEncoder {}

impl SvgQrEncoder {
    /// Create a new SVG encoder.
    pub fn new() -> Self {
        Self {}
    }

    fn build_symbol(text: &str, options: &EncodeOptions) -> Result<QrCode, EncodeError> {
        let ec_level = options.error_correction.ec_level();
        let result = match options.version {
            Some(version) => {
                if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
                    return Err(EncodeError::Symbol(format!(
                        "unsupported version {}",
                        version
                    )));
                }
                QrCode::with_version(text.as_bytes(), Version::Normal(i16::from(version)), ec_level)
            }
            None => QrCode::with_error_correction_level(text.as_bytes(), ec_level),
        };

        result.map_err(|e| EncodeError::Symbol(e.to_string()))
    }
}

impl SymbolEncoder for SvgQrEncoder {
    fn encode(&self, text: &str, options: &EncodeOptions) -> Result<String, EncodeError> {
        if text.is_empty() {
            return Err(EncodeError::EmptyInput);
        }

        let code = Self::build_symbol(text, options)?;
        Ok(render_svg(
            code.width(),
            &code.to_colors(),
            usize::from(options.margin),
        ))
    }
}

/// Write a square module matrix as an SVG document.
///
/// `colors` is row-major with `width * width` entries.
fn render_svg(width: usize, colors: &[Color], margin: usize) -> String {
    let dimension = width + margin * 2;

    let mut svg = String::with_capacity(256 + colors.len() * 4);
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
         width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {0} {0}\" \
         shape-rendering=\"crispEdges\">\n",
        dimension
    ));
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
    svg.push_str("<path fill=\"#000000\" d=\"");

    let mut first = true;
    for (y, row) in colors.chunks(width).enumerate() {
        let mut x = 0;
        while x < row.len() {
            if row[x] != Color::Dark {
                x += 1;
                continue;
            }

            let start = x;
            while x < row.len() && row[x] == Color::Dark {
                x += 1;
            }
            let run = x - start;

            if !first {
                svg.push(' ');
            }
            first = false;
            svg.push_str(&format!(
                "M{},{}h{}v1h-{}z",
                start + margin,
                y + margin,
                run,
                run
            ));
        }
    }

    svg.push_str("\"/>\n</svg>\n");
    svg
}

// =============================================================================
// Tests
// =============================================================================

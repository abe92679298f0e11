use thiserror::Error;

/// Errors raised while validating the query parameters of a generation request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The `data` parameter is absent or empty
    #[error("Missing required parameter: data")]
    MissingData,

    /// The `data` parameter does not decode to UTF-8 text
    #[error("Invalid data parameter. Must be valid UTF-8 text.")]
    InvalidData,

    /// The `margin` parameter is not an integer in 0-10
    #[error("Invalid margin parameter. Must be a number between 0 and 10.")]
    InvalidMargin { value: String },

    /// The `ecc` parameter is not one of L, M, Q, H
    #[error("Invalid ecc parameter. Must be one of L, M, Q, H.")]
    InvalidErrorCorrection { value: String },

    /// The `version` parameter is not an integer in 1-40
    #[error("Invalid version parameter. Must be a number between 1 and 40.")]
    InvalidVersion { value: String },
}

impl ValidationError {
    /// Name of the query parameter that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingData | ValidationError::InvalidData => "data",
            ValidationError::InvalidMargin { .. } => "margin",
            ValidationError::InvalidErrorCorrection { .. } => "ecc",
            ValidationError::InvalidVersion { .. } => "version",
        }
    }
}

/// Errors raised by the QR symbol encoder
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    /// Empty text cannot be encoded
    #[error("Cannot encode empty text")]
    EmptyInput,

    /// The symbol could not be built (e.g. data too long for the version)
    #[error("QR symbol encoding failed: {0}")]
    Symbol(String),

    /// The blocking encode task panicked or was cancelled
    #[error("Encoding task failed: {0}")]
    Task(String),
}

/// Errors that can occur while serving a generation request
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Client supplied invalid parameters (should map to HTTP 400)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Encoder failed (should map to HTTP 500)
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodeError),
}

//! Error types for the signdocs library.

use thiserror::Error;

/// The main error type for signdocs operations.
#[derive(Error, Debug)]
pub enum SignError {
    /// Error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error with JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input was not valid hexadecimal.
    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Decoded input had the wrong number of bytes.
    #[error("Invalid {field} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Invalid private key. The message never contains key material.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Malformed signature or no public key could be recovered from it.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Envelope text is missing, has extra, or has mistyped fields.
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Document hash mismatch.
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    /// The recovered signer differs from the one claimed by the envelope.
    #[error("Signer mismatch: envelope claims {claimed}, signature recovers {recovered}")]
    SignerMismatch { claimed: String, recovered: String },
}

impl SignError {
    /// Whether the error is an operator input problem that a re-prompt can fix.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SignError::InvalidHex(_)
                | SignError::InvalidLength { .. }
                | SignError::InvalidKey(_)
                | SignError::InvalidSignature(_)
        )
    }
}

/// Result type alias for signdocs operations.
pub type Result<T> = std::result::Result<T, SignError>;

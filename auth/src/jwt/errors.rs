use thiserror::Error;

/// Error type for JWT operations.
///
/// `Malformed` and `InvalidSignature` are both "malformed token" failures for
/// callers; they stay separate so the request gate can answer with distinct
/// messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature could not be verified")]
    InvalidSignature,
}

//! Error types for the urlsign library.

use thiserror::Error;

/// Result type alias for urlsign operations
pub type SignerResult<T> = Result<T, SignerError>;

/// Errors produced while signing or verifying URLs.
///
/// `InvalidSignature` deliberately carries no detail: a malformed token and a
/// tampered token must look the same to whoever submitted it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// Input is not an absolute URI with a scheme and an authority
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Secret or payload unusable at sign time
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Wrong secret, tampered token or malformed token
    #[error("Invalid signature")]
    InvalidSignature,

    /// Authentic token older than the accepted window
    #[error("Signed URL has expired")]
    Expired,
}

impl SignerError {
    /// Returns true if the input failed URI syntax validation
    pub fn is_invalid_url(&self) -> bool {
        matches!(self, SignerError::InvalidUrl(_))
    }

    /// Returns true if a presented signed URL must be rejected
    /// (as opposed to a local signing failure)
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            SignerError::InvalidUrl(_) | SignerError::InvalidSignature | SignerError::Expired
        )
    }

    /// Returns true if this error is due to expiration
    pub fn is_expired(&self) -> bool {
        matches!(self, SignerError::Expired)
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn http_status_code(&self) -> u16 {
        match self {
            SignerError::InvalidUrl(_) => 400,
            SignerError::Signing(_) => 500,
            SignerError::InvalidSignature => 403,
            SignerError::Expired => 410,
        }
    }
}

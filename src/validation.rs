//! Input validation for URLs and secrets.
//!
//! URI syntax checking is delegated to the `url` crate; this module only adds
//! the constraints the signing scheme needs on top of it.

use url::Url;

use crate::error::{SignerError, SignerResult};
use crate::MAX_SECRET_LENGTH;

/// Validate that `input` is an absolute URI with a scheme and an authority.
///
/// The string must:
/// - Parse as a URL
/// - Contain `://` literally (no scheme-relative or normalized forms)
/// - Have a non-empty host
/// - Contain no whitespace, control characters or backslashes
///
/// # Examples
///
/// ```rust
/// use urlsign::validate_url;
///
/// assert!(validate_url("https://anything.com/test?id=1").is_ok());
///
/// assert!(validate_url("").is_err());
/// assert!(validate_url("not a url").is_err());
/// assert!(validate_url("mailto:someone@example.com").is_err());
/// ```
pub fn validate_url(input: &str) -> SignerResult<Url> {
    if input.is_empty() {
        return Err(SignerError::InvalidUrl("URL cannot be empty".to_string()));
    }

    // The parser silently strips these, which would make the raw split disagree
    // with what was validated.
    if input
        .chars()
        .any(|c| c.is_ascii_whitespace() || c.is_control())
    {
        return Err(SignerError::InvalidUrl(
            "URL contains whitespace or control characters".to_string(),
        ));
    }

    // Special schemes treat a backslash as '/', which the raw split does not.
    if input.contains('\\') {
        return Err(SignerError::InvalidUrl(
            "URL contains a backslash".to_string(),
        ));
    }

    let parsed = Url::parse(input).map_err(|e| SignerError::InvalidUrl(e.to_string()))?;

    if !input.contains("://") {
        return Err(SignerError::InvalidUrl(
            "URL must have the form scheme://authority".to_string(),
        ));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(SignerError::InvalidUrl("URL has no host".to_string())),
    }
}

/// Validate a signing secret.
///
/// Secrets must be non-empty and no longer than 64 bytes. Oversize secrets are
/// rejected rather than truncated, on both the signing and verifying side.
pub fn validate_secret(secret: &[u8]) -> SignerResult<()> {
    if secret.is_empty() {
        return Err(SignerError::Signing("Secret cannot be empty".to_string()));
    }

    if secret.len() > MAX_SECRET_LENGTH {
        return Err(SignerError::Signing(format!(
            "Secret exceeds maximum length of {} bytes. Got {} bytes.",
            MAX_SECRET_LENGTH,
            secret.len()
        )));
    }

    Ok(())
}

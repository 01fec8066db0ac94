//! URL canonicalization.
//!
//! Splits a URL into the transport prefix (`https://`), the domain, and the
//! signable remainder (path and query). Signing and verification both go
//! through [`canonicalize`], so they always operate on byte-identical strings.

use crate::error::{SignerError, SignerResult};
use crate::validation::validate_url;
use crate::HASH_PARAM;

/// A URL split into its transport prefix, domain and signable remainder.
///
/// `prefix + domain + remainder` reproduces the input, except that a missing
/// path is normalized to `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUrl {
    /// Scheme and the double slash, e.g. `"https://"`
    pub prefix: String,

    /// Authority as written, e.g. `"anything.com"` or `"user@host:8443"`
    pub domain: String,

    /// Path and query, always starting with `/`
    pub remainder: String,
}

impl CanonicalUrl {
    /// Join the prefix and domain back onto a token computed over the remainder.
    pub fn reassemble(&self, token: &str) -> String {
        format!("{}{}{}", self.prefix, self.domain, token)
    }

    /// The remainder with the `hash=` placeholder appended.
    pub fn signable_payload(&self) -> String {
        signable_payload(&self.remainder)
    }

    /// Whether the remainder carries a `#fragment`.
    pub fn has_fragment(&self) -> bool {
        self.remainder.contains('#')
    }
}

/// Split `url` into prefix, domain and remainder.
///
/// The URL must be absolute (`scheme://authority...`); anything else fails
/// with [`SignerError::InvalidUrl`].
///
/// # Examples
///
/// ```rust
/// use urlsign::canonicalize;
///
/// let parts = canonicalize("https://anything.com/test?id=1").unwrap();
/// assert_eq!(parts.prefix, "https://");
/// assert_eq!(parts.domain, "anything.com");
/// assert_eq!(parts.remainder, "/test?id=1");
///
/// // No path still yields a remainder starting with '/'
/// assert_eq!(canonicalize("https://anything.com").unwrap().remainder, "/");
/// ```
pub fn canonicalize(url: &str) -> SignerResult<CanonicalUrl> {
    validate_url(url)?;

    let authority_start = url
        .find("//")
        .map(|i| i + 2)
        .ok_or_else(|| SignerError::InvalidUrl("URL has no authority".to_string()))?;

    let (prefix, rest) = url.split_at(authority_start);
    let domain_end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let (domain, tail) = rest.split_at(domain_end);

    if domain.is_empty() {
        return Err(SignerError::InvalidUrl("URL has no host".to_string()));
    }

    let remainder = if tail.starts_with('/') {
        tail.to_string()
    } else {
        format!("/{}", tail)
    };

    Ok(CanonicalUrl {
        prefix: prefix.to_string(),
        domain: domain.to_string(),
        remainder,
    })
}

/// Append the `hash=` placeholder to a remainder.
///
/// Joined with `&` when the remainder already has a query, otherwise with `?`.
///
/// ```rust
/// use urlsign::signable_payload;
///
/// assert_eq!(signable_payload("/test?id=1"), "/test?id=1&hash=");
/// assert_eq!(signable_payload("/test"), "/test?hash=");
/// ```
pub fn signable_payload(remainder: &str) -> String {
    if remainder.contains('?') {
        format!("{}&{}", remainder, HASH_PARAM)
    } else {
        format!("{}?{}", remainder, HASH_PARAM)
    }
}

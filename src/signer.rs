//! URL signing facade.
//!
//! [`UrlSigner`] ties canonicalization and the token codec together: it signs
//! the path and query of a URL, reattaches the prefix and domain, and reverses
//! the process on verification.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::canonical::{canonicalize, signable_payload, CanonicalUrl};
use crate::clock::{Clock, SystemClock};
use crate::config::SignerConfig;
use crate::error::{SignerError, SignerResult};
use crate::token::{exceeds_window, parse_unverified, TokenCodec, VerifiedToken};

/// Signs and verifies URLs with a shared secret.
///
/// The signer is immutable after construction and can be shared across
/// threads.
///
/// # Example
///
/// ```rust
/// use urlsign::UrlSigner;
///
/// let signer = UrlSigner::new(b"1qaz@WSX").unwrap();
///
/// let signed = signer.sign_url("https://anything.com/test?id=1").unwrap();
/// assert!(signed.starts_with("https://anything.com/test?id=1&hash="));
///
/// assert!(signer.verify_url(&signed).unwrap());
/// assert!(!signer.is_expired(&signed, 1));
/// assert!(signer.is_expired(&signed, -1));
/// ```
#[derive(Debug, Clone)]
pub struct UrlSigner<C: Clock = SystemClock> {
    codec: TokenCodec,
    config: SignerConfig,
    clock: C,
}

impl UrlSigner<SystemClock> {
    /// Create a signer with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::Signing`] if the secret is empty or longer than
    /// 64 bytes.
    pub fn new(secret: &[u8]) -> SignerResult<Self> {
        Self::with_config(secret, SignerConfig::default())
    }

    /// Create a signer with a custom configuration.
    pub fn with_config(secret: &[u8], config: SignerConfig) -> SignerResult<Self> {
        let codec =
            TokenCodec::new(secret)?.with_max_token_length(config.effective_max_token_length());
        Ok(Self {
            codec,
            config,
            clock: SystemClock,
        })
    }

    /// Create a signer from a hex-encoded secret string.
    pub fn from_hex(hex_secret: &str) -> SignerResult<Self> {
        let secret = hex::decode(hex_secret)
            .map_err(|e| SignerError::Signing(format!("Invalid hex secret: {}", e)))?;
        Self::new(&secret)
    }

    /// Create a signer from a base64url-encoded secret string.
    pub fn from_base64(b64_secret: &str) -> SignerResult<Self> {
        let secret = URL_SAFE_NO_PAD
            .decode(b64_secret)
            .map_err(|e| SignerError::Signing(format!("Invalid base64 secret: {}", e)))?;
        Self::new(&secret)
    }
}

impl<C: Clock> UrlSigner<C> {
    /// Replace the clock used for issuance and expiry.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> UrlSigner<C2> {
        UrlSigner {
            codec: self.codec,
            config: self.config,
            clock,
        }
    }

    /// The configuration this signer was built with.
    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Sign a URL.
    ///
    /// The `hash=` placeholder is appended to the query (`&hash=` if a query
    /// exists, `?hash=` otherwise) and the token tail follows it.
    ///
    /// # Errors
    ///
    /// - [`SignerError::InvalidUrl`] if the URL is not absolute, or carries a
    ///   `#fragment` (the token would end up in the fragment, which clients do
    ///   not send)
    /// - [`SignerError::Signing`] if the resulting token would be too long
    pub fn sign_url(&self, url: &str) -> SignerResult<String> {
        let canonical = canonicalize(url)?;

        if canonical.has_fragment() {
            return Err(SignerError::InvalidUrl(
                "URL fragments cannot be signed".to_string(),
            ));
        }

        let payload = canonical.signable_payload();
        let token = match self.binding(&canonical) {
            Some(domain) => self.codec.sign_bound(&payload, &domain, self.clock.now())?,
            None => self.codec.sign(&payload, self.clock.now())?,
        };

        tracing::debug!(
            domain = %canonical.domain,
            bound = self.config.bind_domain,
            "Signed URL"
        );

        Ok(canonical.reassemble(&token))
    }

    /// Verify a signed URL.
    ///
    /// Returns `Ok(true)` when the signature is valid. Expiry is not checked;
    /// see [`is_expired`](Self::is_expired) and
    /// [`verify_url_fresh`](Self::verify_url_fresh).
    ///
    /// Unless domain binding is enabled, the domain is not authenticated.
    ///
    /// # Errors
    ///
    /// - [`SignerError::InvalidUrl`] if the input is not an absolute URL
    /// - [`SignerError::InvalidSignature`] for any tampered, malformed or
    ///   foreign token
    pub fn verify_url(&self, signed_url: &str) -> SignerResult<bool> {
        self.verify_signed(signed_url).map(|_| true)
    }

    /// Verify a signed URL and reject it if it is older than
    /// `max_age_minutes`.
    ///
    /// The age is measured on the authenticated timestamp.
    ///
    /// # Errors
    ///
    /// As [`verify_url`](Self::verify_url), plus [`SignerError::Expired`].
    pub fn verify_url_fresh(
        &self,
        signed_url: &str,
        max_age_minutes: i64,
    ) -> SignerResult<VerifiedToken> {
        let verified = self.verify_signed(signed_url)?;
        let now = self.clock.now();

        if verified.is_older_than(max_age_minutes, now) {
            tracing::debug!(
                age_seconds = verified.age_seconds(now),
                max_age_minutes,
                "Rejected expired signed URL"
            );
            return Err(SignerError::Expired);
        }

        Ok(verified)
    }

    /// Whether the signed URL is older than `max_age_minutes`.
    ///
    /// The timestamp is read WITHOUT authenticating it; call
    /// [`verify_url`](Self::verify_url) first whenever the answer matters for
    /// security. Unparseable input counts as expired.
    pub fn is_expired(&self, signed_url: &str, max_age_minutes: i64) -> bool {
        match canonicalize(signed_url) {
            Ok(canonical) => self.is_token_expired(&canonical.remainder, max_age_minutes),
            Err(_) => true,
        }
    }

    /// Sign an arbitrary string as a bare token, without URL handling.
    ///
    /// The `hash=` placeholder is appended the same way as for URLs.
    pub fn generate_token(&self, data: &str) -> SignerResult<String> {
        self.codec.sign(&signable_payload(data), self.clock.now())
    }

    /// Whether a bare token from [`generate_token`](Self::generate_token) is
    /// authentic.
    pub fn is_valid_token(&self, token: &str) -> bool {
        self.codec.verify(token).is_ok()
    }

    /// Whether a bare token is older than `max_age_minutes`.
    ///
    /// Like [`is_expired`](Self::is_expired), this does not authenticate the
    /// token.
    pub fn is_token_expired(&self, token: &str, max_age_minutes: i64) -> bool {
        match self.codec.parse_unverified(token) {
            Ok(issued_at) => exceeds_window(self.clock.now() - issued_at, max_age_minutes),
            Err(_) => true,
        }
    }

    fn verify_signed(&self, signed_url: &str) -> SignerResult<VerifiedToken> {
        let canonical = canonicalize(signed_url)?;
        match self.binding(&canonical) {
            Some(domain) => self.codec.verify_bound(&canonical.remainder, &domain),
            None => self.codec.verify(&canonical.remainder),
        }
    }

    fn binding(&self, canonical: &CanonicalUrl) -> Option<String> {
        self.config
            .bind_domain
            .then(|| canonical.domain.to_ascii_lowercase())
    }
}

/// Sign `url` with a per-call secret and the system clock.
///
/// The secret is copied into a signer that is dropped before this returns.
pub fn sign_url(secret: &[u8], url: &str) -> SignerResult<String> {
    UrlSigner::new(secret)?.sign_url(url)
}

/// Verify `signed_url` with a per-call secret.
pub fn verify_url(secret: &[u8], signed_url: &str) -> SignerResult<bool> {
    UrlSigner::new(secret)?.verify_url(signed_url)
}

/// Whether `signed_url` is older than `max_age_minutes` by the system clock.
///
/// Needs no secret because the timestamp is not authenticated here; verify
/// the URL first in any security-sensitive context.
pub fn is_expired(signed_url: &str, max_age_minutes: i64) -> bool {
    let now = SystemClock.now();
    match canonicalize(signed_url).and_then(|c| parse_unverified(&c.remainder)) {
        Ok(issued_at) => exceeds_window(now - issued_at, max_age_minutes),
        Err(_) => true,
    }
}

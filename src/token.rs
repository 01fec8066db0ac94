//! Token signing and verification.
//!
//! A token is the signable payload followed by a fixed-width tail:
//!
//! ```text
//! <payload>.<timestamp>.<tag>
//! ```
//!
//! - `timestamp`: 8-byte big-endian Unix seconds (UTC), base64url without
//!   padding (11 characters)
//! - `tag`: HMAC-SHA256 over `<payload>.<timestamp>`, base64url without
//!   padding (43 characters)
//!
//! The payload travels verbatim so that a signed URL stays a working URL. The
//! tail is always [`TOKEN_TAIL_LENGTH`] bytes, so tokens are split from the
//! right and dots inside the payload are harmless. Tags are compared in
//! constant time.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{SignerError, SignerResult};
use crate::validation::validate_secret;
use crate::{
    ENCODED_TIMESTAMP_LENGTH, HASH_PARAM, MAX_TOKEN_LENGTH, TAG_LENGTH, TIMESTAMP_LENGTH,
    TOKEN_SEPARATOR, TOKEN_TAIL_LENGTH,
};

type HmacSha256 = Hmac<Sha256>;

/// The authenticated contents of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    /// Signed payload, including the trailing `hash=` placeholder when the
    /// token came from URL signing
    pub payload: String,

    /// Issuance time embedded in the token
    pub issued_at: DateTime<Utc>,
}

impl VerifiedToken {
    /// Time elapsed since issuance, as seen at `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.issued_at
    }

    /// Token age in whole seconds, never negative.
    pub fn age_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.age(now).num_seconds().max(0)
    }

    /// Whether the token is older than `max_age_minutes` at `now`.
    pub fn is_older_than(&self, max_age_minutes: i64, now: DateTime<Utc>) -> bool {
        exceeds_window(self.age(now), max_age_minutes)
    }

    /// The payload with the `hash=` placeholder removed, i.e. the path and
    /// query that were originally signed.
    pub fn original_remainder(&self) -> &str {
        self.payload
            .strip_suffix(HASH_PARAM)
            .and_then(|p| p.strip_suffix('&').or_else(|| p.strip_suffix('?')))
            .unwrap_or(&self.payload)
    }
}

/// Signs and verifies tokens with a shared HMAC secret.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use urlsign::TokenCodec;
///
/// let codec = TokenCodec::new(b"1qaz@WSX").unwrap();
///
/// let token = codec.sign("/download/report.pdf?hash=", Utc::now()).unwrap();
/// let verified = codec.verify(&token).unwrap();
/// assert_eq!(verified.payload, "/download/report.pdf?hash=");
/// ```
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
    max_token_length: usize,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"<redacted>")
            .field("max_token_length", &self.max_token_length)
            .finish()
    }
}

impl TokenCodec {
    /// Create a codec with the given HMAC secret.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::Signing`] if the secret is empty or longer than
    /// 64 bytes.
    pub fn new(secret: &[u8]) -> SignerResult<Self> {
        validate_secret(secret)?;
        Ok(Self {
            secret: secret.to_vec(),
            max_token_length: MAX_TOKEN_LENGTH,
        })
    }

    /// Set the longest token this codec will produce or accept.
    pub fn with_max_token_length(mut self, max: usize) -> Self {
        self.max_token_length = max;
        self
    }

    /// Sign `payload` with the given issuance time.
    ///
    /// Deterministic for a fixed secret, payload and time.
    pub fn sign(&self, payload: &str, issued_at: DateTime<Utc>) -> SignerResult<String> {
        self.sign_with_context(None, payload, issued_at)
    }

    /// Sign `payload`, additionally binding the tag to `context` (typically
    /// the domain). The token text does not contain the context; the verifier
    /// must supply the same value to [`verify_bound`](Self::verify_bound).
    pub fn sign_bound(
        &self,
        payload: &str,
        context: &str,
        issued_at: DateTime<Utc>,
    ) -> SignerResult<String> {
        self.sign_with_context(Some(context), payload, issued_at)
    }

    /// Verify a token and return its payload and issuance time.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::InvalidSignature`] for every failure: oversize,
    /// malformed, undecodable, or a tag that does not match.
    pub fn verify(&self, token: &str) -> SignerResult<VerifiedToken> {
        self.verify_with_context(None, token)
    }

    /// Verify a token produced by [`sign_bound`](Self::sign_bound).
    pub fn verify_bound(&self, token: &str, context: &str) -> SignerResult<VerifiedToken> {
        self.verify_with_context(Some(context), token)
    }

    /// Extract the issuance time WITHOUT checking the tag, under this
    /// codec's length cap. See [`parse_unverified`].
    pub fn parse_unverified(&self, token: &str) -> SignerResult<DateTime<Utc>> {
        parse_with_limit(token, self.max_token_length)
    }

    fn sign_with_context(
        &self,
        context: Option<&str>,
        payload: &str,
        issued_at: DateTime<Utc>,
    ) -> SignerResult<String> {
        if payload.is_empty() {
            return Err(SignerError::Signing("Payload cannot be empty".to_string()));
        }

        if payload.len() + TOKEN_TAIL_LENGTH > self.max_token_length {
            return Err(SignerError::Signing(format!(
                "Token would exceed maximum length of {} bytes",
                self.max_token_length
            )));
        }

        let timestamp_b64 = URL_SAFE_NO_PAD.encode(issued_at.timestamp().to_be_bytes());
        let signed_part = format!("{}{}{}", payload, TOKEN_SEPARATOR, timestamp_b64);

        let tag = self
            .compute_tag(context, &signed_part)
            .map_err(|e| SignerError::Signing(format!("HMAC initialization failed: {}", e)))?;
        let tag_b64 = URL_SAFE_NO_PAD.encode(tag);

        Ok(format!("{}{}{}", signed_part, TOKEN_SEPARATOR, tag_b64))
    }

    fn verify_with_context(
        &self,
        context: Option<&str>,
        token: &str,
    ) -> SignerResult<VerifiedToken> {
        // Length check to prevent DoS
        if token.len() > self.max_token_length {
            return Err(reject("token exceeds maximum length"));
        }

        let parts = TokenParts::split(token).ok_or_else(|| reject("malformed token"))?;

        // Decode provided tag
        let provided_tag = URL_SAFE_NO_PAD
            .decode(parts.tag_b64)
            .map_err(|_| reject("invalid tag encoding"))?;
        if provided_tag.len() != TAG_LENGTH {
            return Err(reject("invalid tag length"));
        }

        let issued_at = decode_timestamp(parts.timestamp_b64)
            .ok_or_else(|| reject("invalid timestamp encoding"))?;

        // Compute expected tag
        let expected_tag = self
            .compute_tag(context, parts.signed_part)
            .map_err(|_| reject("HMAC initialization failed"))?;

        // Constant-time comparison to prevent timing attacks
        if provided_tag.ct_eq(&expected_tag).into() {
            Ok(VerifiedToken {
                payload: parts.payload.to_string(),
                issued_at,
            })
        } else {
            Err(reject("tag mismatch"))
        }
    }

    /// Compute HMAC-SHA256 over the optional context and the signed part.
    ///
    /// The context is length-prefixed so that no (context, payload) pair can
    /// collide with another.
    fn compute_tag(
        &self,
        context: Option<&str>,
        signed_part: &str,
    ) -> Result<Vec<u8>, hmac::digest::InvalidLength> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)?;
        if let Some(context) = context {
            mac.update(&(context.len() as u64).to_be_bytes());
            mac.update(context.as_bytes());
        }
        mac.update(signed_part.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Extract the issuance time from a token WITHOUT checking its tag.
///
/// Anyone can forge a timestamp. Only trust the result for a token that has
/// already passed [`TokenCodec::verify`], or when authenticity does not matter.
///
/// # Errors
///
/// Returns [`SignerError::InvalidSignature`] if the token is malformed.
pub fn parse_unverified(token: &str) -> SignerResult<DateTime<Utc>> {
    parse_with_limit(token, MAX_TOKEN_LENGTH)
}

fn parse_with_limit(token: &str, max_token_length: usize) -> SignerResult<DateTime<Utc>> {
    if token.len() > max_token_length {
        return Err(reject("token exceeds maximum length"));
    }

    let parts = TokenParts::split(token).ok_or_else(|| reject("malformed token"))?;
    decode_timestamp(parts.timestamp_b64).ok_or_else(|| reject("invalid timestamp encoding"))
}

/// Whether `age` exceeds a window of `max_age_minutes`.
///
/// Negative windows are always exceeded; windows too large to represent
/// never are.
pub(crate) fn exceeds_window(age: Duration, max_age_minutes: i64) -> bool {
    if max_age_minutes < 0 {
        return true;
    }
    match Duration::try_minutes(max_age_minutes) {
        Some(window) => age > window,
        None => false,
    }
}

/// Borrowed pieces of a token, split by the fixed-width tail.
struct TokenParts<'a> {
    payload: &'a str,
    signed_part: &'a str,
    timestamp_b64: &'a str,
    tag_b64: &'a str,
}

impl<'a> TokenParts<'a> {
    fn split(token: &'a str) -> Option<Self> {
        if token.len() <= TOKEN_TAIL_LENGTH {
            return None;
        }

        let tail_start = token.len() - TOKEN_TAIL_LENGTH;
        if !token.is_char_boundary(tail_start) {
            return None;
        }

        let (payload, tail) = token.split_at(tail_start);
        if !tail.is_ascii() {
            return None;
        }

        let tag_start = 1 + ENCODED_TIMESTAMP_LENGTH;
        let bytes = tail.as_bytes();
        if bytes[0] != TOKEN_SEPARATOR as u8 || bytes[tag_start] != TOKEN_SEPARATOR as u8 {
            return None;
        }

        Some(Self {
            payload,
            signed_part: &token[..tail_start + tag_start],
            timestamp_b64: &tail[1..tag_start],
            tag_b64: &tail[tag_start + 1..],
        })
    }
}

fn decode_timestamp(timestamp_b64: &str) -> Option<DateTime<Utc>> {
    let bytes: [u8; TIMESTAMP_LENGTH] = URL_SAFE_NO_PAD
        .decode(timestamp_b64)
        .ok()?
        .try_into()
        .ok()?;
    DateTime::from_timestamp(i64::from_be_bytes(bytes), 0)
}

/// Every verification failure collapses to the same error; the reason is only
/// visible in debug logs.
fn reject(reason: &'static str) -> SignerError {
    tracing::debug!(reason, "Rejected token");
    SignerError::InvalidSignature
}

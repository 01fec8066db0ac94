//! # urlsign - tamper-evident, time-bound signed URLs
//!
//! Hand out links that recipients cannot forge or silently modify, and that
//! stop being accepted after a caller-chosen age.
//!
//! ## Features
//!
//! - **URL Signing**: HMAC-SHA256 over the path and query, with an embedded
//!   issuance timestamp
//! - **Verification**: constant-time tag comparison; every failure looks the
//!   same to the caller
//! - **Expiration**: age checks against an injectable clock
//! - **Domain Binding**: optionally cover the domain with the tag as well
//!
//! ## Quick Start
//!
//! ```rust
//! use urlsign::UrlSigner;
//!
//! let signer = UrlSigner::new(b"1qaz@WSX").unwrap();
//!
//! let signed = signer.sign_url("https://anything.com/test?id=1").unwrap();
//! // https://anything.com/test?id=1&hash=.<timestamp>.<tag>
//!
//! match signer.verify_url_fresh(&signed, 30) {
//!     Ok(token) => println!("Valid link for {}", token.original_remainder()),
//!     Err(e) => eprintln!("Rejected: {}", e),
//! }
//! ```
//!
//! ## Token format
//!
//! `<payload>.<timestamp>.<tag>` where the payload is the URL's path and query
//! with `hash=` appended, `timestamp` is 8 big-endian bytes of Unix seconds and
//! `tag` is the 32-byte HMAC-SHA256, both base64url without padding.
//!
//! The domain is not covered by the tag unless
//! [`SignerConfig::bind_domain`] is set.

pub mod canonical;
pub mod clock;
pub mod config;
pub mod error;
pub mod signer;
pub mod token;
pub mod validation;

// Re-exports for convenience
pub use canonical::{canonicalize, signable_payload, CanonicalUrl};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SignerConfig;
pub use error::{SignerError, SignerResult};
pub use signer::{is_expired, sign_url, verify_url, UrlSigner};
pub use token::{parse_unverified, TokenCodec, VerifiedToken};
pub use validation::{validate_secret, validate_url};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum secret length in bytes; longer secrets are rejected
pub const MAX_SECRET_LENGTH: usize = 64;

/// Default maximum token length (prevents DoS via large tokens)
pub const MAX_TOKEN_LENGTH: usize = 8192;

/// Query parameter that carries the token tail
pub const HASH_PARAM: &str = "hash=";

/// Separator between payload, timestamp and tag
pub const TOKEN_SEPARATOR: char = '.';

/// Raw timestamp width in bytes
pub const TIMESTAMP_LENGTH: usize = 8;

/// Raw HMAC-SHA256 tag width in bytes
pub const TAG_LENGTH: usize = 32;

/// Encoded timestamp width (base64url, no padding)
pub const ENCODED_TIMESTAMP_LENGTH: usize = 11;

/// Encoded tag width (base64url, no padding)
pub const ENCODED_TAG_LENGTH: usize = 43;

/// Width of everything a token adds after its payload: `.<timestamp>.<tag>`
pub const TOKEN_TAIL_LENGTH: usize = 1 + ENCODED_TIMESTAMP_LENGTH + 1 + ENCODED_TAG_LENGTH;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::config::SignerConfig;
    pub use crate::error::{SignerError, SignerResult};
    pub use crate::signer::UrlSigner;
    pub use crate::token::{TokenCodec, VerifiedToken};
}

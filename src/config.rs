//! Signer configuration.

use serde::{Deserialize, Serialize};

use crate::{MAX_TOKEN_LENGTH, TOKEN_TAIL_LENGTH};

/// Configuration for a [`UrlSigner`](crate::UrlSigner).
///
/// Deserializable so hosts can embed it in their own config files:
///
/// ```rust
/// use urlsign::SignerConfig;
///
/// let config = SignerConfig::default()
///     .with_domain_binding(true)
///     .with_max_token_length(4096);
/// assert!(config.bind_domain);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Fold the domain into the authentication tag (default: false)
    ///
    /// When off, a token signed for one domain verifies on any other domain
    /// with the same path and query.
    pub bind_domain: bool,

    /// Longest token accepted or produced, in bytes (default: 8192)
    pub max_token_length: usize,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            bind_domain: false,
            max_token_length: MAX_TOKEN_LENGTH,
        }
    }
}

impl SignerConfig {
    /// Set whether the domain is covered by the tag.
    pub fn with_domain_binding(mut self, bind: bool) -> Self {
        self.bind_domain = bind;
        self
    }

    /// Set the maximum token length.
    pub fn with_max_token_length(mut self, max: usize) -> Self {
        self.max_token_length = max;
        self
    }

    /// Length cap actually enforced: never shorter than a token with a
    /// one-byte payload.
    pub(crate) fn effective_max_token_length(&self) -> usize {
        let floor = TOKEN_TAIL_LENGTH + 1;
        if self.max_token_length < floor {
            tracing::warn!(
                configured = self.max_token_length,
                enforced = floor,
                "max_token_length too small to hold any token, raising it"
            );
            floor
        } else {
            self.max_token_length
        }
    }
}

//! Shared HS256 signing keys.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::{Error, Result, TRACING_TARGET_SERVICE};

/// Process-wide HMAC keys derived from the configured secret.
///
/// Cloning is cheap: all clones share the same keys.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
}

impl SessionKeys {
    /// Derives the signing and verification keys from a shared secret.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the secret is empty.
    pub fn from_secret(secret: &str) -> Result<Self> {
        if secret.trim().is_empty() {
            return Err(Error::config("JWT secret cannot be empty"));
        }

        let inner = Arc::new(SessionKeysInner {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        });

        tracing::debug!(target: TRACING_TARGET_SERVICE, "session keys derived");
        Ok(Self { inner })
    }

    /// Returns the key used to verify tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the key used to sign tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn empty_secret_is_rejected() {
        for secret in ["", "   "] {
            let error = SessionKeys::from_secret(secret).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Config);
        }
    }

    #[test]
    fn debug_hides_keys() -> anyhow::Result<()> {
        let keys = SessionKeys::from_secret("top-secret")?;
        assert!(!format!("{keys:?}").contains("top-secret"));
        Ok(())
    }
}

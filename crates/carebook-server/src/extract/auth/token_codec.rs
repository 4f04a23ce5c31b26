//! HS256 token issuance and verification.

use jiff::Timestamp;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};

use super::{AuthClaims, ExtraClaims};
use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{ErrorKind, Result};
use crate::service::SessionKeys;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_MINUTES: u32 = 30;

/// A freshly signed token with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The compact JWS string.
    pub token: String,
    /// The signed claims.
    pub claims: AuthClaims,
}

/// Signs and verifies access tokens with the process-wide secret.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    keys: SessionKeys,
    ttl_minutes: u32,
}

impl TokenCodec {
    /// Creates a codec that issues tokens valid for `ttl_minutes`.
    pub fn new(keys: SessionKeys, ttl_minutes: u32) -> Self {
        Self { keys, ttl_minutes }
    }

    /// Returns the configured token lifetime in minutes.
    #[inline]
    pub fn ttl_minutes(&self) -> u32 {
        self.ttl_minutes
    }

    /// Issues a token for `user_id` with the configured lifetime.
    pub fn issue(&self, user_id: i64, extra: ExtraClaims) -> Result<IssuedToken> {
        self.issue_with_ttl(user_id, extra, i64::from(self.ttl_minutes))
    }

    /// Issues a token for `user_id` that expires `ttl_minutes` from now.
    ///
    /// A negative lifetime produces an already expired token.
    pub fn issue_with_ttl(
        &self,
        user_id: i64,
        extra: ExtraClaims,
        ttl_minutes: i64,
    ) -> Result<IssuedToken> {
        let iat = Timestamp::now().as_second();
        let claims = AuthClaims {
            sub: user_id.to_string(),
            iat,
            exp: iat.saturating_add(ttl_minutes.saturating_mul(60)),
            extra,
        };

        let token = self.encode_claims(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Signs an arbitrary claim set.
    pub fn encode_claims(&self, claims: &AuthClaims) -> Result<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, self.keys.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                sub = %claims.sub,
                "failed to encode access token"
            );

            ErrorKind::InternalServerError.with_context("token encoding failed")
        })
    }

    /// Verifies a token and returns its claims.
    ///
    /// Expired, malformed, tampered and foreign-key tokens all yield `None`.
    /// The cause is only logged.
    pub fn verify(&self, token: &str) -> Option<AuthClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        match decode::<AuthClaims>(token, self.keys.decoding_key(), &validation) {
            Ok(token_data) => Some(token_data.claims),
            Err(error) => {
                let reason = match error.kind() {
                    JwtErrorKind::ExpiredSignature => "expired",
                    JwtErrorKind::InvalidSignature => "bad signature",
                    _ => "malformed",
                };

                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    reason,
                    error = %error,
                    "access token rejected"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> TokenCodec {
        let keys = SessionKeys::from_secret(secret).expect("non-empty secret");
        TokenCodec::new(keys, DEFAULT_TOKEN_TTL_MINUTES)
    }

    #[test]
    fn round_trip_preserves_claims() -> anyhow::Result<()> {
        let codec = codec("round-trip-secret");
        let issued = codec.issue(42, ExtraClaims::new(Some("Doctor"), "house"))?;

        let claims = codec
            .verify(&issued.token)
            .ok_or_else(|| anyhow::anyhow!("token rejected"))?;

        assert_eq!(claims, issued.claims);
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
        assert_eq!(claims.extra.role.as_deref(), Some("Doctor"));
        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> anyhow::Result<()> {
        let codec = codec("expiry-secret");
        let issued = codec.issue_with_ttl(1, ExtraClaims::default(), -1)?;

        assert!(codec.verify(&issued.token).is_none());
        Ok(())
    }

    #[test]
    fn tampered_token_is_rejected() -> anyhow::Result<()> {
        let codec = codec("tamper-secret");
        let issued = codec.issue(1, ExtraClaims::default())?;

        let forged = AuthClaims {
            sub: "2".into(),
            ..issued.claims.clone()
        };
        let forged_token = codec.encode_claims(&forged)?;
        let forged_payload = forged_token.split('.').nth(1).unwrap_or_default();

        let mut parts: Vec<&str> = issued.token.split('.').collect();
        parts[1] = forged_payload;
        let tampered = parts.join(".");

        assert!(codec.verify(&tampered).is_none());
        assert!(codec.verify("not-a-token").is_none());
        Ok(())
    }

    #[test]
    fn foreign_secret_is_rejected() -> anyhow::Result<()> {
        let issued = codec("first-secret").issue(1, ExtraClaims::default())?;
        assert!(codec("second-secret").verify(&issued.token).is_none());
        Ok(())
    }
}

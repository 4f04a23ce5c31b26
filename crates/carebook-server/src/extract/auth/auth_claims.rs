//! Token claim set.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Claims carried by every access token.
///
/// Registered claims are `sub`, `iat` and `exp`. The remaining claims form a
/// closed set declared by [`ExtraClaims`]; any other claim in a decoded token
/// is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject: the user id rendered as a decimal string.
    pub sub: String,
    /// Issued at (seconds since the Unix epoch).
    pub iat: i64,
    /// Expiration time (seconds since the Unix epoch).
    pub exp: i64,

    #[serde(flatten)]
    pub extra: ExtraClaims,
}

/// Application-defined claims merged into [`AuthClaims`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraClaims {
    /// Name of the principal's first role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Username at the time of issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl ExtraClaims {
    /// Creates extra claims with a role and a username.
    pub fn new(role: Option<impl Into<String>>, username: impl Into<String>) -> Self {
        Self {
            role: role.map(Into::into),
            username: Some(username.into()),
        }
    }
}

impl AuthClaims {
    /// Returns the subject as a user id, or `None` if it is not numeric.
    #[inline]
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    /// Returns the expiration time.
    pub fn expires_at(&self) -> Timestamp {
        Timestamp::from_second(self.exp).unwrap_or(Timestamp::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_claims_are_flattened() -> anyhow::Result<()> {
        let claims = AuthClaims {
            sub: "7".into(),
            iat: 100,
            exp: 1900,
            extra: ExtraClaims::new(Some("Patient"), "alice"),
        };

        let json = serde_json::to_value(&claims)?;
        assert_eq!(json["sub"], "7");
        assert_eq!(json["role"], "Patient");
        assert_eq!(json["username"], "alice");
        assert_eq!(claims.user_id(), Some(7));
        Ok(())
    }

    #[test]
    fn absent_extra_claims_are_omitted() -> anyhow::Result<()> {
        let claims = AuthClaims {
            sub: "x".into(),
            iat: 0,
            exp: 0,
            extra: ExtraClaims::default(),
        };

        let json = serde_json::to_value(&claims)?;
        assert!(json.get("role").is_none());
        assert_eq!(claims.user_id(), None);
        assert_eq!(claims.expires_at(), Timestamp::UNIX_EPOCH);
        Ok(())
    }
}

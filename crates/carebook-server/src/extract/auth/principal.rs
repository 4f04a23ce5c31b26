//! Per-request principal and the authorization predicates over it.

use std::collections::BTreeSet;
use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use carebook_postgres::types::{Capability, Role};

use super::AuthClaims;
use crate::TRACING_TARGET_AUTHORIZATION;
use crate::handler::{ErrorKind, Result};
use crate::service::PrincipalRecord;

/// A verified user together with the rights loaded for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub roles: Vec<Role>,
    pub capabilities: BTreeSet<Capability>,
    pub claims: AuthClaims,
}

impl Identity {
    /// Builds an identity from a directory record and the token it was found by.
    pub fn new(record: PrincipalRecord, claims: AuthClaims) -> Self {
        Self {
            user_id: record.user_id,
            username: record.username,
            roles: record.roles,
            capabilities: record.capabilities,
            claims,
        }
    }

    #[inline]
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    #[inline]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Who is making the request.
///
/// Inserted into the request extensions by the authentication middleware.
/// Extracting it never fails: a request the middleware did not see is
/// [`Principal::Anonymous`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Principal {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl Principal {
    /// Returns the identity of an authenticated principal.
    #[inline]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }

    #[inline]
    pub fn user_id(&self) -> Option<i64> {
        self.identity().map(|identity| identity.user_id)
    }

    #[inline]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Fails with 401 unless the principal is authenticated.
    pub fn require_authenticated(&self) -> Result<&Identity> {
        self.identity()
            .ok_or_else(|| ErrorKind::Unauthenticated.into_error())
    }

    /// Fails with 401 for anonymous principals and 403 when the capability is missing.
    pub fn require_capability(&self, capability: Capability) -> Result<&Identity> {
        let identity = self.require_authenticated()?;

        if !identity.has_capability(capability) {
            tracing::debug!(
                target: TRACING_TARGET_AUTHORIZATION,
                user_id = identity.user_id,
                capability = %capability,
                "capability check failed"
            );

            return Err(ErrorKind::Forbidden
                .with_message(format!("missing required permission: {capability}")));
        }

        Ok(identity)
    }

    /// Fails with 401 unless the principal is the owner of the target user record.
    pub fn require_self(&self, owner_id: i64) -> Result<&Identity> {
        let identity = self.require_authenticated()?;

        if identity.user_id != owner_id {
            tracing::debug!(
                target: TRACING_TARGET_AUTHORIZATION,
                user_id = identity.user_id,
                owner_id,
                "ownership check failed"
            );

            return Err(ErrorKind::Unauthorized.into_error());
        }

        Ok(identity)
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Principal>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Outcome of resolving the bearer credential of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No `Authorization: Bearer` header.
    NoHeader,
    /// The token failed verification or names no numeric subject.
    InvalidToken,
    /// The token is valid but the user no longer exists or could not be loaded.
    PrincipalMissing,
    /// The token is valid and the user was loaded.
    PrincipalFound(Identity),
}

impl Resolution {
    /// Collapses the resolution into the principal seen by handlers.
    pub fn into_principal(self) -> Principal {
        match self {
            Self::NoHeader | Self::InvalidToken | Self::PrincipalMissing => Principal::Anonymous,
            Self::PrincipalFound(identity) => Principal::Authenticated(identity),
        }
    }
}

impl From<Resolution> for Principal {
    #[inline]
    fn from(resolution: Resolution) -> Self {
        resolution.into_principal()
    }
}

impl From<Identity> for Principal {
    #[inline]
    fn from(identity: Identity) -> Self {
        Self::Authenticated(identity)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::extract::ExtraClaims;

    pub(crate) fn identity(user_id: i64, role: Role) -> Identity {
        Identity {
            user_id,
            username: format!("user{user_id}"),
            roles: vec![role],
            capabilities: role.capabilities().iter().copied().collect(),
            claims: AuthClaims {
                sub: user_id.to_string(),
                iat: 0,
                exp: i64::MAX,
                extra: ExtraClaims::new(Some(role.name()), format!("user{user_id}")),
            },
        }
    }

    #[test]
    fn anonymous_is_denied_every_capability() {
        for capability in Capability::iter() {
            let error = Principal::Anonymous
                .require_capability(capability)
                .unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Unauthenticated);
        }
    }

    #[test]
    fn patient_cannot_add_service() {
        let principal = Principal::from(identity(3, Role::Patient));

        let error = principal
            .require_capability(Capability::AddService)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Forbidden);
        assert_eq!(
            error.message(),
            Some("missing required permission: add_service")
        );

        assert!(principal.require_capability(Capability::ViewService).is_ok());
    }

    #[test]
    fn self_check_compares_user_ids() {
        let principal = Principal::from(identity(7, Role::Patient));

        assert!(principal.require_self(7).is_ok());
        let error = principal.require_self(8).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);

        let error = Principal::Anonymous.require_self(7).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthenticated);
    }

    #[test]
    fn resolution_state_machine() {
        assert_eq!(Resolution::NoHeader.into_principal(), Principal::Anonymous);
        assert_eq!(Resolution::InvalidToken.into_principal(), Principal::Anonymous);
        assert_eq!(
            Resolution::PrincipalMissing.into_principal(),
            Principal::Anonymous
        );

        let found = Resolution::PrincipalFound(identity(1, Role::Doctor)).into_principal();
        assert_eq!(found.user_id(), Some(1));
        assert!(found.is_authenticated());
    }
}

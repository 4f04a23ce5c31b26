//! Extractor for handlers that need an authenticated caller.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use derive_more::Deref;

use super::{Identity, Principal};
use crate::handler::{Error, ErrorKind, Result};

/// The authenticated caller.
///
/// Rejects anonymous requests with 401 `Authentication Required`.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub Identity);

impl TryFrom<Principal> for AuthState {
    type Error = Error<'static>;

    fn try_from(principal: Principal) -> Result<Self> {
        match principal {
            Principal::Authenticated(identity) => Ok(Self(identity)),
            Principal::Anonymous => Err(ErrorKind::Unauthenticated.into_error()),
        }
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(principal) =
            <Principal as FromRequestParts<S>>::from_request_parts(parts, state).await;
        Self::try_from(principal)
    }
}

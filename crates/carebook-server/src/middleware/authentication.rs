//! Authentication middleware that resolves the request principal.

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejection;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::extract::{Identity, Resolution, TokenCodec};
use crate::service::{PrincipalDirectory, ServiceState, SharedDirectory};

/// Extension trait for `axum::`[`Router`] to apply the authentication gate.
pub trait RouterAuthExt<S> {
    /// Resolves a [`Principal`] for every request and stores it in the
    /// request extensions.
    ///
    /// Never rejects: requests without a usable token continue as
    /// [`Principal::Anonymous`].
    ///
    /// [`Principal`]: crate::extract::Principal
    /// [`Principal::Anonymous`]: crate::extract::Principal::Anonymous
    fn with_principal_resolution(self, state: ServiceState) -> Self;
}

impl<S> RouterAuthExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_principal_resolution(self, state: ServiceState) -> Self {
        self.layer(from_fn_with_state(state, authenticate))
    }
}

/// Resolves the bearer token of the request into a principal.
pub async fn authenticate(
    State(token_codec): State<TokenCodec>,
    State(principals): State<SharedDirectory>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer.as_ref().ok().map(|TypedHeader(auth)| auth.token());
    let resolution = resolve_principal(&token_codec, principals.as_ref(), token).await;

    request.extensions_mut().insert(resolution.into_principal());
    next.run(request).await
}

/// Runs the token and directory checks for one request.
pub async fn resolve_principal(
    token_codec: &TokenCodec,
    principals: &dyn PrincipalDirectory,
    token: Option<&str>,
) -> Resolution {
    let Some(token) = token else {
        return Resolution::NoHeader;
    };

    let Some(claims) = token_codec.verify(token) else {
        return Resolution::InvalidToken;
    };

    let Some(user_id) = claims.user_id() else {
        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            sub = %claims.sub,
            "token subject is not a user id"
        );
        return Resolution::InvalidToken;
    };

    match principals.find_principal(user_id).await {
        Ok(Some(record)) => {
            tracing::trace!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id,
                roles = ?record.roles,
                "principal resolved"
            );
            Resolution::PrincipalFound(Identity::new(record, claims))
        }
        Ok(None) => {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id,
                "token subject no longer exists"
            );
            Resolution::PrincipalMissing
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                user_id,
                error = %error,
                "principal lookup failed, continuing as anonymous"
            );
            Resolution::PrincipalMissing
        }
    }
}

#[cfg(test)]
mod tests {
    use carebook_postgres::types::Role;

    use super::*;
    use crate::extract::ExtraClaims;
    use crate::handler::test::{StubDirectory, test_codec};

    #[tokio::test]
    async fn missing_header_is_no_header() {
        let directory = StubDirectory::default();
        let resolution = resolve_principal(&test_codec(), &directory, None).await;
        assert_eq!(resolution, Resolution::NoHeader);
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let directory = StubDirectory::default();
        let resolution = resolve_principal(&test_codec(), &directory, Some("garbage")).await;
        assert_eq!(resolution, Resolution::InvalidToken);
    }

    #[tokio::test]
    async fn unknown_user_is_missing() -> anyhow::Result<()> {
        let codec = test_codec();
        let token = codec.issue(99, ExtraClaims::default())?.token;

        let resolution = resolve_principal(&codec, &StubDirectory::default(), Some(&token)).await;
        assert_eq!(resolution, Resolution::PrincipalMissing);
        Ok(())
    }

    #[tokio::test]
    async fn store_failure_is_missing() -> anyhow::Result<()> {
        let codec = test_codec();
        let token = codec.issue(1, ExtraClaims::default())?.token;

        let resolution = resolve_principal(&codec, &StubDirectory::failing(), Some(&token)).await;
        assert_eq!(resolution, Resolution::PrincipalMissing);
        Ok(())
    }

    #[tokio::test]
    async fn known_user_is_found() -> anyhow::Result<()> {
        let codec = test_codec();
        let directory = StubDirectory::default().with_user(5, Role::Doctor);
        let token = codec.issue(5, ExtraClaims::default())?.token;

        let Resolution::PrincipalFound(identity) =
            resolve_principal(&codec, &directory, Some(&token)).await
        else {
            anyhow::bail!("principal not found");
        };

        assert_eq!(identity.user_id, 5);
        assert!(identity.has_role(Role::Doctor));
        assert_eq!(identity.claims.sub, "5");
        Ok(())
    }
}

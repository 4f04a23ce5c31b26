//! Authorization stages that run after routing and before the handler.

use axum::extract::{Request, State};
use axum::middleware::{Next, from_fn, from_fn_with_state};
use axum::response::Response;
use axum::routing::MethodRouter;
use carebook_postgres::types::Capability;

use crate::extract::{Path, Principal};
use crate::handler::Result;
use crate::handler::request::UserPathParams;

/// Extension trait for `axum::routing::`[`MethodRouter`] to gate a single
/// method endpoint.
///
/// Gates are route layers: a rejected request never reaches the handler and
/// unmatched routes still produce 404.
pub trait MethodRouterAuthExt<S> {
    /// Requires an authenticated principal.
    fn requires_authentication(self) -> Self;

    /// Requires an authenticated principal holding `capability`.
    fn requires(self, capability: Capability) -> Self;

    /// Requires the principal to be the user named by the `{user_id}` path segment.
    fn requires_self(self) -> Self;
}

impl<S> MethodRouterAuthExt<S> for MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn requires_authentication(self) -> Self {
        self.route_layer(from_fn(require_authentication))
    }

    fn requires(self, capability: Capability) -> Self {
        self.route_layer(from_fn_with_state(capability, require_capability))
    }

    fn requires_self(self) -> Self {
        self.route_layer(from_fn(require_self))
    }
}

/// Rejects anonymous requests with 401.
pub async fn require_authentication(
    principal: Principal,
    request: Request,
    next: Next,
) -> Result<Response> {
    principal.require_authenticated()?;
    Ok(next.run(request).await)
}

/// Rejects anonymous requests with 401 and principals lacking the capability with 403.
pub async fn require_capability(
    State(capability): State<Capability>,
    principal: Principal,
    request: Request,
    next: Next,
) -> Result<Response> {
    principal.require_capability(capability)?;
    Ok(next.run(request).await)
}

/// Rejects requests acting on another user's record with 401.
///
/// Anonymous requests are rejected before the path is looked at.
pub async fn require_self(
    principal: Principal,
    path_params: Result<Path<UserPathParams>>,
    request: Request,
    next: Next,
) -> Result<Response> {
    principal.require_authenticated()?;
    let Path(path_params) = path_params?;
    principal.require_self(path_params.user_id)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::{get, put};
    use axum_test::TestServer;
    use carebook_postgres::types::Role;
    use serde_json::Value;

    use super::*;
    use crate::extract::auth::test_identity;

    /// Router whose handlers count their invocations, with a fixed principal.
    fn gated_router(principal: Principal, calls: Arc<AtomicUsize>) -> Router {
        let counted = move || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                "ok"
            }
        };

        Router::new()
            .route(
                "/services",
                get(counted.clone())
                    .requires(Capability::ViewService)
                    .merge(put(counted.clone()).requires(Capability::AddService)),
            )
            .route("/users/{user_id}", put(counted.clone()).requires_self())
            .route("/me", get(counted).requires_authentication())
            .layer(axum::middleware::from_fn(
                move |mut request: Request, next: Next| {
                    let principal = principal.clone();
                    async move {
                        request.extensions_mut().insert(principal);
                        next.run(request).await
                    }
                },
            ))
    }

    #[tokio::test]
    async fn anonymous_is_unauthenticated() -> anyhow::Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let server = TestServer::new(gated_router(Principal::Anonymous, calls.clone()))?;

        for path in ["/services", "/me"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::UNAUTHORIZED);

            let body: Value = response.json();
            assert_eq!(body["status"], "unauthorized");
            assert_eq!(body["message"], "Valid JWT token required");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn patient_is_forbidden_from_staff_methods() -> anyhow::Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let principal = Principal::from(test_identity(3, Role::Patient));
        let server = TestServer::new(gated_router(principal, calls.clone()))?;

        server.get("/services").await.assert_status_ok();

        let response = server.put("/services").await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["status"], "forbidden");
        assert_eq!(body["message"], "missing required permission: add_service");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn self_gate_runs_handler_only_for_owner() -> anyhow::Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let principal = Principal::from(test_identity(7, Role::Patient));
        let server = TestServer::new(gated_router(principal, calls.clone()))?;

        server.put("/users/7").await.assert_status_ok();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let response = server.put("/users/8").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(
            body["message"],
            "current user not allowed to modify another user"
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn self_gate_authenticates_before_parsing_path() -> anyhow::Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let server = TestServer::new(gated_router(Principal::Anonymous, calls.clone()))?;

        for path in ["/users/abc", "/users/8"] {
            let response = server.put(path).expect_failure().await;
            response.assert_status(StatusCode::UNAUTHORIZED);

            let body: Value = response.json();
            assert_eq!(body["status"], "unauthorized");
            assert_eq!(body["error"], "Authentication Required");
        }

        let owner = Principal::from(test_identity(7, Role::Patient));
        let server = TestServer::new(gated_router(owner, calls.clone()))?;
        server
            .put("/users/abc")
            .expect_failure()
            .await
            .assert_status_bad_request();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn principal_defaults_to_anonymous() -> anyhow::Result<()> {
        let router = Router::new().route(
            "/",
            get(|principal: Principal| async move { principal.is_authenticated().to_string() }),
        );
        let server = TestServer::new(router)?;

        server.get("/").await.assert_text("false");
        Ok(())
    }
}

//! User profile handlers.
//!
//! Any authenticated principal may read a profile. Only the owner may change
//! or delete it.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, put};
use carebook_postgres::PgClient;
use carebook_postgres::model::UpdateUser as UpdateUserModel;
use carebook_postgres::query::UserRepository;

use crate::extract::{AuthState, Json, Path, ValidateJson};
use crate::handler::request::{UpdateUser, UserPathParams};
use crate::handler::response::{Status, User, UserResponse};
use crate::handler::{Error, ErrorKind, Result};
use crate::middleware::MethodRouterAuthExt;
use crate::service::{PasswordHasher, ServiceState, parse_roles};

/// Tracing target for user operations.
const TRACING_TARGET: &str = "carebook_server::handler::users";

fn user_not_found(user_id: i64) -> Error<'static> {
    ErrorKind::NotFound.with_message(format!("User not found with ID {user_id}"))
}

/// Returns a user profile with its roles.
#[tracing::instrument(skip_all, fields(user_id = path_params.user_id))]
async fn read_user(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
    Path(path_params): Path<UserPathParams>,
) -> Result<Json<UserResponse>> {
    tracing::debug!(
        target: TRACING_TARGET,
        requested_by = identity.user_id,
        "reading user"
    );

    let mut conn = pg_client.get_connection().await?;
    let Some(user) = conn.find_user_by_id(path_params.user_id).await? else {
        return Err(user_not_found(path_params.user_id));
    };

    let roles = parse_roles(user.id, &conn.find_user_group_names(user.id).await?);
    let response = UserResponse::new(User::from_model(user, roles), Status::Success);
    Ok(Json(response))
}

/// Applies a partial update to the caller's own profile.
#[tracing::instrument(skip_all, fields(user_id = path_params.user_id))]
async fn update_user(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    Path(path_params): Path<UserPathParams>,
    ValidateJson(request): ValidateJson<UpdateUser>,
) -> Result<Json<UserResponse>> {
    let password_hash = request
        .password
        .as_deref()
        .map(|password| password_hasher.hash_password(password))
        .transpose()?;

    let changes = UpdateUserModel {
        username: request.username,
        email: request.email,
        password_hash,
    };

    let mut conn = pg_client.get_connection().await?;
    let Some(user) = conn.update_user(path_params.user_id, changes).await? else {
        return Err(user_not_found(path_params.user_id));
    };

    tracing::info!(target: TRACING_TARGET, "user updated");

    let roles = parse_roles(user.id, &conn.find_user_group_names(user.id).await?);
    let response = UserResponse::new(User::from_model(user, roles), Status::Updated);
    Ok(Json(response))
}

/// Deletes the caller's own account and returns what was removed.
#[tracing::instrument(skip_all, fields(user_id = path_params.user_id))]
async fn delete_user(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<UserPathParams>,
) -> Result<Json<UserResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let Some(user) = conn.find_user_by_id(path_params.user_id).await? else {
        return Err(user_not_found(path_params.user_id));
    };

    let roles = parse_roles(user.id, &conn.find_user_group_names(user.id).await?);
    if !conn.delete_user(user.id).await? {
        return Err(user_not_found(path_params.user_id));
    }

    tracing::info!(target: TRACING_TARGET, "user deleted");

    let response = UserResponse::new(User::from_model(user, roles), Status::Deleted);
    Ok(Json(response))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    let owner_only = put(update_user)
        .delete(delete_user)
        .requires_self();

    Router::new().route(
        "/users/{user_id}",
        get(read_user).requires_authentication().merge(owner_only),
    )
}

#[cfg(test)]
mod tests {
    use carebook_postgres::types::Role;
    use serde_json::json;

    use crate::handler::test::{StubDirectory, create_test_server, token_for};

    #[tokio::test]
    async fn reading_requires_authentication() -> anyhow::Result<()> {
        let server = create_test_server(StubDirectory::default())?;

        let response = server.get("/api/users/7").expect_failure().await;
        response.assert_status_unauthorized();

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Authentication Required");
        assert_eq!(body["message"], "Valid JWT token required");
        assert_eq!(body["status"], "unauthorized");
        Ok(())
    }

    #[tokio::test]
    async fn foreign_profiles_cannot_be_modified() -> anyhow::Result<()> {
        let directory = StubDirectory::default().with_user(7, Role::Patient);
        let server = create_test_server(directory)?;

        let response = server
            .put("/api/users/8")
            .authorization_bearer(token_for(7)?)
            .json(&json!({ "username": "someone-else" }))
            .expect_failure()
            .await;
        response.assert_status_unauthorized();

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(
            body["message"],
            "current user not allowed to modify another user"
        );

        let response = server
            .delete("/api/users/8")
            .authorization_bearer(token_for(7)?)
            .expect_failure()
            .await;
        response.assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn non_numeric_ids_are_bad_requests() -> anyhow::Result<()> {
        let directory = StubDirectory::default().with_user(7, Role::Patient);
        let server = create_test_server(directory)?;

        let response = server
            .get("/api/users/seven")
            .authorization_bearer(token_for(7)?)
            .expect_failure()
            .await;
        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn anonymous_updates_are_unauthenticated_for_any_id() -> anyhow::Result<()> {
        let server = create_test_server(StubDirectory::default())?;

        for path in ["/api/users/abc", "/api/users/8"] {
            let response = server
                .put(path)
                .json(&json!({ "username": "intruder" }))
                .expect_failure()
                .await;
            response.assert_status_unauthorized();

            let body: serde_json::Value = response.json();
            assert_eq!(body["error"], "Authentication Required");
            assert_eq!(body["status"], "unauthorized");
        }

        Ok(())
    }
}

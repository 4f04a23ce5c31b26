//! Signup and login handlers.
//!
//! Login never reveals whether the account exists: an unknown identifier
//! and a wrong password produce the same 401, and both paths run a full
//! Argon2 verification.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use carebook_postgres::model::{NewUser, User as UserModel};
use carebook_postgres::query::{PermissionRepository, UserRepository};
use carebook_postgres::types::Role;
use carebook_postgres::{PgClient, PgConnection, PgError};

use crate::extract::{ExtraClaims, Json, TokenCodec, ValidateJson};
use crate::handler::request::{Login, Signup};
use crate::handler::response::{LoginResponse, Status, User, UserResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState, SharedDirectory};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "carebook_server::handler::authentication";

/// Parses the requested role name.
fn parse_role(name: &str) -> Result<Role> {
    name.parse::<Role>().map_err(|_| {
        tracing::debug!(target: TRACING_TARGET, role = %name, "unknown role requested");
        ErrorKind::BadRequest.with_message("invalid role")
    })
}

/// Creates an account and, when a role is given, joins its group.
#[tracing::instrument(skip_all)]
async fn signup(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    ValidateJson(request): ValidateJson<Signup>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let role = request.role.as_deref().map(parse_role).transpose()?;

    tracing::debug!(
        target: TRACING_TARGET,
        username = %request.username,
        role = ?role,
        "signing up"
    );

    let password_hash = password_hasher.hash_password(&request.password)?;
    let mut conn = pg_client.get_connection().await?;

    let group = match role {
        Some(role) => {
            let group = conn.find_group_by_name(role.name()).await?;
            Some(group.ok_or_else(|| {
                tracing::warn!(
                    target: TRACING_TARGET,
                    role = %role,
                    "role group is missing, the catalog has not been seeded"
                );
                ErrorKind::BadRequest.with_message("invalid role")
            })?)
        }
        None => None,
    };

    let new_user = NewUser {
        username: request.username,
        email: request.email,
        password_hash,
    };

    let user = conn
        .transaction(|conn| {
            Box::pin(async move {
                let conn: &mut PgConnection = conn;
                let user = conn.create_user(new_user).await?;
                if let Some(group) = group {
                    conn.assign_user_group(user.id, group.id).await?;
                }
                Ok::<UserModel, PgError>(user)
            })
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = user.id,
        "user signed up"
    );

    let user = User::from_model(user, role.into_iter().collect());
    let response = UserResponse::new(user, Status::Created);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Verifies credentials and issues an access token.
#[tracing::instrument(skip_all)]
async fn login(
    State(principals): State<SharedDirectory>,
    State(password_hasher): State<PasswordHasher>,
    State(token_codec): State<TokenCodec>,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<Json<LoginResponse>> {
    let Some(identifier) = request.identifier() else {
        return Err(ErrorKind::BadRequest.with_message("Either 'username' or 'email' is required"));
    };

    let Some(record) = principals.find_credentials(identifier).await? else {
        password_hasher.verify_dummy_password(&request.password);
        tracing::warn!(
            target: TRACING_TARGET,
            identifier = ?identifier,
            "login failed"
        );
        return Err(ErrorKind::InvalidCredentials.into_error());
    };

    password_hasher
        .verify_password(&request.password, &record.password_hash)
        .inspect_err(|_| {
            tracing::warn!(
                target: TRACING_TARGET,
                user_id = record.user_id,
                "login failed"
            );
        })?;

    let role = record.roles.first().map(|role| role.name());
    let extra = ExtraClaims::new(role, record.username.as_str());
    let issued = token_codec.issue(record.user_id, extra)?;

    let expires_at = issued.claims.expires_at();
    tracing::info!(
        target: TRACING_TARGET,
        user_id = record.user_id,
        expires_at = %expires_at,
        "user logged in"
    );

    let user = User::from_credentials(record);
    Ok(Json(LoginResponse::new(issued.token, expires_at, user)))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

#[cfg(test)]
mod tests {
    use carebook_postgres::types::Role;
    use serde_json::{Value, json};

    use crate::handler::test::{StubDirectory, create_test_server, test_codec};

    #[tokio::test]
    async fn signup_rejects_unknown_role() -> anyhow::Result<()> {
        let server = create_test_server(StubDirectory::default())?;

        let response = server
            .post("/api/auth/signup")
            .json(&json!({
                "username": "mallory",
                "password": "hunter22",
                "role": "Superuser",
            }))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "invalid role");
        assert_eq!(body["status"], "bad-request");
        Ok(())
    }

    #[tokio::test]
    async fn signup_validates_payload() -> anyhow::Result<()> {
        let server = create_test_server(StubDirectory::default())?;

        let response = server
            .post("/api/auth/signup")
            .json(&json!({ "username": "", "password": "hunter22" }))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn login_requires_an_identifier() -> anyhow::Result<()> {
        let server = create_test_server(StubDirectory::default())?;

        let response = server
            .post("/api/auth/login")
            .json(&json!({ "password": "hunter22" }))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Data Invalid");
        assert!(
            body["message"]
                .as_str()
                .is_some_and(|message| message.contains("Either 'username' or 'email' is required"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_issues_a_verifiable_token() -> anyhow::Result<()> {
        let directory = StubDirectory::default().with_account(7, Role::Doctor, "hunter22")?;
        let server = create_test_server(directory)?;

        let response = server
            .post("/api/auth/login")
            .json(&json!({ "username": "user-7", "password": "hunter22" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["user"]["id"], 7);
        assert_eq!(body["user"]["username"], "user-7");

        let token = body["access_token"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("missing access token"))?;
        let claims = test_codec()
            .verify(token)
            .ok_or_else(|| anyhow::anyhow!("issued token rejected"))?;
        assert_eq!(claims.sub, 7.to_string());
        assert_eq!(claims.extra.role.as_deref(), Some("Doctor"));
        assert_eq!(claims.extra.username.as_deref(), Some("user-7"));
        Ok(())
    }

    #[tokio::test]
    async fn login_accepts_email() -> anyhow::Result<()> {
        let directory = StubDirectory::default().with_account(9, Role::Patient, "hunter22")?;
        let server = create_test_server(directory)?;

        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": "user-9@carebook.test", "password": "hunter22" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["user"]["id"], 9);
        Ok(())
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() -> anyhow::Result<()> {
        let directory = StubDirectory::default().with_account(7, Role::Patient, "hunter22")?;
        let server = create_test_server(directory)?;

        let wrong_password = server
            .post("/api/auth/login")
            .json(&json!({ "username": "user-7", "password": "wrong-password" }))
            .expect_failure()
            .await;
        let unknown_user = server
            .post("/api/auth/login")
            .json(&json!({ "username": "nobody", "password": "hunter22" }))
            .expect_failure()
            .await;

        wrong_password.assert_status_unauthorized();
        unknown_user.assert_status_unauthorized();

        let wrong_password: Value = wrong_password.json();
        let unknown_user: Value = unknown_user.json();
        assert_eq!(wrong_password, unknown_user);
        assert_eq!(wrong_password["error"], "Credential Invalid");
        assert_eq!(wrong_password["status"], "unauthorized");
        Ok(())
    }
}

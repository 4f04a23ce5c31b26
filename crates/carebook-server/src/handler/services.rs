//! Service catalog handlers.
//!
//! Every endpoint is gated by a `*_service` capability. A service always
//! belongs to a user holding the Doctor role.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use carebook_postgres::model::UserSummary as UserSummaryModel;
use carebook_postgres::query::{ServiceRepository, UserRepository};
use carebook_postgres::types::{Capability, Role};
use carebook_postgres::{PgClient, PgConnection};

use crate::extract::{Json, Path, ValidateJson};
use crate::handler::request::{CreateService, ServicePathParams, UpdateService};
use crate::handler::response::{Service, ServiceResponse, ServicesResponse, Status};
use crate::handler::{Error, ErrorKind, Result};
use crate::middleware::MethodRouterAuthExt;
use crate::service::ServiceState;

/// Tracing target for service catalog operations.
const TRACING_TARGET: &str = "carebook_server::handler::services";

fn service_not_found(service_id: i64) -> Error<'static> {
    ErrorKind::NotFound.with_message(format!("Service not found with id {service_id}"))
}

fn doctor_not_found(doctor_id: i64) -> Error<'static> {
    tracing::debug!(target: TRACING_TARGET, doctor_id, "doctor lookup failed");
    ErrorKind::NotFound.with_message("Doctor not found")
}

/// Loads a user that holds the Doctor role.
async fn find_doctor(conn: &mut PgConnection, doctor_id: i64) -> Result<UserSummaryModel> {
    let Some(doctor) = conn.find_user_by_id(doctor_id).await? else {
        return Err(doctor_not_found(doctor_id));
    };

    if !conn.user_has_role(doctor.id, Role::Doctor).await? {
        return Err(doctor_not_found(doctor_id));
    }

    Ok(UserSummaryModel {
        id: doctor.id,
        username: doctor.username,
    })
}

/// Lists every service with its doctor.
#[tracing::instrument(skip_all)]
async fn list_services(State(pg_client): State<PgClient>) -> Result<Json<ServicesResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let services = conn.list_services().await?;

    tracing::debug!(target: TRACING_TARGET, count = services.len(), "services listed");

    let response = ServicesResponse {
        services: services
            .into_iter()
            .map(|(service, doctor)| Service::from_model(service, doctor))
            .collect(),
        status: Status::Success,
    };

    Ok(Json(response))
}

/// Creates a service offered by an existing doctor.
#[tracing::instrument(skip_all)]
async fn create_service(
    State(pg_client): State<PgClient>,
    ValidateJson(request): ValidateJson<CreateService>,
) -> Result<(StatusCode, Json<ServiceResponse>)> {
    let mut conn = pg_client.get_connection().await?;
    let doctor = find_doctor(&mut conn, request.doctor_id).await?;
    let service = conn.create_service(request.into_model()).await?;

    tracing::info!(
        target: TRACING_TARGET,
        service_id = service.id,
        doctor_id = doctor.id,
        "service created"
    );

    let response = ServiceResponse::new(Service::from_model(service, doctor), Status::Created);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Returns one service with its doctor.
#[tracing::instrument(skip_all, fields(service_id = path_params.service_id))]
async fn read_service(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<ServicePathParams>,
) -> Result<Json<ServiceResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let Some((service, doctor)) = conn.find_service_by_id(path_params.service_id).await? else {
        return Err(service_not_found(path_params.service_id));
    };

    let response = ServiceResponse::new(Service::from_model(service, doctor), Status::Success);
    Ok(Json(response))
}

/// Applies a partial update to a service.
#[tracing::instrument(skip_all, fields(service_id = path_params.service_id))]
async fn update_service(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<ServicePathParams>,
    ValidateJson(request): ValidateJson<UpdateService>,
) -> Result<Json<ServiceResponse>> {
    let mut conn = pg_client.get_connection().await?;

    if let Some(doctor_id) = request.doctor_id {
        find_doctor(&mut conn, doctor_id).await?;
    }

    if conn
        .update_service(path_params.service_id, request.into_model())
        .await?
        .is_none()
    {
        return Err(service_not_found(path_params.service_id));
    }

    let Some((service, doctor)) = conn.find_service_by_id(path_params.service_id).await? else {
        return Err(service_not_found(path_params.service_id));
    };

    tracing::info!(target: TRACING_TARGET, "service updated");

    let response = ServiceResponse::new(Service::from_model(service, doctor), Status::Updated);
    Ok(Json(response))
}

/// Deletes a service and returns what was removed.
#[tracing::instrument(skip_all, fields(service_id = path_params.service_id))]
async fn delete_service(
    State(pg_client): State<PgClient>,
    Path(path_params): Path<ServicePathParams>,
) -> Result<Json<ServiceResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let Some((service, doctor)) = conn.find_service_by_id(path_params.service_id).await? else {
        return Err(service_not_found(path_params.service_id));
    };

    if !conn.delete_service(service.id).await? {
        return Err(service_not_found(path_params.service_id));
    }

    tracing::info!(target: TRACING_TARGET, "service deleted");

    let response = ServiceResponse::new(Service::from_model(service, doctor), Status::Deleted);
    Ok(Json(response))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route(
            "/services",
            get(list_services)
                .requires(Capability::ViewService)
                .merge(post(create_service).requires(Capability::AddService)),
        )
        .route(
            "/services/{service_id}",
            get(read_service)
                .requires(Capability::ViewService)
                .merge(put(update_service).requires(Capability::ChangeService))
                .merge(delete(delete_service).requires(Capability::DeleteService)),
        )
}

#[cfg(test)]
mod tests {
    use carebook_postgres::types::Role;
    use serde_json::json;

    use crate::handler::test::{StubDirectory, create_test_server, token_for};

    fn new_service() -> serde_json::Value {
        json!({
            "name": "General checkup",
            "address": "1 Main Street",
            "doctor_id": 2,
        })
    }

    #[tokio::test]
    async fn anonymous_requests_are_unauthenticated() -> anyhow::Result<()> {
        let server = create_test_server(StubDirectory::default())?;

        let response = server
            .post("/api/services")
            .json(&new_service())
            .expect_failure()
            .await;
        response.assert_status_unauthorized();

        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "unauthorized");

        let response = server.get("/api/services").expect_failure().await;
        response.assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn patients_cannot_add_services() -> anyhow::Result<()> {
        let directory = StubDirectory::default().with_user(3, Role::Patient);
        let server = create_test_server(directory)?;

        let response = server
            .post("/api/services")
            .authorization_bearer(token_for(3)?)
            .json(&new_service())
            .expect_failure()
            .await;
        response.assert_status_forbidden();

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Permission Denied");
        assert_eq!(body["message"], "missing required permission: add_service");
        assert_eq!(body["status"], "forbidden");
        Ok(())
    }

    #[tokio::test]
    async fn patients_cannot_change_or_delete_services() -> anyhow::Result<()> {
        let directory = StubDirectory::default().with_user(3, Role::Patient);
        let server = create_test_server(directory)?;

        let response = server
            .put("/api/services/1")
            .authorization_bearer(token_for(3)?)
            .json(&json!({ "name": "Renamed" }))
            .expect_failure()
            .await;
        response.assert_status_forbidden();

        let response = server
            .delete("/api/services/1")
            .authorization_bearer(token_for(3)?)
            .expect_failure()
            .await;
        response.assert_status_forbidden();
        Ok(())
    }

    #[tokio::test]
    async fn tokens_of_deleted_users_are_anonymous() -> anyhow::Result<()> {
        let server = create_test_server(StubDirectory::default())?;

        let response = server
            .get("/api/services")
            .authorization_bearer(token_for(42)?)
            .expect_failure()
            .await;
        response.assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn invalid_payloads_are_rejected_after_the_gate() -> anyhow::Result<()> {
        let directory = StubDirectory::default().with_user(2, Role::Doctor);
        let server = create_test_server(directory)?;

        let response = server
            .post("/api/services")
            .authorization_bearer(token_for(2)?)
            .json(&json!({ "name": "", "address": "1 Main Street", "doctor_id": 2 }))
            .expect_failure()
            .await;
        response.assert_status_bad_request();
        Ok(())
    }
}

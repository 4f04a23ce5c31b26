//! Appointment handlers, scoped to the calling patient.
//!
//! A patient only ever sees their own bookings. Appointments of other
//! patients are reported as missing.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use carebook_postgres::PgClient;
use carebook_postgres::model::NewAppointment;
use carebook_postgres::query::{AppointmentRepository, ServiceRepository};
use carebook_postgres::types::Capability;

use crate::extract::{AuthState, Json, Path, ValidateJson};
use crate::handler::request::{AppointmentPathParams, CreateAppointment};
use crate::handler::response::{
    Appointment, AppointmentResponse, AppointmentsResponse, Status,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::middleware::MethodRouterAuthExt;
use crate::service::ServiceState;

/// Tracing target for appointment operations.
const TRACING_TARGET: &str = "carebook_server::handler::appointments";

fn appointment_not_found(appointment_id: i64) -> Error<'static> {
    ErrorKind::NotFound.with_message(format!("Appointment not found with id {appointment_id}"))
}

/// Lists the caller's appointments ordered by slot.
#[tracing::instrument(skip_all, fields(patient_id = identity.user_id))]
async fn list_appointments(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
) -> Result<Json<AppointmentsResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let appointments = conn.list_patient_appointments(identity.user_id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        count = appointments.len(),
        "appointments listed"
    );

    let response = AppointmentsResponse {
        appointments: appointments
            .into_iter()
            .map(|(appointment, service)| Appointment::from_model(appointment, service))
            .collect(),
        status: Status::Success,
    };

    Ok(Json(response))
}

/// Books a slot with the doctor offering the service.
#[tracing::instrument(skip_all, fields(patient_id = identity.user_id))]
async fn create_appointment(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
    ValidateJson(request): ValidateJson<CreateAppointment>,
) -> Result<(StatusCode, Json<AppointmentResponse>)> {
    let mut conn = pg_client.get_connection().await?;
    let Some((service, _doctor)) = conn.find_service_by_id(request.service_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!("Service not found with id {}", request.service_id)));
    };

    let new_appointment = NewAppointment {
        scheduled_at: request.scheduled_at,
        service_id: service.id,
        doctor_id: service.doctor_id,
        patient_id: identity.user_id,
    };

    let appointment = conn.create_appointment(new_appointment).await?;

    tracing::info!(
        target: TRACING_TARGET,
        appointment_id = appointment.id,
        service_id = service.id,
        scheduled_at = appointment.scheduled_at,
        "appointment booked"
    );

    let appointment = Appointment::from_model(appointment, service);
    let response = AppointmentResponse::new(appointment, Status::Created);
    Ok((StatusCode::CREATED, Json(response)))
}

/// Returns one of the caller's appointments.
#[tracing::instrument(
    skip_all,
    fields(patient_id = identity.user_id, appointment_id = path_params.appointment_id)
)]
async fn read_appointment(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
    Path(path_params): Path<AppointmentPathParams>,
) -> Result<Json<AppointmentResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let Some((appointment, service)) = conn
        .find_patient_appointment(identity.user_id, path_params.appointment_id)
        .await?
    else {
        return Err(appointment_not_found(path_params.appointment_id));
    };

    let appointment = Appointment::from_model(appointment, service);
    Ok(Json(AppointmentResponse::new(appointment, Status::Success)))
}

/// Cancels one of the caller's appointments and returns what was removed.
#[tracing::instrument(
    skip_all,
    fields(patient_id = identity.user_id, appointment_id = path_params.appointment_id)
)]
async fn delete_appointment(
    State(pg_client): State<PgClient>,
    AuthState(identity): AuthState,
    Path(path_params): Path<AppointmentPathParams>,
) -> Result<Json<AppointmentResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let Some((appointment, service)) = conn
        .find_patient_appointment(identity.user_id, path_params.appointment_id)
        .await?
    else {
        return Err(appointment_not_found(path_params.appointment_id));
    };

    if !conn
        .delete_patient_appointment(identity.user_id, appointment.id)
        .await?
    {
        return Err(appointment_not_found(path_params.appointment_id));
    }

    tracing::info!(target: TRACING_TARGET, "appointment cancelled");

    let appointment = Appointment::from_model(appointment, service);
    Ok(Json(AppointmentResponse::new(appointment, Status::Deleted)))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route(
            "/appointments",
            get(list_appointments)
                .requires(Capability::ViewAppointment)
                .merge(post(create_appointment).requires(Capability::AddAppointment)),
        )
        .route(
            "/appointments/{appointment_id}",
            get(read_appointment)
                .requires(Capability::ViewAppointment)
                .merge(delete(delete_appointment).requires(Capability::DeleteAppointment)),
        )
}

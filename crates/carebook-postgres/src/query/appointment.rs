//! Appointment repository. Every read and delete is scoped to one patient.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Appointment, NewAppointment, Service};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for appointment database operations.
pub trait AppointmentRepository {
    /// Books a slot. Fails with `appointments_slot_unique` when it is taken.
    fn create_appointment(
        &mut self,
        appointment: NewAppointment,
    ) -> impl Future<Output = PgResult<Appointment>> + Send;

    /// Finds one of the patient's appointments together with its service.
    fn find_patient_appointment(
        &mut self,
        patient_id: i64,
        appointment_id: i64,
    ) -> impl Future<Output = PgResult<Option<(Appointment, Service)>>> + Send;

    /// Lists the patient's appointments ordered by slot.
    fn list_patient_appointments(
        &mut self,
        patient_id: i64,
    ) -> impl Future<Output = PgResult<Vec<(Appointment, Service)>>> + Send;

    /// Cancels one of the patient's appointments. Returns whether a row was removed.
    fn delete_patient_appointment(
        &mut self,
        patient_id: i64,
        appointment_id: i64,
    ) -> impl Future<Output = PgResult<bool>> + Send;
}

impl AppointmentRepository for PgConnection {
    async fn create_appointment(&mut self, appointment: NewAppointment) -> PgResult<Appointment> {
        use schema::appointments;

        let appointment = diesel::insert_into(appointments::table)
            .values(&appointment)
            .returning(Appointment::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            appointment_id = appointment.id,
            service_id = appointment.service_id,
            "appointment booked"
        );

        Ok(appointment)
    }

    async fn find_patient_appointment(
        &mut self,
        patient: i64,
        appointment_id: i64,
    ) -> PgResult<Option<(Appointment, Service)>> {
        use schema::{appointments, services};

        appointments::table
            .inner_join(services::table)
            .filter(appointments::id.eq(appointment_id))
            .filter(appointments::patient_id.eq(patient))
            .select((Appointment::as_select(), Service::as_select()))
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_patient_appointments(
        &mut self,
        patient: i64,
    ) -> PgResult<Vec<(Appointment, Service)>> {
        use schema::{appointments, services};

        appointments::table
            .inner_join(services::table)
            .filter(appointments::patient_id.eq(patient))
            .order((appointments::scheduled_at.asc(), appointments::id.asc()))
            .select((Appointment::as_select(), Service::as_select()))
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_patient_appointment(
        &mut self,
        patient: i64,
        appointment_id: i64,
    ) -> PgResult<bool> {
        use schema::appointments;

        let deleted = diesel::delete(
            appointments::table
                .filter(appointments::id.eq(appointment_id))
                .filter(appointments::patient_id.eq(patient)),
        )
        .execute(self)
        .await
        .map_err(PgError::from)?;

        Ok(deleted > 0)
    }
}

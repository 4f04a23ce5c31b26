//! Appointment model: one booked slot of a service.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::appointments;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Appointment {
    pub id: i64,
    /// Slot start as fractional epoch seconds.
    pub scheduled_at: f64,
    pub service_id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAppointment {
    pub scheduled_at: f64,
    pub service_id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
}

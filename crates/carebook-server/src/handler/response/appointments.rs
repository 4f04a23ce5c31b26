use carebook_postgres::model::{Appointment as AppointmentModel, Service as ServiceModel};
use serde::{Deserialize, Serialize};

use super::Status;

/// The service an appointment is booked for.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentService {
    pub id: i64,
    pub name: String,
    pub address: String,
}

/// A booked slot.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    /// Slot start as seconds since the Unix epoch.
    pub scheduled_at: f64,
    pub service: AppointmentService,
    pub doctor_id: i64,
    pub patient_id: i64,
}

impl Appointment {
    pub fn from_model(appointment: AppointmentModel, service: ServiceModel) -> Self {
        Self {
            id: appointment.id,
            scheduled_at: appointment.scheduled_at,
            service: AppointmentService {
                id: service.id,
                name: service.name,
                address: service.address,
            },
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
        }
    }
}

#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub appointment: Appointment,
    pub status: Status,
}

impl AppointmentResponse {
    pub fn new(appointment: Appointment, status: Status) -> Self {
        Self {
            appointment,
            status,
        }
    }
}

#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
    pub status: Status,
}

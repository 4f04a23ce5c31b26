//! Appointment request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for booking an appointment.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAppointment {
    /// Service to book.
    pub service_id: i64,

    /// Slot start as seconds since the Unix epoch.
    #[validate(range(min = 0.0))]
    pub scheduled_at: f64,
}

//! Path parameter types for HTTP handlers.

use serde::{Deserialize, Serialize};

/// Path parameters for user operations.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserPathParams {
    /// Identifier of the user.
    pub user_id: i64,
}

/// Path parameters for service operations.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ServicePathParams {
    /// Identifier of the service.
    pub service_id: i64,
}

/// Path parameters for appointment operations.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AppointmentPathParams {
    /// Identifier of the appointment.
    pub appointment_id: i64,
}

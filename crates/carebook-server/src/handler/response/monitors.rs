use serde::{Deserialize, Serialize};

use super::Status;

/// Liveness reply.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
    pub status: Status,
}

/// Readiness reply.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Whether a database connection could be acquired.
    pub database: bool,
    pub status: Status,
}

use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Tracing target for serialized error responses.
const TRACING_TARGET: &str = "carebook_server::handler::response";

/// JSON body returned for every failed request.
///
/// ```json
/// { "error": "Not Found", "message": "Service not found with id 4", "status": "not-found" }
/// ```
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Short error title.
    pub error: Cow<'a, str>,
    /// Human-readable explanation safe for client display.
    pub message: Cow<'a, str>,
    /// Kebab-case status word.
    pub status: Cow<'a, str>,

    /// HTTP status code (not serialized in JSON).
    #[serde(skip)]
    pub code: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "Data Invalid",
        "The request data is invalid",
        "bad-request",
        StatusCode::BAD_REQUEST,
    );
    pub const CONFLICT: Self = Self::new(
        "Conflict",
        "The resource already exists",
        "conflict",
        StatusCode::CONFLICT,
    );
    pub const FORBIDDEN: Self = Self::new(
        "Permission Denied",
        "You do not have permission to perform this action",
        "forbidden",
        StatusCode::FORBIDDEN,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "Server Error",
        "An unexpected error occurred",
        "server-error",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    // Authentication Errors
    pub const INVALID_CREDENTIALS: Self = Self::new(
        "Credential Invalid",
        "invalid email or password",
        "unauthorized",
        StatusCode::UNAUTHORIZED,
    );
    pub const NOT_FOUND: Self = Self::new(
        "Not Found",
        "The requested resource was not found",
        "not-found",
        StatusCode::NOT_FOUND,
    );
    pub const UNAUTHENTICATED: Self = Self::new(
        "Authentication Required",
        "Valid JWT token required",
        "unauthorized",
        StatusCode::UNAUTHORIZED,
    );
    pub const UNAUTHORIZED: Self = Self::new(
        "Unauthorized",
        "current user not allowed to modify another user",
        "unauthorized",
        StatusCode::UNAUTHORIZED,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(error: &'a str, message: &'a str, status: &'a str, code: StatusCode) -> Self {
        Self {
            error: Cow::Borrowed(error),
            message: Cow::Borrowed(message),
            status: Cow::Borrowed(status),
            code,
        }
    }

    /// Replaces the default message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        if self.code.is_server_error() {
            tracing::error!(
                target: TRACING_TARGET,
                code = %self.code,
                error = %self.error,
                message = %self.message,
                "http error response"
            );
        } else {
            tracing::debug!(
                target: TRACING_TARGET,
                code = %self.code,
                error = %self.error,
                message = %self.message,
                "http error response"
            );
        }

        (self.code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_three_fields() -> anyhow::Result<()> {
        let response = ErrorResponse::NOT_FOUND.with_message("Service not found with id 4");
        let json = serde_json::to_value(&response)?;

        assert_eq!(json["error"], "Not Found");
        assert_eq!(json["message"], "Service not found with id 4");
        assert_eq!(json["status"], "not-found");
        assert_eq!(json.as_object().map(|o| o.len()), Some(3));
        Ok(())
    }

    #[test]
    fn response_status_matches_code() {
        let response = ErrorResponse::FORBIDDEN.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

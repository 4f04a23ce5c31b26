//! Database error to HTTP error conversion.

use carebook_postgres::PgError;
use carebook_postgres::types::{ConstraintCategory, ConstraintViolation};

use crate::handler::{Error, ErrorKind};

/// Tracing target for database errors surfaced through handlers.
const TRACING_TARGET: &str = "carebook_server::postgres_constraints";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        let kind = match (constraint, constraint.categorize()) {
            // A missing group row means the requested role is not in the catalog.
            (ConstraintViolation::UserGroupsGroupFk, _) => ErrorKind::BadRequest,
            (_, ConstraintCategory::Uniqueness) => ErrorKind::Conflict,
            (_, ConstraintCategory::ForeignKey) => ErrorKind::NotFound,
            (_, ConstraintCategory::Validation) => ErrorKind::BadRequest,
        };

        kind.with_message(constraint.error_message())
            .with_context(constraint.constraint_name())
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        match error {
            PgError::Config(config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "database configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database timeout",
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Connection(connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Migration(migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "database migration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Query(ref query_error) => {
                if let Some(constraint) = error.constraint_violation() {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        constraint = constraint.constraint_name(),
                        error = %query_error,
                        "query error (constraint violation)"
                    );
                    return constraint.into();
                }

                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "query error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Unexpected(unexpected_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %unexpected_error,
                    "unexpected database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniqueness_maps_to_conflict() {
        let error: Error = ConstraintViolation::AppointmentsSlotUnique.into();
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(
            error.message(),
            Some("This time slot is already booked for the service")
        );
    }

    #[test]
    fn missing_doctor_maps_to_not_found() {
        let error: Error = ConstraintViolation::ServicesDoctorFk.into();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("Doctor not found"));
    }

    #[test]
    fn unknown_role_maps_to_bad_request() {
        let error: Error = ConstraintViolation::UserGroupsGroupFk.into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("invalid role"));
    }

    #[test]
    fn unexpected_errors_are_internal() {
        let error: Error = PgError::Unexpected("boom".into()).into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.message(), None);
    }
}

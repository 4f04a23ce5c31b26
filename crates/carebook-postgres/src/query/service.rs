//! Service repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{NewService, Service, UpdateService, UserSummary};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for service database operations.
///
/// Read queries return the service together with its doctor.
pub trait ServiceRepository {
    /// Inserts a new service.
    fn create_service(
        &mut self,
        service: NewService,
    ) -> impl Future<Output = PgResult<Service>> + Send;

    /// Finds a service and its doctor by service id.
    fn find_service_by_id(
        &mut self,
        service_id: i64,
    ) -> impl Future<Output = PgResult<Option<(Service, UserSummary)>>> + Send;

    /// Lists every service with its doctor, ordered by id.
    fn list_services(
        &mut self,
    ) -> impl Future<Output = PgResult<Vec<(Service, UserSummary)>>> + Send;

    /// Applies a partial update. Returns `None` when the service does not exist.
    fn update_service(
        &mut self,
        service_id: i64,
        changes: UpdateService,
    ) -> impl Future<Output = PgResult<Option<Service>>> + Send;

    /// Deletes a service. Returns whether a row was removed.
    fn delete_service(&mut self, service_id: i64) -> impl Future<Output = PgResult<bool>> + Send;
}

impl ServiceRepository for PgConnection {
    async fn create_service(&mut self, service: NewService) -> PgResult<Service> {
        use schema::services;

        let service = diesel::insert_into(services::table)
            .values(&service)
            .returning(Service::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(target: TRACING_TARGET_QUERY, service_id = service.id, "service created");
        Ok(service)
    }

    async fn find_service_by_id(
        &mut self,
        service_id: i64,
    ) -> PgResult<Option<(Service, UserSummary)>> {
        use schema::{services, users};

        services::table
            .inner_join(users::table)
            .filter(services::id.eq(service_id))
            .select((Service::as_select(), UserSummary::as_select()))
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_services(&mut self) -> PgResult<Vec<(Service, UserSummary)>> {
        use schema::{services, users};

        services::table
            .inner_join(users::table)
            .order(services::id.asc())
            .select((Service::as_select(), UserSummary::as_select()))
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_service(
        &mut self,
        service_id: i64,
        changes: UpdateService,
    ) -> PgResult<Option<Service>> {
        use schema::services::dsl::*;

        if changes.is_empty() {
            return services
                .filter(id.eq(service_id))
                .select(Service::as_select())
                .first(self)
                .await
                .optional()
                .map_err(PgError::from);
        }

        diesel::update(services.filter(id.eq(service_id)))
            .set(&changes)
            .returning(Service::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn delete_service(&mut self, service_id: i64) -> PgResult<bool> {
        use schema::services::dsl::*;

        let deleted = diesel::delete(services.filter(id.eq(service_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }
}

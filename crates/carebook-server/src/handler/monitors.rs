//! Liveness and database health probes.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use carebook_postgres::PgClient;

use crate::extract::Json;
use crate::handler::response::{HealthResponse, PingResponse, Status};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "carebook_server::handler::monitors";

/// Answers without touching any dependency.
#[tracing::instrument(skip_all)]
async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong".to_owned(),
        status: Status::Success,
    })
}

/// Reports whether a database connection can be acquired.
#[tracing::instrument(skip_all)]
async fn health(State(pg_client): State<PgClient>) -> Json<HealthResponse> {
    let database = pg_client.get_connection().await.is_ok();
    let pool = pg_client.pool_status();

    tracing::debug!(
        target: TRACING_TARGET,
        database,
        pool_size = pool.size,
        pool_available = pool.available,
        "health status checked"
    );

    Json(HealthResponse {
        database,
        status: Status::Success,
    })
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use crate::handler::test::{StubDirectory, create_test_server};

    #[tokio::test]
    async fn ping_is_public() -> anyhow::Result<()> {
        let server = create_test_server(StubDirectory::default())?;

        let response = server.get("/api/ping").await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({
            "message": "pong",
            "status": "success",
        }));

        Ok(())
    }
}

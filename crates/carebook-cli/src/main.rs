#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use carebook_postgres::PgClient;
use carebook_postgres::catalog::seed_catalog_in_transaction;
use carebook_server::handler::routes;
use carebook_server::middleware::{RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt};
use carebook_server::service::ServiceState;

use crate::config::{Cli, Command, SeedArgs, ServeArgs};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "carebook_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "carebook_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "carebook_cli::config";
pub const TRACING_TARGET_SEED: &str = "carebook_cli::seed";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Seed(args) => seed(args).await,
    }
}

/// Builds the state, optionally seeds, and serves until shutdown.
async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting carebook server"
    );

    let service_config = args.service_config()?;
    let state = ServiceState::from_config(&service_config)
        .await
        .context("failed to create service state")?;

    if args.seed_on_startup {
        run_seed(&state.postgres).await?;
    }

    let router = create_router(state, &args.recovery);
    server::serve_http(router, args.server).await?;

    Ok(())
}

/// Connects, applies migrations and seeds the catalog.
async fn seed(args: SeedArgs) -> anyhow::Result<()> {
    let pg_client = PgClient::new_with_migrations(args.postgres)
        .await
        .context("failed to connect to postgres")?;

    run_seed(&pg_client).await
}

async fn run_seed(pg_client: &PgClient) -> anyhow::Result<()> {
    let report = seed_catalog_in_transaction(pg_client)
        .await
        .context("failed to seed the role and capability catalog")?;

    for (group, codenames) in &report.assignments {
        tracing::info!(
            target: TRACING_TARGET_SEED,
            group = %group,
            capabilities = ?codenames,
            "role seeded"
        );
    }

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost), catches panics and enforces timeouts
/// 2. Observability, request ids and tracing spans
/// 3. Routes (innermost), the authentication gate and handlers
fn create_router(state: ServiceState, recovery: &RecoveryConfig) -> Router {
    routes(state).with_observability().with_recovery(recovery)
}

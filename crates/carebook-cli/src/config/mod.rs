//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── serve: ServeArgs
//! │   ├── server: ServerConfig       # Host, port, shutdown
//! │   ├── recovery: RecoveryConfig   # Request timeout
//! │   ├── postgres: PgConfig         # Database url and pool
//! │   └── auth: AuthConfig           # Token secret and lifetime
//! └── seed: SeedArgs
//!     └── postgres: PgConfig
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//!
//! ```bash
//! carebook serve --postgres-url "postgresql://..." --jwt-secret "..." --port 8080
//!
//! POSTGRES_URL="postgresql://..." JWT_SECRET="..." PORT=8080 carebook serve
//! ```

mod server;

use std::process;

use anyhow::Context;
use carebook_postgres::PgConfig;
use carebook_server::middleware::RecoveryConfig;
use carebook_server::service::{AuthConfig, ServiceConfig};
use clap::{Args, Parser, Subcommand};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "carebook")]
#[command(about = "Carebook appointment booking server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serves the HTTP API until SIGINT or SIGTERM.
    Serve(ServeArgs),
    /// Creates or repairs the role and capability catalog, then exits.
    Seed(SeedArgs),
}

/// Arguments of `carebook serve`.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Timeout and panic recovery configuration.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Database configuration.
    #[clap(flatten)]
    pub postgres: PgConfig,

    /// Token signing configuration.
    #[clap(flatten)]
    pub auth: AuthConfig,

    /// Seeds the role and capability catalog before accepting requests.
    #[arg(long, env = "SEED_ON_STARTUP", default_value_t = false)]
    pub seed_on_startup: bool,
}

impl ServeArgs {
    /// Validates the configuration and assembles the [`ServiceConfig`].
    pub fn service_config(&self) -> anyhow::Result<ServiceConfig> {
        self.server
            .validate()
            .context("invalid server configuration")?;

        ServiceConfig::builder()
            .with_postgres(self.postgres.clone())
            .with_auth(self.auth.clone())
            .build()
            .context("invalid service configuration")
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        self.server.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            jwt_ttl_minutes = self.auth.jwt_ttl_minutes,
            seed_on_startup = self.seed_on_startup,
            "service configuration"
        );

        log_postgres(&self.postgres);
    }
}

/// Arguments of `carebook seed`.
#[derive(Debug, Clone, Args)]
pub struct SeedArgs {
    /// Database configuration.
    #[clap(flatten)]
    pub postgres: PgConfig,
}

impl SeedArgs {
    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        log_postgres(&self.postgres);
    }
}

fn log_postgres(config: &PgConfig) {
    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        database_url = %config.database_url_masked(),
        postgres_max_connections = config.postgres_max_connections,
        postgres_connection_timeout_secs = ?config.postgres_connection_timeout_secs,
        postgres_idle_timeout_secs = ?config.postgres_idle_timeout_secs,
        "database configuration"
    );
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded first so that clap's `env` fallbacks see its values.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Logs build information and the selected command's configuration.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            dotenv = cfg!(feature = "dotenv"),
            "build information"
        );

        match &self.command {
            Command::Serve(args) => args.log(),
            Command::Seed(args) => args.log(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_serve() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "carebook",
            "serve",
            "--postgres-url",
            "postgresql://localhost/carebook",
            "--jwt-secret",
            "secret",
            "--port",
            "8080",
            "--seed-on-startup",
        ])?;

        let Command::Serve(args) = cli.command else {
            anyhow::bail!("expected the serve command");
        };

        assert_eq!(args.server.port, 8080);
        assert!(args.seed_on_startup);
        assert_eq!(args.auth.jwt_ttl_minutes, 30);

        let config = args.service_config()?;
        assert_eq!(config.auth.jwt_secret, "secret");
        Ok(())
    }

    #[test]
    fn seed_does_not_need_a_secret() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "carebook",
            "seed",
            "--postgres-url",
            "postgresql://localhost/carebook",
        ])?;

        assert!(matches!(cli.command, Command::Seed(_)));
        Ok(())
    }
}

use std::fmt;

use carebook_postgres::{PgClient, PgConfig};
#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;

use crate::extract::{DEFAULT_TOKEN_TTL_MINUTES, TokenCodec};
use crate::service::SessionKeys;
use crate::{Error, Result, TRACING_TARGET_SERVICE};

/// Token signing configuration.
#[derive(Clone)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct AuthConfig {
    /// Shared HS256 secret used to sign and verify access tokens.
    #[cfg_attr(feature = "config", arg(long, env = "JWT_SECRET", hide_env_values = true))]
    pub jwt_secret: String,

    /// Access token lifetime in minutes.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "JWT_TTL_MINUTES", default_value_t = DEFAULT_TOKEN_TTL_MINUTES)
    )]
    pub jwt_ttl_minutes: u32,
}

impl AuthConfig {
    /// Creates a configuration with the default token lifetime.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
        }
    }

    /// Sets the token lifetime.
    pub fn with_ttl_minutes(mut self, minutes: u32) -> Self {
        self.jwt_ttl_minutes = minutes;
        self
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"****")
            .field("jwt_ttl_minutes", &self.jwt_ttl_minutes)
            .finish()
    }
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Builder)]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Postgres connection and pool settings.
    #[builder(default)]
    pub postgres: PgConfig,

    /// Token signing settings.
    pub auth: AuthConfig,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Connects to Postgres and runs pending migrations.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        let pg_client = PgClient::new_with_migrations(self.postgres.clone())
            .await
            .map_err(|e| {
                Error::internal("postgres", "Failed to initialize database client").with_source(e)
            })?;

        tracing::info!(
            target: TRACING_TARGET_SERVICE,
            database_url = %self.postgres.database_url_masked(),
            "connected to postgres"
        );

        Ok(pg_client)
    }

    /// Derives the token signing keys from the configured secret.
    pub fn load_session_keys(&self) -> Result<SessionKeys> {
        SessionKeys::from_secret(&self.auth.jwt_secret)
    }

    /// Creates the token codec with the configured lifetime.
    pub fn token_codec(&self) -> Result<TokenCodec> {
        let keys = self.load_session_keys()?;
        Ok(TokenCodec::new(keys, self.auth.jwt_ttl_minutes))
    }
}

impl ServiceConfigBuilder {
    /// Wrapper for builder validation that returns String errors.
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        if let Some(auth) = &builder.auth {
            if auth.jwt_secret.trim().is_empty() {
                return Err("JWT secret cannot be empty".to_string());
            }

            if auth.jwt_ttl_minutes == 0 {
                return Err("JWT lifetime must be at least 1 minute".to_string());
            }
        }

        if let Some(postgres) = &builder.postgres {
            postgres.validate().map_err(|e| e.to_string())?;
        }

        Ok(())
    }
}

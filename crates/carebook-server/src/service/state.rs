use std::sync::Arc;

use carebook_postgres::PgClient;

use crate::extract::TokenCodec;
use crate::service::{PasswordHasher, ServiceConfig, SharedDirectory};
use crate::{Result, TRACING_TARGET_SERVICE};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection). Immutable after
/// startup; every field is cheap to clone.
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // External services:
    pub postgres: PgClient,
    pub principals: SharedDirectory,

    // Internal services:
    pub password_hasher: PasswordHasher,
    pub token_codec: TokenCodec,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to Postgres, applies migrations and derives the signing keys.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        let token_codec = service_config.token_codec()?;
        let postgres = service_config.connect_postgres().await?;

        tracing::debug!(
            target: TRACING_TARGET_SERVICE,
            token_ttl_minutes = token_codec.ttl_minutes(),
            "service state initialized"
        );

        Ok(Self::from_parts(postgres, token_codec))
    }

    /// Assembles state from an existing client, using it as the principal directory.
    pub fn from_parts(postgres: PgClient, token_codec: TokenCodec) -> Self {
        Self {
            principals: Arc::new(postgres.clone()),
            postgres,
            password_hasher: PasswordHasher::new(),
            token_codec,
        }
    }

    /// Replaces the principal directory.
    pub fn with_principals(mut self, principals: SharedDirectory) -> Self {
        self.principals = principals;
        self
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(postgres: PgClient);
impl_di!(principals: SharedDirectory);

// Internal services:
impl_di!(password_hasher: PasswordHasher);
impl_di!(token_codec: TokenCodec);

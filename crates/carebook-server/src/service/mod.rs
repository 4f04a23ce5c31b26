//! Application state and dependency injection.

mod config;
mod directory;
mod security;
mod state;

pub use crate::service::config::{AuthConfig, ServiceConfig, ServiceConfigBuilder};
pub use crate::service::directory::{
    CredentialRecord, PrincipalDirectory, PrincipalRecord, SharedDirectory, parse_roles,
};
pub use crate::service::security::{PasswordHasher, SessionKeys};
pub use crate::service::state::ServiceState;
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

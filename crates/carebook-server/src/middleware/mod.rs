//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Authentication: resolves the [`Principal`] of every request
//! - Authorization: per-route gates that run after routing and before the handler
//! - Observability: request ids, sensitive header redaction, trace spans
//! - Recovery: timeouts, panics and tower service errors
//!
//! ```rust,ignore
//! use carebook_server::middleware::{RouterObservabilityExt, RouterRecoveryExt};
//!
//! let app = routes(state)
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```
//!
//! [`Principal`]: crate::extract::Principal

mod authentication;
mod authorization;
mod observability;
mod recovery;

pub use authentication::{RouterAuthExt, authenticate, resolve_principal};
pub use authorization::{
    MethodRouterAuthExt, require_authentication, require_capability, require_self,
};
pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};

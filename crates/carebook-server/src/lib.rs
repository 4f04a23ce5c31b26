#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};

// Tracing target constants for consistent logging.

/// Tracing target for token issuance and the authentication gate.
pub const TRACING_TARGET_AUTHENTICATION: &str = "carebook_server::authentication";

/// Tracing target for capability and ownership checks.
pub const TRACING_TARGET_AUTHORIZATION: &str = "carebook_server::authorization";

/// Tracing target for service startup and state construction.
pub const TRACING_TARGET_SERVICE: &str = "carebook_server::service";

//! Request extractors.
//!
//! ## Authentication & Authorization
//!
//! - [`Principal`] - who is calling, resolved by the authentication middleware
//! - [`AuthState`] - the authenticated caller, or a 401 rejection
//! - [`TokenCodec`] - issues and verifies access tokens
//!
//! ## Request Data Extraction
//!
//! - [`Json`] - JSON deserialization with uniform error responses
//! - [`ValidateJson`] - JSON extraction followed by `validator` checks
//! - [`Path`] - path parameter extraction with uniform error responses

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{
    AuthClaims, AuthState, DEFAULT_TOKEN_TTL_MINUTES, ExtraClaims, Identity, IssuedToken, Principal,
    Resolution, TokenCodec,
};
pub use crate::extract::reject::{Json, Path, ValidateJson};

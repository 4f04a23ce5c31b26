//! Bearer token handling and the per-request principal.
//!
//! - [`TokenCodec`] signs and verifies HS256 access tokens.
//! - [`Principal`] is resolved once per request by the authentication
//!   middleware and carries the predicates used by the authorization stages.
//! - [`AuthState`] extracts the authenticated [`Identity`] or rejects with 401.

mod auth_claims;
mod auth_state;
mod principal;
mod token_codec;

pub use self::auth_claims::{AuthClaims, ExtraClaims};
pub use self::auth_state::AuthState;
pub use self::principal::{Identity, Principal, Resolution};
#[cfg(test)]
pub(crate) use self::principal::tests::identity as test_identity;
pub use self::token_codec::{DEFAULT_TOKEN_TTL_MINUTES, IssuedToken, TokenCodec};

//! User request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for a partial user update.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUser {
    /// New login name.
    #[validate(length(min = 1, max = 100))]
    pub username: Option<String>,

    /// New email address.
    #[validate(email)]
    #[validate(length(max = 254))]
    pub email: Option<String>,

    /// New plaintext password.
    #[validate(length(min = 1, max = 128))]
    pub password: Option<String>,
}

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Status, User};

/// Response returned after a successful login.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// When the token stops being accepted.
    pub expires_at: Timestamp,
    pub user: User,
    pub status: Status,
}

impl LoginResponse {
    pub fn new(access_token: String, expires_at: Timestamp, user: User) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_owned(),
            expires_at,
            user,
            status: Status::SignedIn,
        }
    }
}

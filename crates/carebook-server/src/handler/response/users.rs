use carebook_postgres::model::{User as UserModel, UserSummary as UserSummaryModel};
use carebook_postgres::types::Role;
use serde::{Deserialize, Serialize};

use super::Status;
use crate::service::CredentialRecord;

/// Public view of a user account.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub roles: Vec<Role>,
}

impl User {
    pub fn from_model(user: UserModel, roles: Vec<Role>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            roles,
        }
    }

    pub fn from_credentials(record: CredentialRecord) -> Self {
        Self {
            id: record.user_id,
            username: record.username,
            email: record.email,
            roles: record.roles,
        }
    }
}

/// A user reference embedded in other resources.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}

impl From<UserSummaryModel> for UserSummary {
    fn from(user: UserSummaryModel) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
    pub status: Status,
}

impl UserResponse {
    pub fn new(user: User, status: Status) -> Self {
        Self { user, status }
    }
}

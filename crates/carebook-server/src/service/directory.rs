//! Lookup of the roles and capabilities behind a token subject.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use carebook_postgres::query::UserRepository;
use carebook_postgres::types::{Capability, Role};
use carebook_postgres::{PgClient, PgResult};

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::request::LoginIdentifier;

/// Everything the authentication gate needs to know about a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalRecord {
    pub user_id: i64,
    pub username: String,
    pub roles: Vec<Role>,
    pub capabilities: BTreeSet<Capability>,
}

impl PrincipalRecord {
    /// Builds a record from stored group names and permission codenames.
    ///
    /// Names that do not parse are skipped with a warning.
    pub fn from_names(
        user_id: i64,
        username: String,
        group_names: &[String],
        codenames: &[String],
    ) -> Self {
        Self {
            user_id,
            username,
            roles: parse_all(user_id, group_names),
            capabilities: parse_all(user_id, codenames),
        }
    }
}

/// Stored credentials of a user, looked up at login.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub user_id: i64,
    pub username: String,
    pub email: Option<String>,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub roles: Vec<Role>,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Parses stored group names into roles, skipping unknown names.
pub fn parse_roles(user_id: i64, group_names: &[String]) -> Vec<Role> {
    parse_all(user_id, group_names)
}

fn parse_all<T, C>(user_id: i64, names: &[String]) -> C
where
    T: FromStr,
    C: FromIterator<T>,
{
    names
        .iter()
        .filter_map(|name| match name.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    user_id,
                    name = %name,
                    "ignoring unknown role or permission"
                );
                None
            }
        })
        .collect()
}

/// Source of principal records for the authentication gate and of
/// credentials for login.
///
/// Rights are looked up on every request so that role changes apply to
/// tokens that were issued before them.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Returns the principal record for `user_id`, or `None` if the user is gone.
    async fn find_principal(&self, user_id: i64) -> PgResult<Option<PrincipalRecord>>;

    /// Returns the credentials of the account named by `identifier`.
    async fn find_credentials(
        &self,
        identifier: LoginIdentifier<'_>,
    ) -> PgResult<Option<CredentialRecord>>;
}

/// Type-erased directory stored in the application state.
pub type SharedDirectory = Arc<dyn PrincipalDirectory>;

#[async_trait]
impl PrincipalDirectory for PgClient {
    async fn find_principal(&self, user_id: i64) -> PgResult<Option<PrincipalRecord>> {
        let mut conn = self.get_connection().await?;

        let Some(user) = conn.find_user_by_id(user_id).await? else {
            return Ok(None);
        };

        let group_names = conn.find_user_group_names(user_id).await?;
        let codenames = conn.find_user_permission_codenames(user_id).await?;

        Ok(Some(PrincipalRecord::from_names(
            user.id,
            user.username,
            &group_names,
            &codenames,
        )))
    }

    async fn find_credentials(
        &self,
        identifier: LoginIdentifier<'_>,
    ) -> PgResult<Option<CredentialRecord>> {
        let mut conn = self.get_connection().await?;

        let user = match identifier {
            LoginIdentifier::Username(username) => conn.find_user_by_username(username).await?,
            LoginIdentifier::Email(email) => conn.find_user_by_email(email).await?,
        };

        let Some(user) = user else {
            return Ok(None);
        };

        let group_names = conn.find_user_group_names(user.id).await?;

        Ok(Some(CredentialRecord {
            roles: parse_roles(user.id, &group_names),
            user_id: user.id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_skipped() {
        let record = PrincipalRecord::from_names(
            4,
            "carol".into(),
            &["Patient".into(), "Janitor".into()],
            &["view_service".into(), "add_appointment".into(), "fly".into()],
        );

        assert_eq!(record.roles, vec![Role::Patient]);
        assert_eq!(
            record.capabilities,
            BTreeSet::from([Capability::ViewService, Capability::AddAppointment])
        );
    }
}

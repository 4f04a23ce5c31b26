//! User repository for account management and role lookups.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{NewUser, UpdateUser, User};
use crate::types::Role;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for user database operations.
pub trait UserRepository {
    /// Inserts a new user.
    fn create_user(&mut self, user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by id.
    fn find_user_by_id(
        &mut self,
        user_id: i64,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by exact username.
    fn find_user_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by exact email address.
    fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Applies a partial update. Returns `None` when the user does not exist.
    fn update_user(
        &mut self,
        user_id: i64,
        changes: UpdateUser,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Deletes a user. Returns whether a row was removed.
    fn delete_user(&mut self, user_id: i64) -> impl Future<Output = PgResult<bool>> + Send;

    /// Adds the user to a group. Adding twice is a no-op.
    fn assign_user_group(
        &mut self,
        user_id: i64,
        group_id: i64,
    ) -> impl Future<Output = PgResult<()>> + Send;

    /// Returns the names of the groups the user belongs to.
    fn find_user_group_names(
        &mut self,
        user_id: i64,
    ) -> impl Future<Output = PgResult<Vec<String>>> + Send;

    /// Returns the distinct permission codenames granted through the user's groups.
    fn find_user_permission_codenames(
        &mut self,
        user_id: i64,
    ) -> impl Future<Output = PgResult<Vec<String>>> + Send;

    /// Returns whether the user belongs to the role's group.
    fn user_has_role(
        &mut self,
        user_id: i64,
        role: Role,
    ) -> impl Future<Output = PgResult<bool>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, user: NewUser) -> PgResult<User> {
        use schema::users;

        let user = diesel::insert_into(users::table)
            .values(&user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(target: TRACING_TARGET_QUERY, user_id = user.id, "user created");
        Ok(user)
    }

    async fn find_user_by_id(&mut self, user_id: i64) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_username(&mut self, name: &str) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        users
            .filter(username.eq(name))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_email(&mut self, address: &str) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        users
            .filter(email.eq(address))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_user(&mut self, user_id: i64, changes: UpdateUser) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        if changes.is_empty() {
            return self.find_user_by_id(user_id).await;
        }

        diesel::update(users.filter(id.eq(user_id)))
            .set(&changes)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn delete_user(&mut self, user_id: i64) -> PgResult<bool> {
        use schema::users::dsl::*;

        let deleted = diesel::delete(users.filter(id.eq(user_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn assign_user_group(&mut self, user: i64, group: i64) -> PgResult<()> {
        use schema::user_groups::dsl::*;

        diesel::insert_into(user_groups)
            .values((user_id.eq(user), group_id.eq(group)))
            .on_conflict_do_nothing()
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }

    async fn find_user_group_names(&mut self, user: i64) -> PgResult<Vec<String>> {
        use schema::{groups, user_groups};

        user_groups::table
            .inner_join(groups::table)
            .filter(user_groups::user_id.eq(user))
            .select(groups::name)
            .order(groups::name.asc())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_user_permission_codenames(&mut self, user: i64) -> PgResult<Vec<String>> {
        use schema::{group_permissions, permissions, user_groups};

        user_groups::table
            .inner_join(
                group_permissions::table
                    .on(group_permissions::group_id.eq(user_groups::group_id)),
            )
            .inner_join(
                permissions::table.on(permissions::id.eq(group_permissions::permission_id)),
            )
            .filter(user_groups::user_id.eq(user))
            .select(permissions::codename)
            .distinct()
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn user_has_role(&mut self, user: i64, role: Role) -> PgResult<bool> {
        use schema::{groups, user_groups};

        diesel::select(diesel::dsl::exists(
            user_groups::table
                .inner_join(groups::table)
                .filter(user_groups::user_id.eq(user))
                .filter(groups::name.eq(role.name())),
        ))
        .get_result(self)
        .await
        .map_err(PgError::from)
    }
}

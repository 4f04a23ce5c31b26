//! Role and capability catalog repository.

use std::future::Future;

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::model::{Group, NewGroup, NewPermission, Permission};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for groups, permissions and their assignments.
///
/// Every write is an upsert, so repeated calls converge on the same rows.
pub trait PermissionRepository {
    /// Inserts the group or returns the existing one with the same name.
    fn upsert_group(&mut self, name: &str) -> impl Future<Output = PgResult<Group>> + Send;

    /// Inserts the permission or refreshes the row with the same codename.
    fn upsert_permission(
        &mut self,
        permission: NewPermission,
    ) -> impl Future<Output = PgResult<Permission>> + Send;

    /// Makes the group's permission set exactly `permission_ids`.
    fn set_group_permissions(
        &mut self,
        group_id: i64,
        permission_ids: &[i64],
    ) -> impl Future<Output = PgResult<()>> + Send;

    /// Finds a group by name.
    fn find_group_by_name(
        &mut self,
        name: &str,
    ) -> impl Future<Output = PgResult<Option<Group>>> + Send;

    /// Lists every group ordered by id.
    fn list_groups(&mut self) -> impl Future<Output = PgResult<Vec<Group>>> + Send;

    /// Lists every permission ordered by id.
    fn list_permissions(&mut self) -> impl Future<Output = PgResult<Vec<Permission>>> + Send;

    /// Lists the codenames assigned to a group, sorted.
    fn list_group_permission_codenames(
        &mut self,
        group_id: i64,
    ) -> impl Future<Output = PgResult<Vec<String>>> + Send;
}

impl PermissionRepository for PgConnection {
    async fn upsert_group(&mut self, name: &str) -> PgResult<Group> {
        use schema::groups;

        let group = NewGroup {
            name: name.to_owned(),
        };

        diesel::insert_into(groups::table)
            .values(&group)
            .on_conflict(groups::name)
            .do_update()
            .set(groups::name.eq(excluded(groups::name)))
            .returning(Group::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn upsert_permission(&mut self, permission: NewPermission) -> PgResult<Permission> {
        use schema::permissions;

        diesel::insert_into(permissions::table)
            .values(&permission)
            .on_conflict(permissions::codename)
            .do_update()
            .set(&permission)
            .returning(Permission::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn set_group_permissions(&mut self, group: i64, permission_ids: &[i64]) -> PgResult<()> {
        use schema::group_permissions::dsl::*;

        diesel::delete(
            group_permissions
                .filter(group_id.eq(group))
                .filter(permission_id.ne_all(permission_ids)),
        )
        .execute(self)
        .await
        .map_err(PgError::from)?;

        if permission_ids.is_empty() {
            return Ok(());
        }

        let rows: Vec<_> = permission_ids
            .iter()
            .map(|id| (group_id.eq(group), permission_id.eq(*id)))
            .collect();

        diesel::insert_into(group_permissions)
            .values(&rows)
            .on_conflict_do_nothing()
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }

    async fn find_group_by_name(&mut self, group_name: &str) -> PgResult<Option<Group>> {
        use schema::groups::dsl::*;

        groups
            .filter(name.eq(group_name))
            .select(Group::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_groups(&mut self) -> PgResult<Vec<Group>> {
        use schema::groups::dsl::*;

        groups
            .order(id.asc())
            .select(Group::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_permissions(&mut self) -> PgResult<Vec<Permission>> {
        use schema::permissions::dsl::*;

        permissions
            .order(id.asc())
            .select(Permission::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_group_permission_codenames(&mut self, group: i64) -> PgResult<Vec<String>> {
        use schema::{group_permissions, permissions};

        group_permissions::table
            .inner_join(permissions::table)
            .filter(group_permissions::group_id.eq(group))
            .select(permissions::codename)
            .order(permissions::codename.asc())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}

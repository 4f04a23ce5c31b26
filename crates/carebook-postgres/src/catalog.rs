//! Idempotent bootstrap of the role and capability catalog.
//!
//! Every role in [`Role`] becomes a group, every [`Capability`] becomes a
//! permission, and each group's permission set is replaced with the role's
//! fixed assignment. Running the bootstrap any number of times yields the
//! same catalog.

use std::collections::{BTreeMap, HashMap};

use diesel_async::scoped_futures::ScopedFutureExt;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::query::PermissionRepository;
use crate::types::{Capability, Role};
use crate::{PgClient, PgConnection, PgResult, TRACING_TARGET_CATALOG};

/// Catalog state observed after a bootstrap run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Group names in role order.
    pub groups: Vec<String>,
    /// Permission codenames in capability order.
    pub permissions: Vec<String>,
    /// Sorted codenames assigned to each group.
    pub assignments: BTreeMap<String, Vec<String>>,
}

/// Upserts the catalog through any [`PermissionRepository`].
///
/// The caller owns the transaction boundary. See [`seed_catalog_in_transaction`].
pub async fn seed_catalog<R>(repo: &mut R) -> PgResult<SeedReport>
where
    R: PermissionRepository + Send,
{
    let mut report = SeedReport::default();

    let mut group_ids = Vec::new();
    for role in Role::iter() {
        let group = repo.upsert_group(role.name()).await?;
        group_ids.push((role, group.id));
        report.groups.push(group.name);
    }

    let mut permission_ids = HashMap::new();
    for capability in Capability::iter() {
        let permission = repo.upsert_permission(capability.into()).await?;
        permission_ids.insert(capability, permission.id);
        report.permissions.push(permission.codename);
    }

    for (role, group_id) in group_ids {
        let assigned: Vec<i64> = role
            .capabilities()
            .iter()
            .filter_map(|capability| permission_ids.get(capability).copied())
            .collect();

        repo.set_group_permissions(group_id, &assigned).await?;
        let codenames = repo.list_group_permission_codenames(group_id).await?;

        tracing::debug!(
            target: TRACING_TARGET_CATALOG,
            role = %role,
            capabilities = codenames.len(),
            "role capabilities assigned"
        );

        report.assignments.insert(role.name().to_owned(), codenames);
    }

    Ok(report)
}

/// Runs [`seed_catalog`] inside a single database transaction.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_CATALOG)]
pub async fn seed_catalog_in_transaction(pg: &PgClient) -> PgResult<SeedReport> {
    let mut conn = pg.get_connection().await?;
    let report = conn
        .transaction(|conn| {
            async move {
                let conn: &mut PgConnection = conn;
                seed_catalog(conn).await
            }
            .scope_boxed()
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET_CATALOG,
        groups = report.groups.len(),
        permissions = report.permissions.len(),
        "role and capability catalog seeded"
    );

    Ok(report)
}

//! Permission model. A permission is the persisted form of a capability.

use diesel::prelude::*;

use crate::schema::permissions;
use crate::types::Capability;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = permissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Permission {
    pub id: i64,
    /// `{action}_{resource}`, unique.
    pub codename: String,
    /// `Can {action} {resource}`.
    pub name: String,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = permissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPermission {
    pub codename: String,
    pub name: String,
    pub resource: String,
}

impl From<Capability> for NewPermission {
    fn from(capability: Capability) -> Self {
        Self {
            codename: capability.codename().to_owned(),
            name: capability.display_name(),
            resource: capability.resource().to_string(),
        }
    }
}

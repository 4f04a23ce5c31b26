//! Service model: an offering provided by a doctor at an address.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::services;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Service {
    pub id: i64,
    /// Unique service name.
    pub name: String,
    pub address: String,
    /// User holding the Doctor role.
    pub doctor_id: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewService {
    pub name: String,
    pub address: String,
    pub doctor_id: i64,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateService {
    pub name: Option<String>,
    pub address: Option<String>,
    pub doctor_id: Option<i64>,
}

impl UpdateService {
    /// Returns whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.doctor_id.is_none()
    }
}

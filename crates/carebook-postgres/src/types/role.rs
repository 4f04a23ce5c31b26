//! Role enumeration and its fixed capability assignment.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use super::Capability;

/// A named group of users sharing the same capability set.
///
/// Stored by name in the `groups` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, AsRefStr, IntoStaticStr, Display, EnumIter, EnumString)]
pub enum Role {
    Admin,
    Doctor,
    Patient,
}

const SERVICE_CAPABILITIES: &[Capability] = &[
    Capability::AddService,
    Capability::ViewService,
    Capability::ChangeService,
    Capability::DeleteService,
];

const PATIENT_CAPABILITIES: &[Capability] = &[
    Capability::ViewService,
    Capability::AddAppointment,
    Capability::ViewAppointment,
    Capability::ChangeAppointment,
    Capability::DeleteAppointment,
];

impl Role {
    /// Returns the group name stored in the database.
    #[inline]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Returns the capabilities granted to every member of this role.
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Admin | Self::Doctor => SERVICE_CAPABILITIES,
            Self::Patient => PATIENT_CAPABILITIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::types::Resource;

    #[test]
    fn staff_roles_hold_every_service_capability() {
        for role in [Role::Admin, Role::Doctor] {
            assert_eq!(role.capabilities().len(), 4);
            assert!(
                role.capabilities()
                    .iter()
                    .all(|c| c.resource() == Resource::Service)
            );
        }
    }

    #[test]
    fn patient_views_services_and_owns_appointments() {
        let capabilities = Role::Patient.capabilities();
        assert!(capabilities.contains(&Capability::ViewService));
        assert!(!capabilities.contains(&Capability::AddService));
        assert_eq!(
            capabilities
                .iter()
                .filter(|c| c.resource() == Resource::Appointment)
                .count(),
            4
        );
    }

    #[test]
    fn names_round_trip() {
        assert_eq!(Role::Doctor.name(), "Doctor");
        assert_eq!(Role::from_str("Patient").ok(), Some(Role::Patient));
        assert!(Role::from_str("Nurse").is_err());
    }
}

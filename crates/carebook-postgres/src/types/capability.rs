//! Capability catalog.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Operation half of a capability codename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Add,
    View,
    Change,
    Delete,
}

/// Resource half of a capability codename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    Service,
    Appointment,
}

/// A named right to perform one action on one resource kind.
///
/// The string form is the codename stored in the `permissions` table,
/// `{action}_{resource}`, e.g. `add_service`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, AsRefStr, IntoStaticStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    AddService,
    ViewService,
    ChangeService,
    DeleteService,
    AddAppointment,
    ViewAppointment,
    ChangeAppointment,
    DeleteAppointment,
}

impl Capability {
    /// Returns the action this capability grants.
    pub const fn action(self) -> Action {
        match self {
            Self::AddService | Self::AddAppointment => Action::Add,
            Self::ViewService | Self::ViewAppointment => Action::View,
            Self::ChangeService | Self::ChangeAppointment => Action::Change,
            Self::DeleteService | Self::DeleteAppointment => Action::Delete,
        }
    }

    /// Returns the resource kind this capability applies to.
    pub const fn resource(self) -> Resource {
        match self {
            Self::AddService | Self::ViewService | Self::ChangeService | Self::DeleteService => {
                Resource::Service
            }
            _ => Resource::Appointment,
        }
    }

    /// Returns the codename, e.g. `view_appointment`.
    #[inline]
    pub fn codename(self) -> &'static str {
        self.into()
    }

    /// Returns the human readable permission name, e.g. `Can view appointment`.
    pub fn display_name(self) -> String {
        format!("Can {} {}", self.action(), self.resource())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn codenames_follow_action_resource() {
        for capability in Capability::iter() {
            let expected = format!("{}_{}", capability.action(), capability.resource());
            assert_eq!(capability.codename(), expected);
            assert_eq!(Capability::from_str(&expected).ok(), Some(capability));
        }
    }

    #[test]
    fn catalog_has_eight_entries() {
        assert_eq!(Capability::iter().count(), 8);
    }

    #[test]
    fn display_name() {
        assert_eq!(Capability::AddService.display_name(), "Can add service");
        assert_eq!(
            Capability::DeleteAppointment.display_name(),
            "Can delete appointment"
        );
    }

    #[test]
    fn unknown_codename_is_rejected() {
        assert!(Capability::from_str("launch_rocket").is_err());
    }
}

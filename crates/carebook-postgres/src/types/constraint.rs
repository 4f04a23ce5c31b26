//! Named database constraints and their user-facing meaning.

use strum::{EnumIter, IntoEnumIterator};

/// Broad category of a constraint violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintCategory {
    /// A unique key already holds the value.
    Uniqueness,
    /// A referenced row does not exist.
    ForeignKey,
    /// A check constraint rejected the value.
    Validation,
}

/// Every named constraint declared by the migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ConstraintViolation {
    UsersUsernameUnique,
    UsersEmailUnique,
    UsersUsernameLength,
    GroupsNameUnique,
    PermissionsCodenameUnique,
    UserGroupsGroupFk,
    ServicesNameUnique,
    ServicesDoctorFk,
    AppointmentsSlotUnique,
    AppointmentsServiceFk,
    AppointmentsDoctorFk,
    AppointmentsPatientFk,
}

impl ConstraintViolation {
    /// Parses a PostgreSQL constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        Self::iter().find(|c| c.constraint_name() == constraint)
    }

    /// Returns the PostgreSQL constraint name.
    pub const fn constraint_name(self) -> &'static str {
        match self {
            Self::UsersUsernameUnique => "users_username_unique",
            Self::UsersEmailUnique => "users_email_unique",
            Self::UsersUsernameLength => "users_username_length",
            Self::GroupsNameUnique => "groups_name_unique",
            Self::PermissionsCodenameUnique => "permissions_codename_unique",
            Self::UserGroupsGroupFk => "user_groups_group_id_fkey",
            Self::ServicesNameUnique => "services_name_unique",
            Self::ServicesDoctorFk => "services_doctor_id_fkey",
            Self::AppointmentsSlotUnique => "appointments_slot_unique",
            Self::AppointmentsServiceFk => "appointments_service_id_fkey",
            Self::AppointmentsDoctorFk => "appointments_doctor_id_fkey",
            Self::AppointmentsPatientFk => "appointments_patient_id_fkey",
        }
    }

    /// Categorizes this constraint by its purpose.
    pub const fn categorize(self) -> ConstraintCategory {
        match self {
            Self::UsersUsernameUnique
            | Self::UsersEmailUnique
            | Self::GroupsNameUnique
            | Self::PermissionsCodenameUnique
            | Self::ServicesNameUnique
            | Self::AppointmentsSlotUnique => ConstraintCategory::Uniqueness,
            Self::UserGroupsGroupFk
            | Self::ServicesDoctorFk
            | Self::AppointmentsServiceFk
            | Self::AppointmentsDoctorFk
            | Self::AppointmentsPatientFk => ConstraintCategory::ForeignKey,
            Self::UsersUsernameLength => ConstraintCategory::Validation,
        }
    }

    /// Returns a user-friendly error message for this violation.
    pub const fn error_message(self) -> &'static str {
        match self {
            Self::UsersUsernameUnique => "A user with this username already exists",
            Self::UsersEmailUnique => "A user with this email already exists",
            Self::UsersUsernameLength => "Username must be between 1 and 100 characters",
            Self::GroupsNameUnique => "A role with this name already exists",
            Self::PermissionsCodenameUnique => "A permission with this codename already exists",
            Self::UserGroupsGroupFk => "invalid role",
            Self::ServicesNameUnique => "A service with this name already exists",
            Self::ServicesDoctorFk => "Doctor not found",
            Self::AppointmentsSlotUnique => "This time slot is already booked for the service",
            Self::AppointmentsServiceFk => "Service not found",
            Self::AppointmentsDoctorFk => "Doctor not found",
            Self::AppointmentsPatientFk => "Patient not found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for violation in ConstraintViolation::iter() {
            assert_eq!(
                ConstraintViolation::new(violation.constraint_name()),
                Some(violation)
            );
        }
    }

    #[test]
    fn unknown_names_are_ignored() {
        assert_eq!(ConstraintViolation::new("users_pkey"), None);
    }

    #[test]
    fn slot_collision_is_uniqueness() {
        assert_eq!(
            ConstraintViolation::AppointmentsSlotUnique.categorize(),
            ConstraintCategory::Uniqueness
        );
        assert_eq!(
            ConstraintViolation::ServicesDoctorFk.categorize(),
            ConstraintCategory::ForeignKey
        );
    }
}

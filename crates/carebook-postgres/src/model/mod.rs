//! Diesel models for every table, with insert and update variants.

mod appointment;
mod group;
mod permission;
mod service;
mod user;

pub use appointment::{Appointment, NewAppointment};
pub use group::{Group, NewGroup};
pub use permission::{NewPermission, Permission};
pub use service::{NewService, Service, UpdateService};
pub use user::{NewUser, UpdateUser, User, UserSummary};

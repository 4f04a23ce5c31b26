//! Domain types shared by the persistence layer and the HTTP service.

mod capability;
mod constraint;
mod role;

pub use capability::{Action, Capability, Resource};
pub use constraint::{ConstraintCategory, ConstraintViolation};
pub use role::Role;

//! Request types for HTTP handlers.

mod appointments;
mod authentications;
mod paths;
mod services;
mod users;

pub use appointments::*;
pub use authentications::*;
pub use paths::*;
pub use services::*;
pub use users::*;

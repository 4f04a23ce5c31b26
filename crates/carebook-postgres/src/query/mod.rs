//! Repository traits implemented for [`PgConnection`].
//!
//! Each trait groups the queries of one aggregate. Obtain a connection from
//! [`PgClient::get_connection`] and call the methods directly on it.
//!
//! [`PgConnection`]: crate::PgConnection
//! [`PgClient::get_connection`]: crate::PgClient::get_connection

pub mod appointment;
pub mod permission;
pub mod service;
pub mod user;

pub use appointment::AppointmentRepository;
pub use permission::PermissionRepository;
pub use service::ServiceRepository;
pub use user::UserRepository;

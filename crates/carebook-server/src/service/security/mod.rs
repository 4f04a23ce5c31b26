//! Password hashing and token signing keys.

mod password_hasher;
mod session_keys;

pub use password_hasher::PasswordHasher;
pub use session_keys::SessionKeys;

//! Response types for HTTP handlers.
//!
//! Successful bodies carry a [`Status`] word next to the payload.

use serde::{Deserialize, Serialize};

mod appointments;
mod authentications;
mod error_response;
mod monitors;
mod services;
mod users;

pub use appointments::*;
pub use authentications::*;
pub use error_response::ErrorResponse;
pub use monitors::*;
pub use services::*;
pub use users::*;

/// Outcome word included in every successful response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Created,
    Success,
    Updated,
    Deleted,
    SignedIn,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_words() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_value(Status::SignedIn)?, "signed-in");
        assert_eq!(serde_json::to_value(Status::Created)?, "created");
        Ok(())
    }
}

//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request payload for signup.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Signup {
    /// Unique login name.
    #[validate(length(min = 1, max = 100))]
    pub username: String,

    /// Optional unique email address.
    #[validate(email)]
    #[validate(length(max = 254))]
    pub email: Option<String>,

    /// Plaintext password, hashed before storage.
    #[validate(length(min = 1, max = 128))]
    pub password: String,

    /// Name of the role to join: `Admin`, `Doctor` or `Patient`.
    pub role: Option<String>,
}

/// Request payload for login.
///
/// Exactly one of `username` and `email` identifies the account; when both
/// are given, `username` wins.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_login_identifier"))]
pub struct Login {
    /// Login name of the account.
    #[validate(length(min = 1, max = 100))]
    pub username: Option<String>,

    /// Email address of the account.
    #[validate(length(min = 1, max = 254))]
    pub email: Option<String>,

    /// Password of the account.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// How a login request identifies the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIdentifier<'a> {
    Username(&'a str),
    Email(&'a str),
}

impl Login {
    /// Returns the account identifier, preferring the username.
    pub fn identifier(&self) -> Option<LoginIdentifier<'_>> {
        match (&self.username, &self.email) {
            (Some(username), _) => Some(LoginIdentifier::Username(username)),
            (None, Some(email)) => Some(LoginIdentifier::Email(email)),
            (None, None) => None,
        }
    }
}

fn validate_login_identifier(login: &Login) -> Result<(), ValidationError> {
    if login.identifier().is_none() {
        return Err(ValidationError::new("identifier")
            .with_message("Either 'username' or 'email' is required".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(username: Option<&str>, email: Option<&str>) -> Login {
        Login {
            username: username.map(Into::into),
            email: email.map(Into::into),
            password: "secret".into(),
        }
    }

    #[test]
    fn username_wins_over_email() {
        let request = login(Some("alice"), Some("alice@example.com"));
        assert_eq!(
            request.identifier(),
            Some(LoginIdentifier::Username("alice"))
        );
    }

    #[test]
    fn missing_identifier_fails_validation() {
        assert!(login(None, None).validate().is_err());
        assert!(login(None, Some("a@example.com")).validate().is_ok());
    }
}

//! JSON extractor with `validator` checks.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// JSON extractor that runs [`Validate::validate`] after deserialization.
///
/// Validation failures become a 400 whose message lists every failing field.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Creates a new instance of [`ValidateJson`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;

        data.validate()?;
        Ok(Self::new(data))
    }
}

type Params = HashMap<Cow<'static, str>, serde_json::Value>;

/// Formats length validation errors.
fn format_length_error(field: &str, params: &Params) -> String {
    let min = params.get("min").and_then(serde_json::Value::as_u64);
    let max = params.get("max").and_then(serde_json::Value::as_u64);

    match (min, max) {
        (Some(min), Some(max)) => {
            format!("Field '{field}' must be between {min} and {max} characters long")
        }
        (Some(min), None) => format!("Field '{field}' must be at least {min} characters long"),
        (None, Some(max)) => format!("Field '{field}' must be at most {max} characters long"),
        (None, None) => format!("Field '{field}' has invalid length"),
    }
}

/// Formats range validation errors.
fn format_range_error(field: &str, params: &Params) -> String {
    let min = params.get("min").and_then(serde_json::Value::as_f64);
    let max = params.get("max").and_then(serde_json::Value::as_f64);

    match (min, max) {
        (Some(min), Some(max)) => format!("Field '{field}' must be between {min} and {max}"),
        (Some(min), None) => format!("Field '{field}' must be at least {min}"),
        (None, Some(max)) => format!("Field '{field}' must be at most {max}"),
        (None, None) => format!("Field '{field}' is out of valid range"),
    }
}

/// Formats a single validation error.
fn format_validation_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return custom_message.to_string();
    }

    let message = match error.code.as_ref() {
        "required" => "is required".to_owned(),
        "length" => return format_length_error(field, &error.params),
        "range" => return format_range_error(field, &error.params),
        "email" => "must be a valid email address".to_owned(),
        code => format!("failed validation: {code}"),
    };

    format!("Field '{field}' {message}")
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut error_messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors
                    .iter()
                    .map(move |error| format_validation_error(field, error))
            })
            .collect();

        // Field order from the map is unspecified.
        error_messages.sort();

        let user_message = match error_messages.as_slice() {
            [] => "Validation failed".to_owned(),
            [single_error] => single_error.clone(),
            multiple => multiple.join(". "),
        };

        ErrorKind::BadRequest
            .with_message(user_message)
            .with_context(format!("{errors:?}"))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 5))]
        name: String,
        #[validate(range(min = 0.0))]
        at: f64,
    }

    #[test]
    fn length_errors_name_the_field() {
        let sample = Sample {
            name: "too long for this".into(),
            at: 1.0,
        };

        let error: Error = sample.validate().unwrap_err().into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(
            error.message(),
            Some("Field 'name' must be between 1 and 5 characters long")
        );
    }

    #[test]
    fn multiple_errors_are_joined() {
        let sample = Sample {
            name: String::new(),
            at: -1.0,
        };

        let error: Error = sample.validate().unwrap_err().into();
        let message = error.message().unwrap_or_default();
        assert!(message.contains("'name'"));
        assert!(message.contains("'at' must be at least 0"));
    }
}

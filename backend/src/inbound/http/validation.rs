//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces `invalid_request` with `{field, code}` details so
//! clients can highlight the offending form input.

use serde_json::json;

use crate::domain::{
    Error, FeedbackValidationError, LoginValidationError, RecordId, SignUpValidationError,
    SubmissionValidationError, UserValidationError,
};

/// Validation error codes raised by the HTTP layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidRecordId,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidRecordId => "invalid_record_id",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_value(self, code: &str, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code,
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField.as_str())
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str, message: impl Into<String>) -> Error {
    ValidationError::new(field.as_str(), message).with_value(ErrorCode::InvalidValue.as_str(), value)
}

pub(crate) fn parse_record_id(value: String, field: FieldName) -> Result<RecordId, Error> {
    RecordId::new(value).map_err(|err| {
        ValidationError::new(field.as_str(), err.to_string())
            .with_code(ErrorCode::InvalidRecordId.as_str())
    })
}

pub(crate) fn user_validation_error(err: &UserValidationError) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(err.code())
}

pub(crate) fn submission_validation_error(err: &SubmissionValidationError) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(err.code())
}

pub(crate) fn feedback_validation_error(err: &FeedbackValidationError) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(err.code())
}

pub(crate) fn login_validation_error(err: &LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyEmail => ("email", "empty_email"),
        LoginValidationError::InvalidEmail => ("email", "invalid_email"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    ValidationError::new(field, err.to_string()).with_code(code)
}

pub(crate) fn sign_up_validation_error(err: &SignUpValidationError) -> Error {
    match err {
        SignUpValidationError::Profile(inner) => user_validation_error(inner),
        SignUpValidationError::EmptyPassword => {
            ValidationError::new("password", err.to_string()).with_code("missing_field")
        }
    }
}

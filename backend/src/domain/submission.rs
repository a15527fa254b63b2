//! Shared pieces of student submissions (complaints and suggestions):
//! store-issued record identifiers and form field validation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum title length for complaints and suggestions.
pub const TITLE_MAX: usize = 120;
/// Maximum description length for complaints and suggestions.
pub const DESCRIPTION_MAX: usize = 4000;

/// Identifier assigned by the document store when a record is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

/// Error returned when a record id is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record id must not be empty")]
pub struct EmptyRecordId;

impl RecordId {
    /// Wrap a store-issued identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyRecordId> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmptyRecordId);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = EmptyRecordId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validation failures for complaint and suggestion forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyDescription,
    DescriptionTooLong { max: usize },
    EmptyCategory,
    CategoryTooLong { max: usize },
    UnknownPriority { value: String },
    AgreementRequired,
}

impl SubmissionValidationError {
    /// Form field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyDescription | Self::DescriptionTooLong { .. } => "description",
            Self::EmptyCategory | Self::CategoryTooLong { .. } => "category",
            Self::UnknownPriority { .. } => "priority",
            Self::AgreementRequired => "agreement",
        }
    }

    /// Stable machine-readable code for adapters.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::EmptyDescription | Self::EmptyCategory => "missing_field",
            Self::TitleTooLong { .. }
            | Self::DescriptionTooLong { .. }
            | Self::CategoryTooLong { .. } => "too_long",
            Self::UnknownPriority { .. } => "unknown_priority",
            Self::AgreementRequired => "agreement_required",
        }
    }
}

impl fmt::Display for SubmissionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::DescriptionTooLong { max } => {
                write!(f, "description must be at most {max} characters")
            }
            Self::EmptyCategory => write!(f, "category must not be empty"),
            Self::CategoryTooLong { max } => {
                write!(f, "category must be at most {max} characters")
            }
            Self::UnknownPriority { value } => {
                write!(f, "unknown priority '{value}'; expected low, medium or high")
            }
            Self::AgreementRequired => write!(f, "You must agree to the privacy policy."),
        }
    }
}

impl std::error::Error for SubmissionValidationError {}

/// Validate and trim a submission title.
pub(crate) fn validate_title(raw: &str) -> Result<String, SubmissionValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SubmissionValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > TITLE_MAX {
        return Err(SubmissionValidationError::TitleTooLong { max: TITLE_MAX });
    }
    Ok(trimmed.to_owned())
}

/// Validate and trim a submission description.
pub(crate) fn validate_description(raw: &str) -> Result<String, SubmissionValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SubmissionValidationError::EmptyDescription);
    }
    if trimmed.chars().count() > DESCRIPTION_MAX {
        return Err(SubmissionValidationError::DescriptionTooLong {
            max: DESCRIPTION_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

//! Suggestion data model. Suggestions are read-only once submitted.

use chrono::NaiveDate;

use crate::domain::submission::{validate_description, validate_title};
use crate::domain::{RecordId, SubmissionValidationError, UserId};

/// Raw suggestion form as submitted by a student.
#[derive(Debug, Clone, Default)]
pub struct SuggestionForm {
    pub title: String,
    pub description: String,
    pub agreement: bool,
}

/// Validated suggestion content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionDraft {
    pub title: String,
    pub description: String,
}

impl SuggestionDraft {
    pub fn try_from_form(form: SuggestionForm) -> Result<Self, SubmissionValidationError> {
        let title = validate_title(&form.title)?;
        let description = validate_description(&form.description)?;
        if !form.agreement {
            return Err(SubmissionValidationError::AgreementRequired);
        }
        Ok(Self { title, description })
    }
}

/// Stored suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    id: RecordId,
    owner: UserId,
    title: String,
    description: String,
    submitted_on: NaiveDate,
}

impl Suggestion {
    pub fn new(
        id: RecordId,
        owner: UserId,
        draft: SuggestionDraft,
        submitted_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            owner,
            title: draft.title,
            description: draft.description,
            submitted_on,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn submitted_on(&self) -> NaiveDate {
        self.submitted_on
    }
}

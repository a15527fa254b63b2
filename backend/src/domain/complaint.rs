//! Complaint data model.
//!
//! Complaints are created by students and triaged by administrators. The
//! owner is set once at creation; administrators only ever touch `status`
//! and the feedback list.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::submission::{validate_description, validate_title};
use crate::domain::{Feedback, RecordId, SubmissionValidationError, UserId};

/// Maximum category length.
pub const CATEGORY_MAX: usize = 64;

/// Urgency chosen by the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = SubmissionValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(SubmissionValidationError::UnknownPriority {
                value: value.to_owned(),
            }),
        }
    }
}

/// Triage state of a complaint. Exactly two values exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Unresolved,
    Resolved,
}

/// Error returned when a status string is neither value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status '{0}'; expected resolved or unresolved")]
pub struct UnknownStatus(pub String);

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Resolved => "resolved",
        }
    }

    /// The other status.
    ///
    /// # Examples
    /// ```
    /// use campus_portal::domain::Status;
    ///
    /// assert_eq!(Status::Unresolved.toggled(), Status::Resolved);
    /// assert_eq!(Status::Resolved.toggled().toggled(), Status::Resolved);
    /// ```
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Unresolved => Self::Resolved,
            Self::Resolved => Self::Unresolved,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unresolved" => Ok(Self::Unresolved),
            "resolved" => Ok(Self::Resolved),
            _ => Err(UnknownStatus(value.to_owned())),
        }
    }
}

/// Complaint category label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category(String);

impl Category {
    /// Validate a category label (trimmed, non-empty, bounded).
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SubmissionValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SubmissionValidationError::EmptyCategory);
        }
        if trimmed.chars().count() > CATEGORY_MAX {
            return Err(SubmissionValidationError::CategoryTooLong { max: CATEGORY_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Raw complaint form as submitted by a student.
#[derive(Debug, Clone, Default)]
pub struct ComplaintForm {
    pub title: String,
    pub description: String,
    pub category: String,
    /// Blank means the form default, `low`.
    pub priority: String,
    pub agreement: bool,
}

/// Validated complaint content, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
}

impl ComplaintDraft {
    /// Validate every field, reporting the first failure.
    ///
    /// # Examples
    /// ```
    /// use campus_portal::domain::{ComplaintDraft, ComplaintForm, Priority};
    ///
    /// let draft = ComplaintDraft::try_from_form(ComplaintForm {
    ///     title: "Projector broken".into(),
    ///     description: "Room 204 projector will not power on".into(),
    ///     category: "Facilities".into(),
    ///     priority: "High".into(),
    ///     agreement: true,
    /// })
    /// .expect("valid form");
    /// assert_eq!(draft.priority, Priority::High);
    /// ```
    pub fn try_from_form(form: ComplaintForm) -> Result<Self, SubmissionValidationError> {
        let title = validate_title(&form.title)?;
        let description = validate_description(&form.description)?;
        let category = Category::new(&form.category)?;
        let priority = if form.priority.trim().is_empty() {
            Priority::default()
        } else {
            form.priority.parse()?
        };
        if !form.agreement {
            return Err(SubmissionValidationError::AgreementRequired);
        }
        Ok(Self {
            title,
            description,
            category,
            priority,
        })
    }
}

/// Stored complaint.
///
/// ## Invariants
/// - `owner` is set at creation and never reassigned.
/// - `feedbacks` keeps insertion order.
/// - `revision` is maintained by the store and starts at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complaint {
    id: RecordId,
    owner: UserId,
    title: String,
    description: String,
    category: Category,
    priority: Priority,
    status: Status,
    submitted_on: NaiveDate,
    feedbacks: Vec<Feedback>,
    revision: u64,
}

impl Complaint {
    /// Build a freshly submitted complaint: unresolved, without feedback.
    pub fn new(id: RecordId, owner: UserId, draft: ComplaintDraft, submitted_on: NaiveDate) -> Self {
        Self {
            id,
            owner,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            priority: draft.priority,
            status: Status::Unresolved,
            submitted_on,
            feedbacks: Vec::new(),
            revision: 1,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_feedbacks(mut self, feedbacks: Vec<Feedback>) -> Self {
        self.feedbacks = feedbacks;
        self
    }

    #[must_use]
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Student who submitted the complaint.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn submitted_on(&self) -> NaiveDate {
        self.submitted_on
    }

    /// Administrator feedback in insertion order.
    pub fn feedbacks(&self) -> &[Feedback] {
        &self.feedbacks
    }

    /// Store revision the complaint was read at.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

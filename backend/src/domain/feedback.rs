//! Administrator feedback on complaints.
//!
//! Feedback entries are immutable once written. The ledger functions compute
//! the next feedback list; persisting it is the repository's job.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Maximum feedback message length.
pub const FEEDBACK_MAX: usize = 2000;

/// Validation failures for feedback messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackValidationError {
    EmptyMessage,
    MessageTooLong { max: usize },
}

impl FeedbackValidationError {
    pub fn field(&self) -> &'static str {
        "message"
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "missing_field",
            Self::MessageTooLong { .. } => "too_long",
        }
    }
}

impl fmt::Display for FeedbackValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "feedback message must not be empty"),
            Self::MessageTooLong { max } => {
                write!(f, "feedback message must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for FeedbackValidationError {}

/// Non-empty, trimmed feedback text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeedbackMessage(String);

impl FeedbackMessage {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, FeedbackValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FeedbackValidationError::EmptyMessage);
        }
        if trimmed.chars().count() > FEEDBACK_MAX {
            return Err(FeedbackValidationError::MessageTooLong { max: FEEDBACK_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FeedbackMessage {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<FeedbackMessage> for String {
    fn from(value: FeedbackMessage) -> Self {
        value.0
    }
}

impl TryFrom<String> for FeedbackMessage {
    type Error = FeedbackValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One administrator message on a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub message: FeedbackMessage,
    pub timestamp: DateTime<Utc>,
    pub author_id: UserId,
}

impl Feedback {
    /// Key used to identify this entry for removal.
    pub fn key(&self) -> FeedbackKey {
        FeedbackKey {
            timestamp: self.timestamp,
            message: self.message.as_ref().to_owned(),
        }
    }
}

/// Removal identity of a feedback entry: `(timestamp, message)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackKey {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl FeedbackKey {
    fn matches(&self, feedback: &Feedback) -> bool {
        feedback.timestamp == self.timestamp && feedback.message.as_ref() == self.message
    }
}

/// Return `feedbacks` with `entry` appended.
pub fn append_feedback(feedbacks: &[Feedback], entry: Feedback) -> Vec<Feedback> {
    let mut next = Vec::with_capacity(feedbacks.len() + 1);
    next.extend_from_slice(feedbacks);
    next.push(entry);
    next
}

/// Return `feedbacks` without the first entry matching `key`.
///
/// Returns `None` when no entry matches.
///
/// # Examples
/// ```
/// use campus_portal::domain::{
///     append_feedback, remove_feedback, Feedback, FeedbackMessage, UserId,
/// };
///
/// let entry = Feedback {
///     message: FeedbackMessage::new("Looking into it").expect("message"),
///     timestamp: chrono::Utc::now(),
///     author_id: UserId::random(),
/// };
/// let appended = append_feedback(&[], entry.clone());
/// assert_eq!(remove_feedback(&appended, &entry.key()), Some(Vec::new()));
/// ```
pub fn remove_feedback(feedbacks: &[Feedback], key: &FeedbackKey) -> Option<Vec<Feedback>> {
    let position = feedbacks.iter().position(|entry| key.matches(entry))?;
    let mut next = feedbacks.to_vec();
    next.remove(position);
    Some(next)
}

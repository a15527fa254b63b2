//! Driving port for complaint mutations.

use async_trait::async_trait;

use crate::domain::{
    Complaint, ComplaintDraft, Error, FeedbackKey, FeedbackMessage, RecordId, Status, UserId,
};

/// Domain use-case port for submitting and triaging complaints.
///
/// Feedback edits accept an optional expected revision. When given, the edit
/// is rejected with a conflict unless the complaint is still at that
/// revision. When omitted, the revision read just before the write is used.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintCommand: Send + Sync {
    /// Store a new complaint owned by `owner`.
    async fn submit(&self, owner: &UserId, draft: ComplaintDraft) -> Result<RecordId, Error>;

    async fn set_status(&self, id: &RecordId, status: Status) -> Result<Complaint, Error>;

    async fn toggle_status(&self, id: &RecordId) -> Result<Complaint, Error>;

    async fn add_feedback(
        &self,
        id: &RecordId,
        author: &UserId,
        message: FeedbackMessage,
        expected_revision: Option<u64>,
    ) -> Result<Complaint, Error>;

    async fn remove_feedback(
        &self,
        id: &RecordId,
        key: &FeedbackKey,
        expected_revision: Option<u64>,
    ) -> Result<Complaint, Error>;
}

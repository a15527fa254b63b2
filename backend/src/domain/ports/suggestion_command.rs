//! Driving port for suggestion submission.

use async_trait::async_trait;

use crate::domain::{Error, RecordId, SuggestionDraft, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestionCommand: Send + Sync {
    /// Store a new suggestion owned by `owner`.
    async fn submit(&self, owner: &UserId, draft: SuggestionDraft) -> Result<RecordId, Error>;
}

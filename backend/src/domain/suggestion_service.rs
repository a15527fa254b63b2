//! Suggestion domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{SuggestionCommand, SuggestionEntry, SuggestionQuery};
use crate::domain::{Error, RecordId, RecordRepository, Suggestion, SuggestionDraft, UserId};

/// Service implementing [`SuggestionCommand`] and [`SuggestionQuery`].
#[derive(Clone)]
pub struct SuggestionService {
    records: RecordRepository,
    clock: Arc<dyn Clock>,
}

impl SuggestionService {
    pub fn new(records: RecordRepository, clock: Arc<dyn Clock>) -> Self {
        Self { records, clock }
    }
}

#[async_trait]
impl SuggestionCommand for SuggestionService {
    async fn submit(&self, owner: &UserId, draft: SuggestionDraft) -> Result<RecordId, Error> {
        let submitted_on = self.clock.utc().date_naive();
        let id = self
            .records
            .create_suggestion(owner, &draft, submitted_on)
            .await?;
        info!(suggestion_id = %id, user_id = %owner, "suggestion submitted");
        Ok(id)
    }
}

#[async_trait]
impl SuggestionQuery for SuggestionService {
    async fn list_all(&self) -> Result<Vec<SuggestionEntry>, Error> {
        let suggestions = self.records.list_suggestions().await?;
        let emails = self
            .records
            .emails_for(suggestions.iter().map(Suggestion::owner))
            .await?;
        Ok(suggestions
            .into_iter()
            .map(|suggestion| {
                let submitter_email = emails.get(suggestion.owner()).cloned();
                SuggestionEntry {
                    suggestion,
                    submitter_email,
                }
            })
            .collect())
    }
}

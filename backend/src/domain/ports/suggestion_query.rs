//! Driving port for reading suggestions.

use async_trait::async_trait;

use crate::domain::{Email, Error, Suggestion};

/// Suggestion with its submitter's email, as shown to administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionEntry {
    pub suggestion: Suggestion,
    pub submitter_email: Option<Email>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestionQuery: Send + Sync {
    /// Every stored suggestion, oldest first.
    async fn list_all(&self) -> Result<Vec<SuggestionEntry>, Error>;
}

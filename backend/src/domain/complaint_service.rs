//! Complaint domain service.
//!
//! Implements submission and triage commands plus the student and admin read
//! models. Timestamps and submission dates come from the injected clock.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::broadcast;
use tracing::info;

use crate::domain::ports::{
    CollectionChange, ComplaintCommand, ComplaintEntry, ComplaintListing, ComplaintOverview,
    ComplaintQuery,
};
use crate::domain::{
    Complaint, ComplaintDraft, ComplaintFilter, ComplaintStats, Error, Feedback, FeedbackKey,
    FeedbackMessage, RecordId, RecordRepository, Status, UserId,
};

/// Service implementing [`ComplaintCommand`] and [`ComplaintQuery`].
#[derive(Clone)]
pub struct ComplaintService {
    records: RecordRepository,
    clock: Arc<dyn Clock>,
}

impl ComplaintService {
    pub fn new(records: RecordRepository, clock: Arc<dyn Clock>) -> Self {
        Self { records, clock }
    }

    async fn require(&self, id: &RecordId) -> Result<Complaint, Error> {
        self.records
            .find_complaint(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("complaint {id} not found")))
    }
}

#[async_trait]
impl ComplaintCommand for ComplaintService {
    async fn submit(&self, owner: &UserId, draft: ComplaintDraft) -> Result<RecordId, Error> {
        let submitted_on = self.clock.utc().date_naive();
        let id = self
            .records
            .create_complaint(owner, &draft, submitted_on)
            .await?;
        info!(complaint_id = %id, user_id = %owner, "complaint submitted");
        Ok(id)
    }

    async fn set_status(&self, id: &RecordId, status: Status) -> Result<Complaint, Error> {
        let complaint = self.records.set_status(id, status).await?;
        info!(complaint_id = %id, status = %status, "complaint status set");
        Ok(complaint)
    }

    async fn toggle_status(&self, id: &RecordId) -> Result<Complaint, Error> {
        let current = self.require(id).await?;
        self.set_status(id, current.status().toggled()).await
    }

    async fn add_feedback(
        &self,
        id: &RecordId,
        author: &UserId,
        message: FeedbackMessage,
        expected_revision: Option<u64>,
    ) -> Result<Complaint, Error> {
        let entry = Feedback {
            message,
            timestamp: self.clock.utc(),
            author_id: author.clone(),
        };
        let complaint = self
            .records
            .append_feedback(id, entry, expected_revision)
            .await?;
        info!(complaint_id = %id, author_id = %author, "feedback added");
        Ok(complaint)
    }

    async fn remove_feedback(
        &self,
        id: &RecordId,
        key: &FeedbackKey,
        expected_revision: Option<u64>,
    ) -> Result<Complaint, Error> {
        let complaint = self
            .records
            .remove_feedback(id, key, expected_revision)
            .await?;
        info!(complaint_id = %id, "feedback removed");
        Ok(complaint)
    }
}

#[async_trait]
impl ComplaintQuery for ComplaintService {
    async fn list_mine(&self, owner: &UserId) -> Result<ComplaintListing, Error> {
        let complaints = self.records.list_complaints_for(owner).await?;
        let stats = ComplaintStats::tally(&complaints);
        Ok(ComplaintListing { complaints, stats })
    }

    async fn overview(&self, filter: &ComplaintFilter) -> Result<ComplaintOverview, Error> {
        let all = self.records.list_complaints().await?;
        let stats = ComplaintStats::tally(&all);
        let matching = filter.apply(&all);
        let emails = self
            .records
            .emails_for(matching.iter().map(Complaint::owner))
            .await?;
        let entries = matching
            .into_iter()
            .map(|complaint| {
                let submitter_email = emails.get(complaint.owner()).cloned();
                ComplaintEntry {
                    complaint,
                    submitter_email,
                }
            })
            .collect();
        Ok(ComplaintOverview { entries, stats })
    }

    fn changes(&self) -> broadcast::Receiver<CollectionChange> {
        self.records.subscribe_complaints()
    }
}

#[cfg(test)]
#[path = "complaint_service_tests.rs"]
mod tests;

//! Driving port for complaint reads.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::{Complaint, ComplaintFilter, ComplaintStats, Email, Error, UserId};

use super::CollectionChange;

/// A student's own complaints with their counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintListing {
    pub complaints: Vec<Complaint>,
    pub stats: ComplaintStats,
}

/// Complaint shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintEntry {
    pub complaint: Complaint,
    /// `None` when the submitter's profile is missing.
    pub submitter_email: Option<Email>,
}

/// Filtered admin view. `stats` covers every complaint, not just the
/// filtered ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintOverview {
    pub entries: Vec<ComplaintEntry>,
    pub stats: ComplaintStats,
}

/// Domain use-case port for reading complaints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintQuery: Send + Sync {
    /// Complaints submitted by `owner`, oldest first.
    async fn list_mine(&self, owner: &UserId) -> Result<ComplaintListing, Error>;

    /// Every complaint matching `filter`, oldest first.
    async fn overview(&self, filter: &ComplaintFilter) -> Result<ComplaintOverview, Error>;

    /// Notifications for every write to the complaints collection.
    fn changes(&self) -> broadcast::Receiver<CollectionChange>;
}

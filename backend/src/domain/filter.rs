//! In-memory complaint filtering and dashboard counters.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Complaint, Status};

/// Optional predicates applied to a complaint list.
///
/// Every predicate is case-insensitive. A blank predicate places no
/// constraint; set predicates are combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    /// Substring matched against title and description.
    pub query: String,
    pub status: String,
    pub category: String,
    pub priority: String,
}

impl ComplaintFilter {
    /// Whether no predicate is set.
    pub fn is_empty(&self) -> bool {
        [&self.query, &self.status, &self.category, &self.priority]
            .iter()
            .all(|value| value.trim().is_empty())
    }

    /// Whether `complaint` satisfies every set predicate.
    pub fn matches(&self, complaint: &Complaint) -> bool {
        let query = normalise(&self.query);
        if !query.is_empty() {
            let title = complaint.title().to_lowercase();
            let description = complaint.description().to_lowercase();
            if !title.contains(&query) && !description.contains(&query) {
                return false;
            }
        }
        equals_or_blank(&self.status, complaint.status().as_str())
            && equals_or_blank(&self.category, complaint.category().as_ref())
            && equals_or_blank(&self.priority, complaint.priority().as_str())
    }

    /// Return the matching complaints in input order.
    ///
    /// # Examples
    /// ```
    /// use campus_portal::domain::ComplaintFilter;
    ///
    /// let filter = ComplaintFilter::default();
    /// assert!(filter.apply(&[]).is_empty());
    /// ```
    pub fn apply(&self, complaints: &[Complaint]) -> Vec<Complaint> {
        if self.is_empty() {
            return complaints.to_vec();
        }
        complaints
            .iter()
            .filter(|complaint| self.matches(complaint))
            .cloned()
            .collect()
    }
}

fn normalise(value: &str) -> String {
    value.trim().to_lowercase()
}

fn equals_or_blank(predicate: &str, actual: &str) -> bool {
    let predicate = normalise(predicate);
    predicate.is_empty() || predicate == actual.to_lowercase()
}

/// Counters shown on both dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStats {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

impl ComplaintStats {
    pub fn tally(complaints: &[Complaint]) -> Self {
        complaints
            .iter()
            .fold(Self::default(), |mut stats, complaint| {
                stats.total += 1;
                match complaint.status() {
                    Status::Resolved => stats.resolved += 1,
                    Status::Unresolved => stats.unresolved += 1,
                }
                stats
            })
    }
}

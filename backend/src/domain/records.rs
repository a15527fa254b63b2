//! Typed record repository over the document store port.
//!
//! Services never touch untyped documents. This repository translates
//! between stored documents and domain records and performs the
//! revision-guarded read-modify-write used for feedback edits.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::broadcast;
use tracing::warn;

use crate::domain::ports::{
    Collection, CollectionChange, DocumentStore, DocumentStoreError, StoredDocument,
};
use crate::domain::{
    Complaint, ComplaintDraft, Email, Error, Feedback, FeedbackKey, RecordId, Status, Suggestion,
    SuggestionDraft, User, UserId, append_feedback, remove_feedback,
};

mod codec;

/// Failures surfaced by [`RecordRepository`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
    /// A stored document could not be decoded or a record encoded.
    #[error("{collection}/{id} is malformed: {message}")]
    Malformed {
        collection: Collection,
        id: String,
        message: String,
    },
    /// Removal key matched no feedback entry.
    #[error("feedback not found")]
    FeedbackNotFound,
}

impl From<RecordError> for Error {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Store(DocumentStoreError::Connection { message }) => {
                Error::service_unavailable(format!("document store unavailable: {message}"))
            }
            RecordError::Store(DocumentStoreError::NotFound { collection, id }) => {
                Error::not_found(format!("{collection}/{id} not found"))
            }
            RecordError::Store(DocumentStoreError::RevisionMismatch { expected, actual }) => {
                Error::conflict("record was modified concurrently; reload and retry")
                    .with_details(serde_json::json!({
                        "expectedRevision": expected,
                        "actualRevision": actual,
                    }))
            }
            RecordError::Store(DocumentStoreError::Query { message }) => {
                Error::internal(format!("document store query failed: {message}"))
            }
            RecordError::Malformed { .. } => Error::internal(err.to_string()),
            RecordError::FeedbackNotFound => Error::not_found("feedback not found"),
        }
    }
}

fn malformed(collection: Collection, id: impl Into<String>) -> impl FnOnce(String) -> RecordError {
    let id = id.into();
    move |message| RecordError::Malformed {
        collection,
        id,
        message,
    }
}

/// Decode every document of a listing, skipping the ones that do not decode.
fn decode_listing<T>(
    collection: Collection,
    docs: &[StoredDocument],
    decode: impl Fn(&StoredDocument) -> Result<T, String>,
) -> Vec<T> {
    docs.iter()
        .filter_map(|stored| match decode(stored) {
            Ok(record) => Some(record),
            Err(message) => {
                warn!(%collection, id = %stored.id, %message, "skipping malformed document");
                None
            }
        })
        .collect()
}

/// Repository for users, complaints, suggestions and the admin allow-list.
#[derive(Clone)]
pub struct RecordRepository {
    store: Arc<dyn DocumentStore>,
}

impl RecordRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Profile stored under the auth provider's id.
    pub async fn find_user(&self, user_id: &UserId) -> Result<Option<User>, RecordError> {
        let Some(stored) = self.store.get(Collection::Users, user_id.as_ref()).await? else {
            return Ok(None);
        };
        codec::decode_user(&stored)
            .map(Some)
            .map_err(malformed(Collection::Users, stored.id.as_str()))
    }

    /// Write a profile under its user id.
    pub async fn put_user(&self, user: &User) -> Result<(), RecordError> {
        let doc = codec::encode_user(user).map_err(malformed(Collection::Users, user.id().as_ref()))?;
        self.store
            .set(Collection::Users, user.id().as_ref(), doc)
            .await?;
        Ok(())
    }

    /// Emails of the given users, keyed by id. Users without a stored
    /// profile are absent from the map.
    pub async fn emails_for<'a, I>(&self, owners: I) -> Result<HashMap<UserId, Email>, RecordError>
    where
        I: IntoIterator<Item = &'a UserId> + Send,
        I::IntoIter: Send,
    {
        let mut emails = HashMap::new();
        let mut seen = HashSet::new();
        for owner in owners {
            if !seen.insert(owner) {
                continue;
            }
            if let Some(user) = self.find_user(owner).await? {
                emails.insert(owner.clone(), user.email().clone());
            }
        }
        Ok(emails)
    }

    /// Whether `email` is on the admin allow-list.
    pub async fn is_authorized_admin(&self, email: &Email) -> Result<bool, RecordError> {
        let found = self
            .store
            .get(Collection::AuthorizedAdmins, email.as_ref())
            .await?;
        Ok(found.is_some())
    }

    /// Add `email` to the admin allow-list. Re-adding is harmless.
    pub async fn authorize_admin(&self, email: &Email) -> Result<(), RecordError> {
        let doc = codec::encode_admin(email)
            .map_err(malformed(Collection::AuthorizedAdmins, email.as_ref()))?;
        self.store
            .set(Collection::AuthorizedAdmins, email.as_ref(), doc)
            .await?;
        Ok(())
    }

    /// Every complaint that decodes, oldest first.
    pub async fn list_complaints(&self) -> Result<Vec<Complaint>, RecordError> {
        let docs = self.store.list(Collection::Complaints).await?;
        Ok(decode_listing(
            Collection::Complaints,
            &docs,
            codec::decode_complaint,
        ))
    }

    /// Complaints owned by `owner`, oldest first.
    pub async fn list_complaints_for(&self, owner: &UserId) -> Result<Vec<Complaint>, RecordError> {
        let mut complaints = self.list_complaints().await?;
        complaints.retain(|complaint| complaint.owner() == owner);
        Ok(complaints)
    }

    pub async fn find_complaint(&self, id: &RecordId) -> Result<Option<Complaint>, RecordError> {
        let Some(stored) = self.store.get(Collection::Complaints, id.as_ref()).await? else {
            return Ok(None);
        };
        codec::decode_complaint(&stored)
            .map(Some)
            .map_err(malformed(Collection::Complaints, id.as_ref()))
    }

    async fn require_complaint(&self, id: &RecordId) -> Result<Complaint, RecordError> {
        self.find_complaint(id).await?.ok_or_else(|| {
            RecordError::Store(DocumentStoreError::not_found(
                Collection::Complaints.as_str(),
                id.as_ref(),
            ))
        })
    }

    /// Store a new unresolved complaint and return its id.
    pub async fn create_complaint(
        &self,
        owner: &UserId,
        draft: &ComplaintDraft,
        submitted_on: NaiveDate,
    ) -> Result<RecordId, RecordError> {
        let doc = codec::encode_new_complaint(owner, draft, submitted_on)
            .map_err(malformed(Collection::Complaints, "<new>"))?;
        let id = self.store.add(Collection::Complaints, doc).await?;
        RecordId::new(id.as_str()).map_err(|err| malformed(Collection::Complaints, id)(err.to_string()))
    }

    /// Patch the status field only.
    pub async fn set_status(&self, id: &RecordId, status: Status) -> Result<Complaint, RecordError> {
        self.store
            .update(
                Collection::Complaints,
                id.as_ref(),
                codec::status_patch(status),
                None,
            )
            .await?;
        self.require_complaint(id).await
    }

    /// Append `entry` to the complaint's feedback list.
    ///
    /// The write is conditional on `expected_revision` when given, otherwise
    /// on the revision read here.
    pub async fn append_feedback(
        &self,
        id: &RecordId,
        entry: Feedback,
        expected_revision: Option<u64>,
    ) -> Result<Complaint, RecordError> {
        self.edit_feedbacks(id, expected_revision, |current| {
            Ok(append_feedback(current, entry))
        })
        .await
    }

    /// Remove the first feedback entry matching `key`.
    pub async fn remove_feedback(
        &self,
        id: &RecordId,
        key: &FeedbackKey,
        expected_revision: Option<u64>,
    ) -> Result<Complaint, RecordError> {
        self.edit_feedbacks(id, expected_revision, |current| {
            remove_feedback(current, key).ok_or(RecordError::FeedbackNotFound)
        })
        .await
    }

    async fn edit_feedbacks<F>(
        &self,
        id: &RecordId,
        expected_revision: Option<u64>,
        edit: F,
    ) -> Result<Complaint, RecordError>
    where
        F: FnOnce(&[Feedback]) -> Result<Vec<Feedback>, RecordError> + Send,
    {
        let current = self.require_complaint(id).await?;
        let guard = expected_revision.unwrap_or(current.revision());
        if guard != current.revision() {
            return Err(DocumentStoreError::revision_mismatch(guard, current.revision()).into());
        }
        let next = edit(current.feedbacks())?;
        let patch = codec::feedbacks_patch(&next)
            .map_err(malformed(Collection::Complaints, id.as_ref()))?;
        let revision = self
            .store
            .update(Collection::Complaints, id.as_ref(), patch, Some(guard))
            .await
            .inspect_err(|err| {
                if matches!(err, DocumentStoreError::RevisionMismatch { .. }) {
                    warn!(complaint_id = %id, error = %err, "concurrent feedback edit rejected");
                }
            })?;
        Ok(current.with_feedbacks(next).with_revision(revision))
    }

    /// Every suggestion that decodes, oldest first.
    pub async fn list_suggestions(&self) -> Result<Vec<Suggestion>, RecordError> {
        let docs = self.store.list(Collection::Suggestions).await?;
        Ok(decode_listing(
            Collection::Suggestions,
            &docs,
            codec::decode_suggestion,
        ))
    }

    pub async fn create_suggestion(
        &self,
        owner: &UserId,
        draft: &SuggestionDraft,
        submitted_on: NaiveDate,
    ) -> Result<RecordId, RecordError> {
        let doc = codec::encode_new_suggestion(owner, draft, submitted_on)
            .map_err(malformed(Collection::Suggestions, "<new>"))?;
        let id = self.store.add(Collection::Suggestions, doc).await?;
        RecordId::new(id.as_str())
            .map_err(|err| malformed(Collection::Suggestions, id)(err.to_string()))
    }

    /// Notifications for writes to the complaints collection.
    pub fn subscribe_complaints(&self) -> broadcast::Receiver<CollectionChange> {
        self.store.subscribe(Collection::Complaints)
    }
}

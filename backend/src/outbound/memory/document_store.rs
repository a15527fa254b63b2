//! In-memory document store.
//!
//! Collections are guarded by a single `tokio::sync::RwLock`. Every write
//! publishes a [`CollectionChange`] on the collection's broadcast channel;
//! subscribers that fall behind skip to the newest notification.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    Collection, CollectionChange, Document, DocumentStore, DocumentStoreError, StoredDocument,
};

const CHANGE_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    revision: u64,
    data: Document,
}

#[derive(Debug, Default)]
struct Collections {
    next_seq: u64,
    docs: HashMap<Collection, HashMap<String, Entry>>,
}

impl Collections {
    fn bucket(&mut self, collection: Collection) -> &mut HashMap<String, Entry> {
        self.docs.entry(collection).or_default()
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Document store kept in process memory.
///
/// # Examples
/// ```
/// use campus_portal::domain::ports::{Collection, DocumentStore};
/// use campus_portal::outbound::memory::InMemoryDocumentStore;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let store = InMemoryDocumentStore::new();
/// let id = store.add(Collection::Suggestions, Default::default()).await.expect("add");
/// let doc = store.get(Collection::Suggestions, &id).await.expect("get");
/// assert_eq!(doc.map(|d| d.revision), Some(1));
/// # });
/// ```
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
    changes: HashMap<Collection, broadcast::Sender<CollectionChange>>,
    available: AtomicBool,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        let changes = Collection::ALL
            .into_iter()
            .map(|collection| (collection, broadcast::channel(CHANGE_CAPACITY).0))
            .collect();
        Self {
            collections: RwLock::new(Collections::default()),
            changes,
            available: AtomicBool::new(true),
        }
    }

    /// Simulate losing (or regaining) the connection to the store.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), DocumentStoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DocumentStoreError::connection("in-memory store marked unavailable"))
        }
    }

    fn publish(&self, collection: Collection, id: &str, revision: u64) {
        if let Some(sender) = self.changes.get(&collection) {
            // No receivers is not an error.
            let _ = sender.send(CollectionChange {
                collection,
                id: id.to_owned(),
                revision,
            });
        }
        debug!(%collection, id, revision, "document written");
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        self.ensure_available()?;
        let guard = self.collections.read().await;
        Ok(guard
            .docs
            .get(&collection)
            .and_then(|bucket| bucket.get(id))
            .map(|entry| StoredDocument {
                id: id.to_owned(),
                revision: entry.revision,
                data: entry.data.clone(),
            }))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        self.ensure_available()?;
        let guard = self.collections.read().await;
        let Some(bucket) = guard.docs.get(&collection) else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<(&String, &Entry)> = bucket.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.seq);
        Ok(entries
            .into_iter()
            .map(|(id, entry)| StoredDocument {
                id: id.clone(),
                revision: entry.revision,
                data: entry.data.clone(),
            })
            .collect())
    }

    async fn add(
        &self,
        collection: Collection,
        data: Document,
    ) -> Result<String, DocumentStoreError> {
        self.ensure_available()?;
        let id = Uuid::new_v4().simple().to_string();
        {
            let mut guard = self.collections.write().await;
            let seq = guard.next_seq();
            guard.bucket(collection).insert(
                id.clone(),
                Entry {
                    seq,
                    revision: 1,
                    data,
                },
            );
        }
        self.publish(collection, &id, 1);
        Ok(id)
    }

    async fn set(
        &self,
        collection: Collection,
        id: &str,
        data: Document,
    ) -> Result<u64, DocumentStoreError> {
        self.ensure_available()?;
        let revision = {
            let mut guard = self.collections.write().await;
            let seq = guard.next_seq();
            let bucket = guard.bucket(collection);
            match bucket.get_mut(id) {
                Some(entry) => {
                    entry.revision += 1;
                    entry.data = data;
                    entry.revision
                }
                None => {
                    bucket.insert(
                        id.to_owned(),
                        Entry {
                            seq,
                            revision: 1,
                            data,
                        },
                    );
                    1
                }
            }
        };
        self.publish(collection, id, revision);
        Ok(revision)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Document,
        expected_revision: Option<u64>,
    ) -> Result<u64, DocumentStoreError> {
        self.ensure_available()?;
        let revision = {
            let mut guard = self.collections.write().await;
            let entry = guard
                .bucket(collection)
                .get_mut(id)
                .ok_or_else(|| DocumentStoreError::not_found(collection.as_str(), id))?;
            match expected_revision {
                Some(expected) if expected != entry.revision => {
                    return Err(DocumentStoreError::revision_mismatch(
                        expected,
                        entry.revision,
                    ));
                }
                _ => {}
            }
            entry.data.extend(patch);
            entry.revision += 1;
            entry.revision
        };
        self.publish(collection, id, revision);
        Ok(revision)
    }

    fn subscribe(&self, collection: Collection) -> broadcast::Receiver<CollectionChange> {
        match self.changes.get(&collection) {
            Some(sender) => sender.subscribe(),
            // Every collection gets a sender in `new`.
            None => broadcast::channel(1).1,
        }
    }
}

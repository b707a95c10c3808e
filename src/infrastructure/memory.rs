//! In-memory adapters for the catalog's ports.
//!
//! Back the integration tests and the maintenance binary. The document
//! store supports injected failures so error paths can be exercised
//! deterministically.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::ports::blob_store::BlobStore;
use crate::domain::ports::document_store::{CollectionRef, Document, DocumentStore, StoreError};

/// In-memory document store with collection semantics
///
/// Documents are kept per collection path in insertion-stable order.
/// `set` upserts, `update` merges into an existing document and fails
/// if it is missing, `delete` is idempotent.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
    next_fault: Mutex<Option<StoreError>>,
    collection_faults: Mutex<HashMap<String, StoreError>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next store operation fail with the given error
    pub async fn fail_next(&self, error: StoreError) {
        *self.next_fault.lock().await = Some(error);
    }

    /// Makes every operation on one collection fail until cleared
    pub async fn fail_collection(&self, collection: &CollectionRef, error: StoreError) {
        self.collection_faults
            .lock()
            .await
            .insert(collection.path().to_string(), error);
    }

    /// Removes all injected faults
    pub async fn clear_faults(&self) {
        *self.next_fault.lock().await = None;
        self.collection_faults.lock().await.clear();
    }

    /// Returns how many documents a collection holds
    pub async fn document_count(&self, collection: &CollectionRef) -> usize {
        self.collections
            .read()
            .await
            .get(collection.path())
            .map(|documents| documents.len())
            .unwrap_or(0)
    }

    /// Returns whether a document exists
    pub async fn contains(&self, collection: &CollectionRef, id: &str) -> bool {
        self.collections
            .read()
            .await
            .get(collection.path())
            .is_some_and(|documents| documents.contains_key(id))
    }

    async fn check_fault(&self, collection: &CollectionRef) -> Result<(), StoreError> {
        if let Some(error) = self.next_fault.lock().await.take() {
            return Err(error);
        }
        if let Some(error) = self.collection_faults.lock().await.get(collection.path()) {
            return Err(error.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(
        &self,
        collection: &CollectionRef,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.check_fault(collection).await?;
        Ok(self
            .collections
            .read()
            .await
            .get(collection.path())
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn list(&self, collection: &CollectionRef) -> Result<Vec<Document>, StoreError> {
        self.check_fault(collection).await?;
        Ok(self
            .collections
            .read()
            .await
            .get(collection.path())
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn set(
        &self,
        collection: &CollectionRef,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        self.check_fault(collection).await?;
        self.collections
            .write()
            .await
            .entry(collection.path().to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn update(
        &self,
        collection: &CollectionRef,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        self.check_fault(collection).await?;
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection.path())
            .and_then(|documents| documents.get_mut(id))
            .ok_or_else(|| {
                StoreError::Unavailable(format!(
                    "document {}/{} does not exist",
                    collection.path(),
                    id
                ))
            })?;
        for (key, value) in fields {
            document.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &CollectionRef, id: &str) -> Result<(), StoreError> {
        self.check_fault(collection).await?;
        if let Some(documents) = self.collections.write().await.get_mut(collection.path()) {
            documents.remove(id);
        }
        Ok(())
    }
}

/// In-memory blob store issuing `mem://` URLs
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Blob>>,
}

struct Blob {
    bytes: Vec<u8>,
    content_type: String,
}

const URL_SCHEME: &str = "mem://";

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many blobs the store holds
    pub async fn blob_count(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Returns whether a blob exists behind a URL
    pub async fn contains(&self, url: &str) -> bool {
        self.blobs.read().await.contains_key(url)
    }

    /// Returns the stored content type behind a URL
    pub async fn content_type(&self, url: &str) -> Option<String> {
        self.blobs
            .read()
            .await
            .get(url)
            .map(|blob| blob.content_type.clone())
    }

    /// Returns the stored byte size behind a URL
    pub async fn byte_len(&self, url: &str) -> Option<usize> {
        self.blobs.read().await.get(url).map(|blob| blob.bytes.len())
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        let url = format!("{}{}", URL_SCHEME, path);
        self.blobs.write().await.insert(
            url.clone(),
            Blob {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), StoreError> {
        // a missing blob is already gone
        self.blobs.write().await.remove(url);
        Ok(())
    }

    fn owns(&self, url: &str) -> bool {
        url.starts_with(URL_SCHEME)
    }
}

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Flat field map of a single stored document
///
/// The codec reserves the `"id"` field for the document id.
pub type Document = Map<String, Value>;

/// Errors reported by the remote document and blob stores
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

/// Reference to a document collection
///
/// Either a root collection (`properties`) or a sub-collection under a
/// parent document (`users/{uid}/favorites`). The path string is the
/// storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionRef {
    path: String,
}

impl CollectionRef {
    /// References a root collection
    pub fn root(name: &str) -> Self {
        Self {
            path: name.to_string(),
        }
    }

    /// References a sub-collection under a parent document
    ///
    /// # Example
    /// ```
    /// use immo_catalog::domain::ports::document_store::CollectionRef;
    ///
    /// let favorites = CollectionRef::sub("users", "u-1", "favorites");
    /// assert_eq!(favorites.path(), "users/u-1/favorites");
    /// ```
    pub fn sub(parent: &str, parent_id: &str, name: &str) -> Self {
        Self {
            path: format!("{}/{}/{}", parent, parent_id, name),
        }
    }

    /// Returns the full collection path
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Port for the remote document store backing the catalog
///
/// Defines the contract the catalog needs from its storage backend.
/// Implementations handle transport and backend-specific details.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, None if it does not exist
    async fn get(&self, collection: &CollectionRef, id: &str)
        -> Result<Option<Document>, StoreError>;

    /// Fetch every document in a collection
    async fn list(&self, collection: &CollectionRef) -> Result<Vec<Document>, StoreError>;

    /// Create or fully replace a document (upsert)
    async fn set(
        &self,
        collection: &CollectionRef,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError>;

    /// Merge fields into an existing document; fails if it does not exist
    async fn update(
        &self,
        collection: &CollectionRef,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError>;

    /// Delete a document; deleting a missing document is not an error
    async fn delete(&self, collection: &CollectionRef, id: &str) -> Result<(), StoreError>;
}

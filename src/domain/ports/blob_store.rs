use async_trait::async_trait;

use super::document_store::StoreError;

/// Port for the object storage behind listing images
///
/// The catalog never reads image bytes; it only uploads new ones and
/// deletes the blobs it owns when a listing is removed.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload bytes under a storage path, returning the public URL
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError>;

    /// Delete the blob behind a URL; a missing blob is treated as already gone
    async fn delete(&self, url: &str) -> Result<(), StoreError>;

    /// Whether the URL points into this store
    ///
    /// Listings may reference external images that were never uploaded
    /// here; those are left untouched on delete.
    fn owns(&self, url: &str) -> bool;
}

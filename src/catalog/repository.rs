use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::cache::CacheHandle;
use super::codec;
use super::enrichment;
use super::errors::{CatalogError, CatalogResult};
use crate::domain::ports::blob_store::BlobStore;
use crate::domain::ports::document_store::{CollectionRef, DocumentStore};
use crate::domain::ports::geocoder::Geocoder;
use crate::domain::property::Property;

/// Root collection holding every property document
pub const PROPERTIES_COLLECTION: &str = "properties";

/// Repository for the property catalog
///
/// Owns the read and write paths between the remote document store and
/// the in-memory cache. Every successful write is reflected in the
/// cache before the call returns; every failed remote call leaves the
/// cache untouched.
pub struct PropertyRepository {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    geocoder: Arc<dyn Geocoder>,
    cache: CacheHandle,
}

impl PropertyRepository {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        geocoder: Arc<dyn Geocoder>,
        cache: CacheHandle,
    ) -> Self {
        Self {
            store,
            blobs,
            geocoder,
            cache,
        }
    }

    /// Returns the cache handle shared by this repository
    pub fn cache(&self) -> &CacheHandle {
        &self.cache
    }

    fn collection(&self) -> CollectionRef {
        CollectionRef::root(PROPERTIES_COLLECTION)
    }

    /// Refreshes the catalog from the remote store
    ///
    /// Replaces the cache wholesale and returns the new list with the
    /// favorite overlay applied. Documents that fail to decode are
    /// skipped so one corrupt record cannot take down the catalog.
    /// On a remote failure the cache keeps its previous contents.
    pub async fn fetch_all(&self) -> CatalogResult<Vec<Property>> {
        let docs = self
            .store
            .list(&self.collection())
            .await
            .map_err(CatalogError::RemoteRead)?;

        let mut properties = Vec::with_capacity(docs.len());
        for doc in &docs {
            match codec::decode_property(doc) {
                Ok(property) => properties.push(property),
                Err(reason) => {
                    let id = doc.get("id").and_then(|v| v.as_str()).unwrap_or("<unknown>");
                    warn!(document = id, reason = %reason, "skipping undecodable property document");
                }
            }
        }

        let published = self.cache.replace_all(properties).await;
        debug!(count = published.len(), "catalog refreshed");
        Ok(published)
    }

    /// Fetches one property fresh from the remote store
    ///
    /// Never served from the cache, so a stale snapshot cannot mask a
    /// deleted listing. The favorite flag is applied from the current
    /// overlay. The cache itself is not modified.
    pub async fn get_by_id(&self, id: &str) -> CatalogResult<Property> {
        let doc = self
            .store
            .get(&self.collection(), id)
            .await
            .map_err(CatalogError::RemoteRead)?
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })?;

        let mut property = codec::decode_property(&doc).map_err(|reason| {
            warn!(document = id, reason = %reason, "undecodable property document");
            CatalogError::NotFound { id: id.to_string() }
        })?;

        property.set_favorite(self.cache.is_favorite(id));
        Ok(property)
    }

    /// Persists a property and reflects it in the cache
    ///
    /// Assigns an id on first save. A listing without coordinates is
    /// geocoded best-effort: a geocoding failure is logged and the
    /// listing is saved without coordinates, to be repaired by a later
    /// bulk pass. The write is a single upsert, so saving is idempotent
    /// and safe to retry.
    pub async fn save(&self, mut property: Property) -> CatalogResult<Property> {
        if property.id().is_empty() {
            property.assign_id(Uuid::new_v4().to_string());
        }

        if property.coordinates().is_none() {
            match enrichment::locate(self.geocoder.as_ref(), &property).await {
                Ok(coordinates) => property.set_coordinates(coordinates),
                Err(error) => {
                    warn!(
                        property = property.id(),
                        error = %error,
                        "geocoding failed, saving without coordinates"
                    );
                }
            }
        }

        property.mark_persisted(Utc::now());

        let doc = codec::encode_property(&property);
        self.store
            .set(&self.collection(), property.id(), doc)
            .await
            .map_err(CatalogError::RemoteWrite)?;

        self.cache.upsert(property.clone()).await;
        debug!(property = property.id(), "property saved");
        Ok(property)
    }

    /// Deletes a property, its owned images and its cache entry
    ///
    /// Checks the document first so a double delete surfaces as
    /// `NotFound` without touching any blob. Owned image blobs are
    /// removed before the document; external image URLs are left
    /// alone. Finishes with a full refresh so the cache matches the
    /// remote store exactly.
    pub async fn delete(&self, property: &Property) -> CatalogResult<()> {
        let id = property.id();
        if id.is_empty() {
            return Err(CatalogError::NotFound { id: String::new() });
        }

        let existing = self
            .store
            .get(&self.collection(), id)
            .await
            .map_err(CatalogError::RemoteRead)?;
        if existing.is_none() {
            return Err(CatalogError::NotFound { id: id.to_string() });
        }

        for url in property.image_urls() {
            if self.blobs.owns(url) {
                self.blobs
                    .delete(url)
                    .await
                    .map_err(CatalogError::RemoteWrite)?;
            }
        }

        self.store
            .delete(&self.collection(), id)
            .await
            .map_err(CatalogError::RemoteWrite)?;

        debug!(property = id, "property deleted");
        self.fetch_all().await?;
        Ok(())
    }
}

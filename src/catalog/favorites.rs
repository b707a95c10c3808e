use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::cache::CacheHandle;
use super::codec;
use super::errors::{CatalogError, CatalogResult};
use crate::domain::favorite::Favorite;
use crate::domain::ports::auth::AuthContext;
use crate::domain::ports::document_store::{CollectionRef, DocumentStore};
use crate::domain::property::Property;

const USERS_COLLECTION: &str = "users";
const FAVORITES_COLLECTION: &str = "favorites";

fn favorites_of(user_id: &str) -> CollectionRef {
    CollectionRef::sub(USERS_COLLECTION, user_id, FAVORITES_COLLECTION)
}

/// Per-user favorites overlay
///
/// Keeps the session's favorite id set in the cache in step with the
/// user's `users/{uid}/favorites` sub-collection. The remote documents
/// are the durable record; the cached set is what the catalog's
/// `is_favorite` flags are derived from.
pub struct FavoritesOverlay {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthContext>,
    cache: CacheHandle,
}

impl FavoritesOverlay {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthContext>,
        cache: CacheHandle,
    ) -> Self {
        Self { store, auth, cache }
    }

    fn current_user(&self) -> CatalogResult<String> {
        self.auth
            .current_user_id()
            .ok_or(CatalogError::Unauthenticated)
    }

    /// Loads the signed-in user's favorites and replaces the overlay
    ///
    /// The id set is swapped wholesale and every cached listing gets
    /// its flag re-derived. On a remote failure the previous set stays
    /// in place. Undecodable favorite documents are skipped.
    pub async fn load(&self) -> CatalogResult<HashSet<String>> {
        let user_id = self.current_user()?;

        let docs = self
            .store
            .list(&favorites_of(&user_id))
            .await
            .map_err(CatalogError::FavoriteLoad)?;

        let mut ids = HashSet::with_capacity(docs.len());
        for doc in &docs {
            match codec::decode_favorite(doc) {
                Ok(favorite) => {
                    ids.insert(favorite.property_id().to_string());
                }
                Err(reason) => {
                    warn!(user = %user_id, reason = %reason, "skipping undecodable favorite document");
                }
            }
        }

        self.cache.set_favorites(ids.clone()).await;
        info!(user = %user_id, count = ids.len(), "favorites loaded");
        Ok(ids)
    }

    /// Toggles a listing in and out of the user's favorites
    ///
    /// Returns the new favorite state. Creating a favorite stores a
    /// denormalized snapshot of the listing so the favorites screen
    /// renders without further fetches.
    ///
    /// Check-then-act: two overlapping toggles for the same listing can
    /// observe the same remote state and settle on the same outcome.
    /// Cache updates still serialize through the cache task, and the
    /// next `load` reconciles with the remote record.
    pub async fn toggle(&self, property: &Property) -> CatalogResult<bool> {
        let user_id = self.current_user()?;
        let id = property.id();
        if id.is_empty() {
            // never-saved listings have no id to key the favorite document
            return Err(CatalogError::NotFound { id: String::new() });
        }

        let collection = favorites_of(&user_id);
        let existing = self
            .store
            .get(&collection, id)
            .await
            .map_err(CatalogError::FavoriteToggle)?;

        if existing.is_some() {
            self.store
                .delete(&collection, id)
                .await
                .map_err(CatalogError::FavoriteToggle)?;
            self.cache.remove_favorite(id.to_string()).await;
            debug!(user = %user_id, property = id, "favorite removed");
            Ok(false)
        } else {
            let favorite = Favorite::from_property(property, Utc::now());
            self.store
                .set(&collection, id, codec::encode_favorite(&favorite))
                .await
                .map_err(CatalogError::FavoriteToggle)?;
            self.cache.add_favorite(id.to_string()).await;
            debug!(user = %user_id, property = id, "favorite added");
            Ok(true)
        }
    }

    /// Empties the local overlay; used on sign-out
    ///
    /// Remote favorite documents are untouched, so the set comes back
    /// on the next `load` by the same user.
    pub async fn clear(&self) {
        self.cache.clear_favorites().await;
        debug!("favorites overlay cleared");
    }

    /// Returns whether a listing is favorited in the current session
    ///
    /// Always false when no favorites were loaded, including when no
    /// user is signed in.
    pub fn is_favorite(&self, id: &str) -> bool {
        self.cache.is_favorite(id)
    }
}

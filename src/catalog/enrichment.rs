//! Best-effort geolocation enrichment.
//!
//! Listings enter the catalog without coordinates whenever geocoding
//! fails at save time. The bulk repair pass sweeps the whole catalog,
//! geocodes every listing still missing coordinates with bounded
//! concurrency, and patches only the geo fields of each document.
//! Geocoding never blocks or fails a save; missing coordinates are a
//! valid, retryable state.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::{watch, Semaphore};
use tracing::{debug, error, info, warn};

use super::codec;
use super::errors::CatalogResult;
use super::repository::{PropertyRepository, PROPERTIES_COLLECTION};
use crate::domain::ports::document_store::{CollectionRef, DocumentStore};
use crate::domain::ports::geocoder::{GeocodeError, Geocoder};
use crate::domain::property::value_objects::Coordinates;
use crate::domain::property::Property;

/// Tuning knobs for the bulk repair pass
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Maximum geocode requests in flight at once
    pub max_concurrent: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self { max_concurrent: 4 }
    }
}

/// Outcome counters of one bulk repair pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Listings that were missing coordinates when the pass started
    pub candidates: usize,
    /// Listings whose coordinates were geocoded and persisted
    pub repaired: usize,
    /// Listings that failed to geocode or to persist
    pub failed: usize,
}

/// Geolocation enrichment over the property catalog
pub struct GeoEnrichment {
    geocoder: Arc<dyn Geocoder>,
    store: Arc<dyn DocumentStore>,
    repository: Arc<PropertyRepository>,
    config: EnrichmentConfig,
}

/// Builds the forward-geocoding query for a listing's postal address
fn geocode_query(property: &Property) -> String {
    format!(
        "{}, {}, {}, {}",
        property.address(),
        property.city(),
        property.country(),
        property.zip_code()
    )
}

/// Geocodes a listing's address, taking the most relevant candidate
pub(crate) async fn locate(
    geocoder: &dyn Geocoder,
    property: &Property,
) -> Result<Coordinates, GeocodeError> {
    let query = geocode_query(property);
    let candidates = geocoder.geocode(&query).await?;
    candidates
        .into_iter()
        .next()
        .ok_or(GeocodeError::NoMatches { query })
}

/// Geocodes then patches one listing; returns whether it was repaired
async fn repair_one(
    geocoder: Arc<dyn Geocoder>,
    store: Arc<dyn DocumentStore>,
    property: Property,
) -> bool {
    let id = property.id().to_string();

    let coordinates = match locate(geocoder.as_ref(), &property).await {
        Ok(coordinates) => coordinates,
        Err(error) => {
            warn!(property = %id, error = %error, "geocoding failed during repair");
            return false;
        }
    };

    let fields = codec::encode_coordinate_update(coordinates, Utc::now());
    match store
        .update(&CollectionRef::root(PROPERTIES_COLLECTION), &id, fields)
        .await
    {
        Ok(()) => {
            debug!(property = %id, "coordinates repaired");
            true
        }
        Err(error) => {
            warn!(property = %id, error = %error, "failed to persist repaired coordinates");
            false
        }
    }
}

impl GeoEnrichment {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        store: Arc<dyn DocumentStore>,
        repository: Arc<PropertyRepository>,
        config: EnrichmentConfig,
    ) -> Self {
        Self {
            geocoder,
            store,
            repository,
            config,
        }
    }

    /// Geocodes a single listing's address
    ///
    /// Returns a copy of the listing carrying the new coordinates; the
    /// input is untouched and nothing is persisted. Both error cases
    /// are recoverable: the listing simply stays un-geocoded.
    pub async fn geocode(&self, property: &Property) -> Result<Property, GeocodeError> {
        let coordinates = locate(self.geocoder.as_ref(), property).await?;
        let mut enriched = property.clone();
        enriched.set_coordinates(coordinates);
        Ok(enriched)
    }

    /// Repairs every listing in the catalog that lacks coordinates
    ///
    /// Runs until every candidate was attempted once. See
    /// [`repair_all_missing_with_cancel`](Self::repair_all_missing_with_cancel)
    /// for the mechanics.
    pub async fn repair_all_missing(&self) -> CatalogResult<RepairReport> {
        let (_keep_open, cancel) = watch::channel(false);
        self.repair_all_missing_with_cancel(&cancel).await
    }

    /// Repairs listings lacking coordinates until done or cancelled
    ///
    /// Fetches the catalog, then fans out one geocode-and-patch task
    /// per candidate, at most `max_concurrent` in flight. Each task
    /// only touches the geo fields of its own document, so a repair
    /// can never clobber a concurrent edit to the rest of a listing.
    /// Task failures are logged and counted, never propagated, and
    /// siblings keep running. Once cancellation is signalled no new
    /// task is scheduled; tasks already in flight run to completion.
    /// Ends with a full refresh so the cache picks up the new
    /// coordinates. Running the pass twice is harmless: repaired
    /// listings are no longer candidates.
    pub async fn repair_all_missing_with_cancel(
        &self,
        cancel: &watch::Receiver<bool>,
    ) -> CatalogResult<RepairReport> {
        let catalog = self.repository.fetch_all().await?;
        let missing: Vec<Property> = catalog
            .into_iter()
            .filter(|property| property.coordinates().is_none())
            .collect();

        let mut report = RepairReport {
            candidates: missing.len(),
            ..RepairReport::default()
        };
        if missing.is_empty() {
            debug!("no listings awaiting geocoding");
            return Ok(report);
        }

        info!(
            candidates = report.candidates,
            max_concurrent = self.config.max_concurrent,
            "starting geocode repair"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let mut tasks = Vec::with_capacity(missing.len());
        for property in missing {
            if *cancel.borrow() {
                info!("geocode repair cancelled, remaining listings not scheduled");
                break;
            }
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            // cancellation may have arrived while waiting for a permit
            if *cancel.borrow() {
                info!("geocode repair cancelled, remaining listings not scheduled");
                break;
            }

            let geocoder = Arc::clone(&self.geocoder);
            let store = Arc::clone(&self.store);
            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                repair_one(geocoder, store, property).await
            }));
        }

        for outcome in join_all(tasks).await {
            match outcome {
                Ok(true) => report.repaired += 1,
                Ok(false) => report.failed += 1,
                Err(join_error) => {
                    error!(error = %join_error, "geocode repair task aborted");
                    report.failed += 1;
                }
            }
        }

        self.repository.fetch_all().await?;
        info!(
            candidates = report.candidates,
            repaired = report.repaired,
            failed = report.failed,
            "geocode repair finished"
        );
        Ok(report)
    }
}

//! Catalog maintenance tool.
//!
//! Loads a JSON export of listings, runs the bulk geocode repair with
//! bounded concurrency, and writes the enriched catalog back out.

use std::sync::Arc;

use immo_catalog::catalog::cache::CacheHandle;
use immo_catalog::catalog::codec;
use immo_catalog::catalog::enrichment::{EnrichmentConfig, GeoEnrichment};
use immo_catalog::catalog::repository::{PropertyRepository, PROPERTIES_COLLECTION};
use immo_catalog::domain::ports::document_store::{CollectionRef, Document, DocumentStore};
use immo_catalog::infrastructure::memory::{InMemoryBlobStore, InMemoryDocumentStore};
use immo_catalog::infrastructure::nominatim::NominatimGeocoder;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let seed_path = std::env::var("CATALOG_SEED").unwrap_or_else(|_| {
        tracing::warn!("CATALOG_SEED not set, using default");
        "catalog.json".to_string()
    });

    let out_path = std::env::var("CATALOG_OUT").unwrap_or_else(|_| {
        tracing::warn!("CATALOG_OUT not set, using default");
        "catalog.enriched.json".to_string()
    });

    let geocoder_url = std::env::var("GEOCODER_URL").unwrap_or_else(|_| {
        tracing::warn!("GEOCODER_URL not set, using the public Nominatim instance");
        "https://nominatim.openstreetmap.org".to_string()
    });

    let user_agent = std::env::var("GEOCODER_USER_AGENT")
        .unwrap_or_else(|_| "immo-catalog/0.1 (geocode repair tool)".to_string());

    let max_concurrent: usize = std::env::var("REPAIR_CONCURRENCY")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| EnrichmentConfig::default().max_concurrent);

    // Load the catalog export into an in-memory store
    tracing::info!("Loading catalog from {}", seed_path);
    let raw = tokio::fs::read_to_string(&seed_path)
        .await
        .expect("Failed to read catalog seed file");
    let docs: Vec<Document> =
        serde_json::from_str(&raw).expect("Catalog seed must be a JSON array of objects");

    let store = Arc::new(InMemoryDocumentStore::new());
    let properties = CollectionRef::root(PROPERTIES_COLLECTION);
    let mut seeded = 0usize;
    for mut doc in docs {
        let id = match doc.get("id").and_then(|value| value.as_str()) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let id = uuid::Uuid::new_v4().to_string();
                doc.insert("id".to_string(), serde_json::json!(id));
                id
            }
        };
        store
            .set(&properties, &id, doc)
            .await
            .expect("Failed to seed the in-memory store");
        seeded += 1;
    }
    tracing::info!("Seeded {} documents", seeded);

    // Wire the engine
    tracing::info!("Using geocoder at {}", geocoder_url);
    let geocoder = Arc::new(
        NominatimGeocoder::new(geocoder_url, &user_agent).expect("Failed to build geocoder"),
    );
    let blobs = Arc::new(InMemoryBlobStore::new());
    let cache = CacheHandle::new();
    let repository = Arc::new(PropertyRepository::new(
        store.clone(),
        blobs,
        geocoder.clone(),
        cache,
    ));
    let enrichment = GeoEnrichment::new(
        geocoder,
        store,
        repository.clone(),
        EnrichmentConfig { max_concurrent },
    );

    // Repair every listing still missing coordinates
    let report = enrichment
        .repair_all_missing()
        .await
        .expect("Geocode repair failed");
    tracing::info!(
        "Repair finished: {} candidates, {} repaired, {} failed",
        report.candidates,
        report.repaired,
        report.failed
    );

    // Write the enriched catalog back out
    let catalog = repository
        .fetch_all()
        .await
        .expect("Failed to fetch the enriched catalog");
    let encoded: Vec<Document> = catalog.iter().map(codec::encode_property).collect();
    let out = serde_json::to_string_pretty(&encoded).expect("Failed to serialize catalog");
    tokio::fs::write(&out_path, out)
        .await
        .expect("Failed to write the enriched catalog");

    tracing::info!("Enriched catalog written to {}", out_path);
}

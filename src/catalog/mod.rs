// Catalog engine module
// Cache, repository, favorites overlay and geolocation enrichment;
// everything here talks to remote services through domain ports only

pub mod cache;
pub mod codec;
pub mod enrichment;
pub mod errors;
pub mod favorites;
pub mod repository;

// Re-export main types for convenience
pub use cache::{CacheHandle, CatalogState};
pub use enrichment::{EnrichmentConfig, GeoEnrichment, RepairReport};
pub use errors::{CatalogError, CatalogResult};
pub use favorites::FavoritesOverlay;
pub use repository::PropertyRepository;

// Infrastructure layer module
// Contains adapters for the catalog's outbound ports
// Follows Hexagonal Architecture

pub mod auth;
pub mod memory;
pub mod nominatim;

pub use auth::FixedAuth;
pub use memory::{InMemoryBlobStore, InMemoryDocumentStore};
pub use nominatim::NominatimGeocoder;

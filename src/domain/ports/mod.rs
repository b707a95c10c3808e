// Outbound ports of the catalog engine
// Traits for the remote services the engine consumes; adapters live
// in the infrastructure layer

pub mod auth;
pub mod blob_store;
pub mod document_store;
pub mod geocoder;

// Re-export main types for convenience
pub use auth::AuthContext;
pub use blob_store::BlobStore;
pub use document_store::{CollectionRef, Document, DocumentStore, StoreError};
pub use geocoder::{GeocodeError, Geocoder};

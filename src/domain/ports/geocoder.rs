use async_trait::async_trait;
use thiserror::Error;

use crate::domain::property::value_objects::Coordinates;

/// Errors reported by the geocoding service
///
/// Both variants are recoverable by contract: a listing without
/// coordinates stays valid and is retried by the next repair pass.
#[derive(Debug, Clone, Error)]
pub enum GeocodeError {
    #[error("no geocoding matches for query: {query}")]
    NoMatches { query: String },

    #[error("geocoding service unavailable: {0}")]
    Unavailable(String),
}

/// Port for forward geocoding of postal addresses
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-form address query to candidate coordinates
    ///
    /// Candidates are ordered by relevance; callers take the first.
    async fn geocode(&self, query: &str) -> Result<Vec<Coordinates>, GeocodeError>;
}

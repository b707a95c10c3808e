use thiserror::Error;

use crate::domain::ports::document_store::StoreError;

/// Errors surfaced by catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("property not found: {id}")]
    NotFound { id: String },

    #[error("no authenticated user")]
    Unauthenticated,

    #[error("remote read failed: {0}")]
    RemoteRead(#[source] StoreError),

    #[error("remote write failed: {0}")]
    RemoteWrite(#[source] StoreError),

    #[error("loading favorites failed: {0}")]
    FavoriteLoad(#[source] StoreError),

    #[error("toggling favorite failed: {0}")]
    FavoriteToggle(#[source] StoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_property() {
        let error = CatalogError::NotFound {
            id: "prop-1".to_string(),
        };
        assert_eq!(error.to_string(), "property not found: prop-1");
    }

    #[test]
    fn remote_errors_carry_their_source() {
        use std::error::Error;

        let error = CatalogError::RemoteRead(StoreError::Unavailable("timeout".to_string()));
        assert!(error.source().is_some());
        assert!(error.to_string().contains("timeout"));
    }
}

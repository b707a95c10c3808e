use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::property::Property;

/// Denormalized snapshot of a favorited listing
///
/// Stored per user under `users/{uid}/favorites/{property_id}` so the
/// favorites screen can render without fetching every full listing.
/// The snapshot is taken at toggle time and is not kept in sync with
/// later edits to the listing.
#[derive(Debug, Clone)]
pub struct Favorite {
    property_id: String,
    title: String,
    price: Decimal,
    address: String,
    city: String,
    thumbnail_url: Option<String>,
    added_at: Option<DateTime<Utc>>,
}

impl Favorite {
    /// Builds the favorite snapshot for a listing
    ///
    /// # Arguments
    /// * `property` - The listing being favorited (must carry an id)
    /// * `added_at` - When the favorite was recorded
    pub fn from_property(property: &Property, added_at: DateTime<Utc>) -> Self {
        Self {
            property_id: property.id().to_string(),
            title: property.title().to_string(),
            price: property.price(),
            address: property.address().to_string(),
            city: property.city().to_string(),
            thumbnail_url: property.image_urls().first().cloned(),
            added_at: Some(added_at),
        }
    }

    /// Reconstructs a Favorite from persistence layer data
    pub fn from_persistence(
        property_id: String,
        title: String,
        price: Decimal,
        address: String,
        city: String,
        thumbnail_url: Option<String>,
        added_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            property_id,
            title,
            price,
            address,
            city,
            thumbnail_url,
            added_at,
        }
    }

    /// Returns the id of the favorited listing
    pub fn property_id(&self) -> &str {
        &self.property_id
    }

    /// Returns the listing headline at toggle time
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the asking price at toggle time
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the street address at toggle time
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the city at toggle time
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the first gallery image, if the listing had one
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    /// Returns when the favorite was recorded
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        self.added_at
    }
}

use super::value_objects::{Coordinates, PhoneNumber, PropertyKind, Purpose};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Property aggregate root
///
/// Represents a single real-estate listing as held by the catalog.
/// Enforces all business rules related to listing data.
///
/// # Invariants
/// - Title cannot be empty
/// - Price must be non-negative
/// - Area must be positive
/// - The id is immutable once assigned
/// - `is_favorite` is derived per session and never persisted
#[derive(Debug, Clone)]
pub struct Property {
    id: String,
    user_id: String,
    title: String,
    description: String,
    kind: PropertyKind,
    purpose: Purpose,
    price: Decimal,
    bedrooms: u32,
    bathrooms: u32,
    area: f64,
    address: String,
    city: String,
    zip_code: String,
    country: String,
    image_urls: Vec<String>,
    coordinates: Option<Coordinates>,
    whatsapp: PhoneNumber,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    is_favorite: bool,
}

impl Property {
    /// Creates a new Property listing
    ///
    /// The listing starts without an id, without coordinates and without
    /// timestamps; all three are assigned when it is first persisted.
    ///
    /// # Arguments
    /// * `user_id` - Owner of the listing
    /// * `title` - Listing headline (cannot be empty)
    /// * `description` - Free-form listing text
    /// * `kind` - Kind of property
    /// * `purpose` - Buy, rent or seasonal
    /// * `price` - Asking price (must be non-negative)
    /// * `bedrooms` / `bathrooms` - Room counts
    /// * `area` - Surface in square meters (must be positive)
    /// * `address` / `city` / `zip_code` / `country` - Postal location
    /// * `image_urls` - Gallery in display order
    /// * `whatsapp` - Contact number for the listing
    ///
    /// # Returns
    /// * `Ok(Property)` - New unsaved listing
    /// * `Err(String)` - If any invariant is violated
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: PropertyKind,
        purpose: Purpose,
        price: Decimal,
        bedrooms: u32,
        bathrooms: u32,
        area: f64,
        address: impl Into<String>,
        city: impl Into<String>,
        zip_code: impl Into<String>,
        country: impl Into<String>,
        image_urls: Vec<String>,
        whatsapp: PhoneNumber,
    ) -> Result<Self, String> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        if price < Decimal::ZERO {
            return Err("Price cannot be negative".to_string());
        }
        if !area.is_finite() || area <= 0.0 {
            return Err("Area must be positive".to_string());
        }

        Ok(Self {
            id: String::new(),
            user_id: user_id.into(),
            title,
            description: description.into(),
            kind,
            purpose,
            price,
            bedrooms,
            bathrooms,
            area,
            address: address.into(),
            city: city.into(),
            zip_code: zip_code.into(),
            country: country.into(),
            image_urls,
            coordinates: None,
            whatsapp,
            created_at: None,
            updated_at: None,
            is_favorite: false,
        })
    }

    /// Assigns the catalog id
    ///
    /// Ids are immutable: once a listing carries one, later calls are
    /// ignored.
    pub fn assign_id(&mut self, id: impl Into<String>) {
        if self.id.is_empty() {
            self.id = id.into();
        }
    }

    /// Records that the listing was written to the remote store
    ///
    /// Stamps `created_at` on the first persist only and refreshes
    /// `updated_at` on every persist.
    pub fn mark_persisted(&mut self, at: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(at);
        }
        self.updated_at = Some(at);
    }

    /// Attaches geocoded coordinates to the listing
    pub fn set_coordinates(&mut self, coordinates: Coordinates) {
        self.coordinates = Some(coordinates);
    }

    /// Applies the per-session favorite flag
    ///
    /// Derived from the favorites overlay; never written to the remote
    /// document.
    pub fn set_favorite(&mut self, is_favorite: bool) {
        self.is_favorite = is_favorite;
    }

    // ===== Getters =====

    /// Returns the catalog id, empty if the listing was never saved
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the owner's user id
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the listing headline
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the free-form listing text
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the kind of property
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Returns the listing purpose
    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// Returns the asking price
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the bedroom count
    pub fn bedrooms(&self) -> u32 {
        self.bedrooms
    }

    /// Returns the bathroom count
    pub fn bathrooms(&self) -> u32 {
        self.bathrooms
    }

    /// Returns the surface in square meters
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Returns the street address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the city
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the postal code
    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    /// Returns the country
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Returns the image gallery in display order
    pub fn image_urls(&self) -> &[String] {
        &self.image_urls
    }

    /// Returns the coordinates, None while the listing awaits geocoding
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    /// Returns the listing contact number
    pub fn whatsapp(&self) -> &PhoneNumber {
        &self.whatsapp
    }

    /// Returns the first persist timestamp
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the last persist timestamp
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the per-session favorite flag
    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    /// Reconstructs a Property from persistence layer data
    ///
    /// Bypasses business rule validation since the data was validated
    /// before it was stored. `is_favorite` always starts false; the
    /// overlay is applied by the cache.
    ///
    /// # Note
    /// Only to be used by the document codec for data reconstruction.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: String,
        user_id: String,
        title: String,
        description: String,
        kind: PropertyKind,
        purpose: Purpose,
        price: Decimal,
        bedrooms: u32,
        bathrooms: u32,
        area: f64,
        address: String,
        city: String,
        zip_code: String,
        country: String,
        image_urls: Vec<String>,
        coordinates: Option<Coordinates>,
        whatsapp: PhoneNumber,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            description,
            kind,
            purpose,
            price,
            bedrooms,
            bathrooms,
            area,
            address,
            city,
            zip_code,
            country,
            image_urls,
            coordinates,
            whatsapp,
            created_at,
            updated_at,
            is_favorite: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Property {
        Property::new(
            "user-1",
            "Sunny apartment",
            "Two rooms near the park",
            PropertyKind::Apartment,
            Purpose::Rent,
            Decimal::from(850),
            2,
            1,
            64.5,
            "12 Rue des Fleurs",
            "Casablanca",
            "20000",
            "Morocco",
            vec!["https://img.example.com/1.jpg".to_string()],
            PhoneNumber::new("+212661234567").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn create_property_with_valid_fields() {
        let property = sample();

        assert_eq!(property.id(), "");
        assert_eq!(property.title(), "Sunny apartment");
        assert_eq!(property.kind(), PropertyKind::Apartment);
        assert_eq!(property.purpose(), Purpose::Rent);
        assert!(property.coordinates().is_none());
        assert!(property.created_at().is_none());
        assert!(property.updated_at().is_none());
        assert!(!property.is_favorite());
    }

    #[test]
    fn create_property_with_empty_title_fails() {
        let result = Property::new(
            "user-1",
            "   ",
            "desc",
            PropertyKind::House,
            Purpose::Buy,
            Decimal::from(100),
            1,
            1,
            50.0,
            "a",
            "b",
            "c",
            "d",
            vec![],
            PhoneNumber::new("+212661234567").unwrap(),
        );

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Title cannot be empty"));
    }

    #[test]
    fn create_property_with_negative_price_fails() {
        let result = Property::new(
            "user-1",
            "Listing",
            "desc",
            PropertyKind::House,
            Purpose::Buy,
            Decimal::from(-1),
            1,
            1,
            50.0,
            "a",
            "b",
            "c",
            "d",
            vec![],
            PhoneNumber::new("+212661234567").unwrap(),
        );

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Price cannot be negative"));
    }

    #[test]
    fn create_property_with_zero_area_fails() {
        let result = Property::new(
            "user-1",
            "Listing",
            "desc",
            PropertyKind::Land,
            Purpose::Buy,
            Decimal::from(100),
            0,
            0,
            0.0,
            "a",
            "b",
            "c",
            "d",
            vec![],
            PhoneNumber::new("+212661234567").unwrap(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn assign_id_only_once() {
        let mut property = sample();

        property.assign_id("first");
        property.assign_id("second");

        assert_eq!(property.id(), "first");
    }

    #[test]
    fn mark_persisted_stamps_created_at_once() {
        let mut property = sample();

        let first = Utc::now();
        property.mark_persisted(first);
        assert_eq!(property.created_at(), Some(first));
        assert_eq!(property.updated_at(), Some(first));

        let second = first + chrono::Duration::seconds(10);
        property.mark_persisted(second);
        assert_eq!(property.created_at(), Some(first));
        assert_eq!(property.updated_at(), Some(second));
    }

    #[test]
    fn set_coordinates_transitions_from_absent() {
        let mut property = sample();
        assert!(property.coordinates().is_none());

        let coords = Coordinates::new(33.5731, -7.5898).unwrap();
        property.set_coordinates(coords);

        assert_eq!(property.coordinates(), Some(coords));
    }

    #[test]
    fn favorite_flag_round_trip() {
        let mut property = sample();

        property.set_favorite(true);
        assert!(property.is_favorite());

        property.set_favorite(false);
        assert!(!property.is_favorite());
    }

    #[test]
    fn from_persistence_starts_unfavorited() {
        let coords = Coordinates::new(33.5731, -7.5898).unwrap();
        let property = Property::from_persistence(
            "prop-1".to_string(),
            "user-1".to_string(),
            "Listing".to_string(),
            "desc".to_string(),
            PropertyKind::Villa,
            Purpose::Buy,
            Decimal::from(250_000),
            4,
            3,
            210.0,
            "1 Palm Street".to_string(),
            "Marrakesh".to_string(),
            "40000".to_string(),
            "Morocco".to_string(),
            vec![],
            Some(coords),
            PhoneNumber::new("+212661234567").unwrap(),
            Some(Utc::now()),
            Some(Utc::now()),
        );

        assert_eq!(property.id(), "prop-1");
        assert_eq!(property.coordinates(), Some(coords));
        assert!(!property.is_favorite());
    }
}

//! Conversion between domain types and stored field maps.
//!
//! All knowledge of document field names and remote encoding quirks
//! lives here. The one deliberate quirk: remote documents encode
//! "not yet geocoded" as the coordinate pair (0, 0), while the domain
//! uses `Option<Coordinates>`. The sentinel never leaves this module.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;

use crate::domain::favorite::Favorite;
use crate::domain::ports::document_store::Document;
use crate::domain::property::value_objects::{Coordinates, PhoneNumber, PropertyKind, Purpose};
use crate::domain::property::Property;

/// Encodes a property into its stored field map
///
/// `is_favorite` is session state and is never written. Absent
/// coordinates are written as the (0, 0) sentinel.
pub fn encode_property(property: &Property) -> Document {
    let mut doc = Document::new();
    doc.insert("id".to_string(), json!(property.id()));
    doc.insert("user_id".to_string(), json!(property.user_id()));
    doc.insert("title".to_string(), json!(property.title()));
    doc.insert("description".to_string(), json!(property.description()));
    doc.insert("kind".to_string(), json!(property.kind().to_string()));
    doc.insert("purpose".to_string(), json!(property.purpose().to_string()));
    doc.insert("price".to_string(), json!(property.price().to_string()));
    doc.insert("bedrooms".to_string(), json!(property.bedrooms()));
    doc.insert("bathrooms".to_string(), json!(property.bathrooms()));
    doc.insert("area".to_string(), json!(property.area()));
    doc.insert("address".to_string(), json!(property.address()));
    doc.insert("city".to_string(), json!(property.city()));
    doc.insert("zip_code".to_string(), json!(property.zip_code()));
    doc.insert("country".to_string(), json!(property.country()));
    doc.insert("image_urls".to_string(), json!(property.image_urls()));

    let (latitude, longitude) = match property.coordinates() {
        Some(coordinates) => (coordinates.latitude(), coordinates.longitude()),
        None => (0.0, 0.0),
    };
    doc.insert("latitude".to_string(), json!(latitude));
    doc.insert("longitude".to_string(), json!(longitude));

    doc.insert("whatsapp".to_string(), json!(property.whatsapp().as_str()));
    if let Some(created_at) = property.created_at() {
        doc.insert("created_at".to_string(), json!(created_at.to_rfc3339()));
    }
    if let Some(updated_at) = property.updated_at() {
        doc.insert("updated_at".to_string(), json!(updated_at.to_rfc3339()));
    }
    doc
}

/// Decodes a stored field map back into a property
///
/// The favorite flag starts false; the cache applies the overlay.
pub fn decode_property(doc: &Document) -> Result<Property, String> {
    let kind = PropertyKind::from_str(&require_str(doc, "kind")?)?;
    let purpose = Purpose::from_str(&require_str(doc, "purpose")?)?;
    let whatsapp = PhoneNumber::new(require_str(doc, "whatsapp")?)?;

    Ok(Property::from_persistence(
        require_str(doc, "id")?,
        require_str(doc, "user_id")?,
        require_str(doc, "title")?,
        optional_str(doc, "description").unwrap_or_default(),
        kind,
        purpose,
        decode_decimal(doc, "price")?,
        require_u32(doc, "bedrooms")?,
        require_u32(doc, "bathrooms")?,
        require_f64(doc, "area")?,
        require_str(doc, "address")?,
        require_str(doc, "city")?,
        require_str(doc, "zip_code")?,
        require_str(doc, "country")?,
        decode_string_list(doc, "image_urls")?,
        decode_coordinates(doc)?,
        whatsapp,
        optional_timestamp(doc, "created_at")?,
        optional_timestamp(doc, "updated_at")?,
    ))
}

/// Encodes a favorite snapshot into its stored field map
pub fn encode_favorite(favorite: &Favorite) -> Document {
    let mut doc = Document::new();
    doc.insert("id".to_string(), json!(favorite.property_id()));
    doc.insert("title".to_string(), json!(favorite.title()));
    doc.insert("price".to_string(), json!(favorite.price().to_string()));
    doc.insert("address".to_string(), json!(favorite.address()));
    doc.insert("city".to_string(), json!(favorite.city()));
    if let Some(thumbnail_url) = favorite.thumbnail_url() {
        doc.insert("thumbnail_url".to_string(), json!(thumbnail_url));
    }
    if let Some(added_at) = favorite.added_at() {
        doc.insert("added_at".to_string(), json!(added_at.to_rfc3339()));
    }
    doc
}

/// Decodes a stored favorite document
///
/// Only the id is essential. Snapshot fields default when absent so
/// favorites written by older clients still count toward the overlay.
pub fn decode_favorite(doc: &Document) -> Result<Favorite, String> {
    let price = if field(doc, "price").is_some() {
        decode_decimal(doc, "price")?
    } else {
        Decimal::ZERO
    };

    Ok(Favorite::from_persistence(
        require_str(doc, "id")?,
        optional_str(doc, "title").unwrap_or_default(),
        price,
        optional_str(doc, "address").unwrap_or_default(),
        optional_str(doc, "city").unwrap_or_default(),
        optional_str(doc, "thumbnail_url"),
        optional_timestamp(doc, "added_at")?,
    ))
}

/// Builds the partial update written by the bulk geocode repair
///
/// Touches only the geo fields and the update timestamp, leaving the
/// rest of the document to its owner.
pub fn encode_coordinate_update(coordinates: Coordinates, updated_at: DateTime<Utc>) -> Document {
    let mut doc = Document::new();
    doc.insert("latitude".to_string(), json!(coordinates.latitude()));
    doc.insert("longitude".to_string(), json!(coordinates.longitude()));
    doc.insert("updated_at".to_string(), json!(updated_at.to_rfc3339()));
    doc
}

/// Reads a field, treating JSON null the same as an absent key
fn field<'a>(doc: &'a Document, key: &str) -> Option<&'a Value> {
    match doc.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value),
    }
}

fn require_str(doc: &Document, key: &str) -> Result<String, String> {
    match field(doc, key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(format!("field {} has the wrong type", key)),
        None => Err(format!("missing field {}", key)),
    }
}

fn optional_str(doc: &Document, key: &str) -> Option<String> {
    field(doc, key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn require_f64(doc: &Document, key: &str) -> Result<f64, String> {
    field(doc, key)
        .and_then(Value::as_f64)
        .ok_or_else(|| format!("missing or non-numeric field {}", key))
}

fn require_u32(doc: &Document, key: &str) -> Result<u32, String> {
    let raw = field(doc, key)
        .and_then(Value::as_u64)
        .ok_or_else(|| format!("missing or non-numeric field {}", key))?;
    u32::try_from(raw).map_err(|_| format!("field {} out of range", key))
}

/// Prices are stored as decimal strings to keep exact amounts, but
/// plain JSON numbers from older documents are accepted
fn decode_decimal(doc: &Document, key: &str) -> Result<Decimal, String> {
    match field(doc, key) {
        Some(Value::String(raw)) => {
            Decimal::from_str(raw).map_err(|e| format!("invalid decimal in {}: {}", key, e))
        }
        Some(Value::Number(raw)) => raw
            .as_f64()
            .and_then(Decimal::from_f64)
            .ok_or_else(|| format!("invalid numeric value in {}", key)),
        Some(_) => Err(format!("field {} has the wrong type", key)),
        None => Err(format!("missing field {}", key)),
    }
}

fn decode_string_list(doc: &Document, key: &str) -> Result<Vec<String>, String> {
    match field(doc, key) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("field {} contains a non-string entry", key))
            })
            .collect(),
        Some(_) => Err(format!("field {} has the wrong type", key)),
    }
}

fn decode_coordinates(doc: &Document) -> Result<Option<Coordinates>, String> {
    match (field(doc, "latitude"), field(doc, "longitude")) {
        (None, None) => Ok(None),
        (Some(latitude), Some(longitude)) => {
            let latitude = latitude
                .as_f64()
                .ok_or_else(|| "field latitude has the wrong type".to_string())?;
            let longitude = longitude
                .as_f64()
                .ok_or_else(|| "field longitude has the wrong type".to_string())?;
            if latitude == 0.0 && longitude == 0.0 {
                return Ok(None);
            }
            Coordinates::new(latitude, longitude).map(Some)
        }
        _ => Err("latitude and longitude must appear together".to_string()),
    }
}

fn optional_timestamp(doc: &Document, key: &str) -> Result<Option<DateTime<Utc>>, String> {
    match field(doc, key) {
        None => Ok(None),
        Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
            .map(|parsed| Some(parsed.with_timezone(&Utc)))
            .map_err(|e| format!("invalid timestamp in {}: {}", key, e)),
        Some(_) => Err(format!("field {} has the wrong type", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved_property() -> Property {
        let mut property = Property::new(
            "user-1",
            "Sunny apartment",
            "Two rooms near the park",
            PropertyKind::Apartment,
            Purpose::Rent,
            Decimal::new(85_050, 2),
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
        .unwrap();
        property.assign_id("prop-1");
        property.mark_persisted(Utc::now());
        property
    }

    #[test]
    fn property_survives_encode_decode() {
        let mut original = saved_property();
        original.set_coordinates(Coordinates::new(33.5731, -7.5898).unwrap());

        let decoded = decode_property(&encode_property(&original)).unwrap();

        assert_eq!(decoded.id(), original.id());
        assert_eq!(decoded.user_id(), original.user_id());
        assert_eq!(decoded.title(), original.title());
        assert_eq!(decoded.description(), original.description());
        assert_eq!(decoded.kind(), original.kind());
        assert_eq!(decoded.purpose(), original.purpose());
        assert_eq!(decoded.price(), original.price());
        assert_eq!(decoded.bedrooms(), original.bedrooms());
        assert_eq!(decoded.bathrooms(), original.bathrooms());
        assert_eq!(decoded.area(), original.area());
        assert_eq!(decoded.address(), original.address());
        assert_eq!(decoded.city(), original.city());
        assert_eq!(decoded.zip_code(), original.zip_code());
        assert_eq!(decoded.country(), original.country());
        assert_eq!(decoded.image_urls(), original.image_urls());
        assert_eq!(decoded.coordinates(), original.coordinates());
        assert_eq!(decoded.whatsapp(), original.whatsapp());
        assert_eq!(decoded.created_at(), original.created_at());
        assert_eq!(decoded.updated_at(), original.updated_at());
    }

    #[test]
    fn absent_coordinates_encode_as_zero_sentinel() {
        let doc = encode_property(&saved_property());

        assert_eq!(doc.get("latitude"), Some(&json!(0.0)));
        assert_eq!(doc.get("longitude"), Some(&json!(0.0)));
    }

    #[test]
    fn zero_sentinel_decodes_to_none() {
        let doc = encode_property(&saved_property());

        let decoded = decode_property(&doc).unwrap();

        assert!(decoded.coordinates().is_none());
    }

    #[test]
    fn partial_coordinates_fail_to_decode() {
        let mut doc = encode_property(&saved_property());
        doc.remove("longitude");

        assert!(decode_property(&doc).is_err());
    }

    #[test]
    fn favorite_flag_is_never_stored() {
        let mut property = saved_property();
        property.set_favorite(true);

        let doc = encode_property(&property);

        assert!(!doc.contains_key("is_favorite"));
        assert!(!decode_property(&doc).unwrap().is_favorite());
    }

    #[test]
    fn price_decodes_from_plain_number() {
        let mut doc = encode_property(&saved_property());
        doc.insert("price".to_string(), json!(1250.5));

        let decoded = decode_property(&doc).unwrap();

        assert_eq!(decoded.price(), Decimal::new(12_505, 1));
    }

    #[test]
    fn missing_title_fails_to_decode() {
        let mut doc = encode_property(&saved_property());
        doc.remove("title");

        let error = decode_property(&doc).unwrap_err();
        assert!(error.contains("title"));
    }

    #[test]
    fn invalid_phone_fails_to_decode() {
        let mut doc = encode_property(&saved_property());
        doc.insert("whatsapp".to_string(), json!("not-a-number"));

        assert!(decode_property(&doc).is_err());
    }

    #[test]
    fn null_fields_are_treated_as_absent() {
        let mut doc = encode_property(&saved_property());
        doc.insert("description".to_string(), Value::Null);
        doc.insert("created_at".to_string(), Value::Null);

        let decoded = decode_property(&doc).unwrap();

        assert_eq!(decoded.description(), "");
        assert!(decoded.created_at().is_none());
    }

    #[test]
    fn favorite_survives_encode_decode() {
        let favorite = Favorite::from_persistence(
            "prop-1".to_string(),
            "Sunny apartment".to_string(),
            Decimal::new(85_050, 2),
            "12 Rue des Fleurs".to_string(),
            "Casablanca".to_string(),
            Some("https://img.example.com/1.jpg".to_string()),
            Some(Utc::now()),
        );

        let decoded = decode_favorite(&encode_favorite(&favorite)).unwrap();

        assert_eq!(decoded.property_id(), favorite.property_id());
        assert_eq!(decoded.title(), favorite.title());
        assert_eq!(decoded.price(), favorite.price());
        assert_eq!(decoded.thumbnail_url(), favorite.thumbnail_url());
        assert_eq!(decoded.added_at(), favorite.added_at());
    }

    #[test]
    fn favorite_with_only_an_id_still_decodes() {
        let mut doc = Document::new();
        doc.insert("id".to_string(), json!("prop-9"));

        let decoded = decode_favorite(&doc).unwrap();

        assert_eq!(decoded.property_id(), "prop-9");
        assert_eq!(decoded.price(), Decimal::ZERO);
        assert!(decoded.thumbnail_url().is_none());
    }

    #[test]
    fn favorite_without_an_id_fails_to_decode() {
        let mut doc = Document::new();
        doc.insert("title".to_string(), json!("orphan"));

        assert!(decode_favorite(&doc).is_err());
    }

    #[test]
    fn coordinate_update_touches_only_geo_fields() {
        let coordinates = Coordinates::new(31.6295, -7.9811).unwrap();
        let doc = encode_coordinate_update(coordinates, Utc::now());

        assert_eq!(doc.len(), 3);
        assert!(doc.contains_key("latitude"));
        assert!(doc.contains_key("longitude"));
        assert!(doc.contains_key("updated_at"));
    }
}

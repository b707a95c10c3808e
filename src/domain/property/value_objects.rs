use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of property offered in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    House,
    Apartment,
    Villa,
    Land,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::House => write!(f, "house"),
            PropertyKind::Apartment => write!(f, "apartment"),
            PropertyKind::Villa => write!(f, "villa"),
            PropertyKind::Land => write!(f, "land"),
        }
    }
}

impl FromStr for PropertyKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "house" => Ok(PropertyKind::House),
            "apartment" => Ok(PropertyKind::Apartment),
            "villa" => Ok(PropertyKind::Villa),
            "land" => Ok(PropertyKind::Land),
            other => Err(format!("Unknown property kind: {}", other)),
        }
    }
}

/// Listing purpose: what the owner wants out of the property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    Buy,
    Rent,
    Seasonal,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::Buy => write!(f, "buy"),
            Purpose::Rent => write!(f, "rent"),
            Purpose::Seasonal => write!(f, "seasonal"),
        }
    }
}

impl FromStr for Purpose {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Purpose::Buy),
            "rent" => Ok(Purpose::Rent),
            "seasonal" => Ok(Purpose::Seasonal),
            other => Err(format!("Unknown purpose: {}", other)),
        }
    }
}

/// Lifecycle status of a property transaction
///
/// The payment flow itself lives outside this crate; only the status
/// vocabulary is shared so transaction records can be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Transaction created, payment not yet settled
    Pending,
    /// Payment settled successfully
    Completed,
    /// Transaction abandoned or rejected
    Cancelled,
}

impl TransactionStatus {
    /// Returns true when the transaction can no longer change state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Completed | TransactionStatus::Cancelled
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            other => Err(format!("Unknown transaction status: {}", other)),
        }
    }
}

/// Geographic coordinates value object
///
/// # Invariants
/// - Latitude within [-90, 90], longitude within [-180, 180]
/// - The pair (0, 0) is rejected: remote documents use it as the
///   "not yet geocoded" sentinel, so it never appears as a real location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Creates a validated coordinate pair
    ///
    /// # Arguments
    /// * `latitude` - Degrees north, [-90, 90]
    /// * `longitude` - Degrees east, [-180, 180]
    ///
    /// # Returns
    /// * `Ok(Coordinates)` - If the pair is a real location
    /// * `Err(String)` - If out of range or the (0, 0) sentinel
    ///
    /// # Example
    /// ```
    /// use immo_catalog::domain::property::value_objects::Coordinates;
    ///
    /// let coords = Coordinates::new(48.8566, 2.3522).expect("valid coordinates");
    /// assert_eq!(coords.latitude(), 48.8566);
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("Latitude out of range: {}", latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("Longitude out of range: {}", longitude));
        }
        if latitude == 0.0 && longitude == 0.0 {
            return Err("Coordinates (0, 0) are reserved for missing locations".to_string());
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Returns the latitude in degrees north
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in degrees east
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Phone number value object for the listing contact
///
/// # Invariants
/// - Optional leading '+'
/// - 6 to 15 digits; spaces, dashes, dots and parentheses are tolerated
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a new PhoneNumber value object
    ///
    /// # Arguments
    /// * `number` - The phone number string to validate
    ///
    /// # Returns
    /// * `Ok(PhoneNumber)` - If the number has a valid shape
    /// * `Err(String)` - If the number is malformed
    ///
    /// # Example
    /// ```
    /// use immo_catalog::domain::property::value_objects::PhoneNumber;
    ///
    /// let phone = PhoneNumber::new("+212 661-234567").expect("valid phone");
    /// assert_eq!(phone.as_str(), "+212 661-234567");
    /// ```
    pub fn new(number: impl Into<String>) -> Result<Self, String> {
        let number = number.into();
        if Self::is_valid(&number) {
            Ok(PhoneNumber(number))
        } else {
            Err(format!("Invalid phone number: {}", number))
        }
    }

    /// Validates a phone number string
    fn is_valid(number: &str) -> bool {
        let trimmed = number.trim();
        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let mut digits = 0usize;
        for c in rest.chars() {
            match c {
                '0'..='9' => digits += 1,
                ' ' | '-' | '.' | '(' | ')' => {}
                _ => return false,
            }
        }
        (6..=15).contains(&digits)
    }

    /// Returns the phone number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_kind_round_trip() {
        for kind in [
            PropertyKind::House,
            PropertyKind::Apartment,
            PropertyKind::Villa,
            PropertyKind::Land,
        ] {
            let parsed: PropertyKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn property_kind_parse_is_case_insensitive() {
        assert_eq!("Villa".parse::<PropertyKind>().unwrap(), PropertyKind::Villa);
    }

    #[test]
    fn property_kind_parse_unknown_fails() {
        assert!("castle".parse::<PropertyKind>().is_err());
    }

    #[test]
    fn purpose_round_trip() {
        for purpose in [Purpose::Buy, Purpose::Rent, Purpose::Seasonal] {
            let parsed: Purpose = purpose.to_string().parse().unwrap();
            assert_eq!(parsed, purpose);
        }
    }

    #[test]
    fn transaction_status_display() {
        assert_eq!(TransactionStatus::Pending.to_string(), "pending");
        assert_eq!(TransactionStatus::Completed.to_string(), "completed");
        assert_eq!(TransactionStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn transaction_status_terminal_states() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(TransactionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn valid_coordinates() {
        let coords = Coordinates::new(33.5731, -7.5898).unwrap();
        assert_eq!(coords.latitude(), 33.5731);
        assert_eq!(coords.longitude(), -7.5898);
    }

    #[test]
    fn coordinates_reject_null_island() {
        assert!(Coordinates::new(0.0, 0.0).is_err());
    }

    #[test]
    fn coordinates_zero_latitude_alone_is_valid() {
        assert!(Coordinates::new(0.0, 6.6).is_ok());
    }

    #[test]
    fn coordinates_reject_latitude_out_of_range() {
        assert!(Coordinates::new(90.01, 0.0).is_err());
        assert!(Coordinates::new(-91.0, 0.0).is_err());
    }

    #[test]
    fn coordinates_reject_longitude_out_of_range() {
        assert!(Coordinates::new(0.0, 180.5).is_err());
        assert!(Coordinates::new(0.0, -181.0).is_err());
    }

    #[test]
    fn coordinates_reject_non_finite() {
        assert!(Coordinates::new(f64::NAN, 2.0).is_err());
        assert!(Coordinates::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn valid_phone_number() {
        assert!(PhoneNumber::new("+212661234567").is_ok());
    }

    #[test]
    fn valid_phone_number_with_separators() {
        assert!(PhoneNumber::new("+1 (555) 123-4567").is_ok());
        assert!(PhoneNumber::new("06.61.23.45.67").is_ok());
    }

    #[test]
    fn invalid_phone_number_too_short() {
        assert!(PhoneNumber::new("12345").is_err());
    }

    #[test]
    fn invalid_phone_number_too_long() {
        assert!(PhoneNumber::new("1234567890123456").is_err());
    }

    #[test]
    fn invalid_phone_number_with_letters() {
        assert!(PhoneNumber::new("call-me-maybe").is_err());
    }

    #[test]
    fn invalid_phone_number_plus_inside() {
        assert!(PhoneNumber::new("123+456789").is_err());
    }

    #[test]
    fn phone_number_display() {
        let phone = PhoneNumber::new("+212661234567").unwrap();
        assert_eq!(format!("{}", phone), "+212661234567");
    }
}

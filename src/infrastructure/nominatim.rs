//! HTTP geocoder against a Nominatim-compatible search endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::ports::geocoder::{GeocodeError, Geocoder};
use crate::domain::property::value_objects::Coordinates;

const DEFAULT_LIMIT: usize = 5;

/// Geocoder adapter for the Nominatim search API
///
/// Works against the public `nominatim.openstreetmap.org` instance or
/// any self-hosted deployment. The public instance requires a
/// descriptive User-Agent, which is why one is mandatory here.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
}

/// One search hit; Nominatim serializes coordinates as strings
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    /// Creates a geocoder against a Nominatim-compatible base URL
    ///
    /// # Arguments
    /// * `base_url` - Instance root, e.g. `https://nominatim.openstreetmap.org`
    /// * `user_agent` - Identifies this client to the service
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {}", e))?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limit: DEFAULT_LIMIT,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<Coordinates>, GeocodeError> {
        let limit = self.limit.to_string();
        debug!(query, "sending geocode request");

        let response = self
            .client
            .get(self.search_url())
            .query(&[("q", query), ("format", "json"), ("limit", &limit)])
            .send()
            .await
            .map_err(|e| GeocodeError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Unavailable(format!(
                "geocoder returned {}",
                response.status()
            )));
        }

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Unavailable(e.to_string()))?;

        let mut candidates = Vec::with_capacity(hits.len());
        for hit in &hits {
            match parse_hit(hit) {
                Some(coordinates) => candidates.push(coordinates),
                None => {
                    warn!(lat = %hit.lat, lon = %hit.lon, "discarding unparseable geocoder hit")
                }
            }
        }

        if candidates.is_empty() {
            return Err(GeocodeError::NoMatches {
                query: query.to_string(),
            });
        }
        Ok(candidates)
    }
}

fn parse_hit(hit: &SearchHit) -> Option<Coordinates> {
    let latitude: f64 = hit.lat.parse().ok()?;
    let longitude: f64 = hit.lon.parse().ok()?;
    Coordinates::new(latitude, longitude).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_strips_trailing_slash() {
        let geocoder =
            NominatimGeocoder::new("https://nominatim.example.org/", "immo-catalog-tests")
                .unwrap();
        assert_eq!(geocoder.search_url(), "https://nominatim.example.org/search");
    }

    #[test]
    fn parse_hit_reads_string_coordinates() {
        let hit = SearchHit {
            lat: "33.5731104".to_string(),
            lon: "-7.5898434".to_string(),
        };

        let coordinates = parse_hit(&hit).unwrap();
        assert_eq!(coordinates.latitude(), 33.5731104);
        assert_eq!(coordinates.longitude(), -7.5898434);
    }

    #[test]
    fn parse_hit_rejects_garbage() {
        let hit = SearchHit {
            lat: "not-a-number".to_string(),
            lon: "-7.58".to_string(),
        };

        assert!(parse_hit(&hit).is_none());
    }

    #[test]
    fn parse_hit_rejects_null_island() {
        let hit = SearchHit {
            lat: "0.0".to_string(),
            lon: "0.0".to_string(),
        };

        assert!(parse_hit(&hit).is_none());
    }
}

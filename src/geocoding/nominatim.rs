use crate::{
    core::{config::GeocoderConfig, geo::LatLng},
    geocoding::Geocode,
    Result,
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use serde::Deserialize;

/// One entry of a Nominatim search response; coordinates arrive as strings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl SearchHit {
    /// Parses the textual coordinates, `None` if either is not a finite number
    pub fn lat_lng(&self) -> Option<LatLng> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lng = self.lon.trim().parse::<f64>().ok()?;
        (lat.is_finite() && lng.is_finite()).then(|| LatLng::new(lat, lng))
    }
}

/// Interprets a search response body: the first hit of a JSON array wins
pub fn parse_search_response(body: &[u8]) -> Option<LatLng> {
    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("geocode response is not JSON: {}", e);
            return None;
        }
    };

    let Some(results) = value.as_array() else {
        log::debug!("geocode response is not a list");
        return None;
    };
    let Some(first) = results.first() else {
        log::debug!("geocode response has no results");
        return None;
    };

    match SearchHit::deserialize(first) {
        Ok(hit) => {
            let location = hit.lat_lng();
            if location.is_none() {
                log::debug!("geocode hit has unparseable coordinates: {:?}", hit);
            }
            location
        }
        Err(e) => {
            log::debug!("geocode hit is malformed: {}", e);
            None
        }
    }
}

/// Geocoder backed by the Nominatim search API
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl NominatimGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Uses a caller-provided client, e.g. one shared with other requests
    pub fn with_client(client: reqwest::Client, config: GeocoderConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Geocode for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Option<LatLng> {
        if query.is_empty() {
            log::debug!("empty geocode query, skipping lookup");
            return None;
        }

        let limit = self.config.limit.to_string();
        let request = self
            .client
            .get(&self.config.endpoint)
            .query(&[("format", "json"), ("q", query), ("limit", limit.as_str())])
            .header(ACCEPT_LANGUAGE, self.config.accept_language.as_str())
            .header(USER_AGENT, self.config.user_agent.as_str());

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("geocode request for '{}' failed: {}", query, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::warn!("geocode request for '{}' returned {}", query, status);
            return None;
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("reading geocode response for '{}' failed: {}", query, e);
                return None;
            }
        };

        let location = parse_search_response(&body);
        match location {
            Some(found) => log::info!(
                "geocoded '{}' to ({:.6}, {:.6})",
                query,
                found.lat,
                found.lng
            ),
            None => log::info!("no location found for '{}'", query),
        }
        location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hit_is_used() {
        let body = br#"[
            {"lat": "35.6585805", "lon": "139.7454329", "display_name": "Tokyo Tower"},
            {"lat": "0", "lon": "0"}
        ]"#;
        assert_eq!(
            parse_search_response(body),
            Some(LatLng::new(35.6585805, 139.7454329))
        );
    }

    #[test]
    fn test_empty_list_is_absent() {
        assert_eq!(parse_search_response(b"[]"), None);
    }

    #[test]
    fn test_non_list_is_absent() {
        assert_eq!(parse_search_response(br#"{"lat": "1", "lon": "2"}"#), None);
        assert_eq!(parse_search_response(b"\"oops\""), None);
        assert_eq!(parse_search_response(b"<html>rate limited</html>"), None);
    }

    #[test]
    fn test_malformed_hit_is_absent() {
        assert_eq!(parse_search_response(br#"[{"lat": "35.0"}]"#), None);
        assert_eq!(parse_search_response(br#"[{"lat": "north", "lon": "139"}]"#), None);
        assert_eq!(parse_search_response(br#"[{"lat": 35.0, "lon": 139.0}]"#), None);
    }

    #[test]
    fn test_hit_coordinates_are_trimmed() {
        let hit = SearchHit {
            lat: " -33.8688 ".to_string(),
            lon: "151.2093".to_string(),
            display_name: None,
        };
        assert_eq!(hit.lat_lng(), Some(LatLng::new(-33.8688, 151.2093)));
    }

    #[tokio::test]
    async fn test_empty_query_skips_request() {
        let geocoder = NominatimGeocoder::new(
            GeocoderConfig::default().with_endpoint("http://127.0.0.1:9/search"),
        )
        .unwrap();
        assert_eq!(geocoder.geocode("").await, None);
    }
}

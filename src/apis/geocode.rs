use crate::config;
use crate::constants::GEOCODER_BASE_URL;
use crate::types::{GeoPoint, Geocoder};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Nominatim-style geocoding client: one location string in, optional
/// coordinate out. Every failure mode (network error, quota exhaustion,
/// empty result set) yields an unresolved lookup, never an error — the
/// enricher has no retry policy and individual misses are expected.
pub struct GeocodeClient {
    client: reqwest::Client,
    base_url: String,
    email: Option<String>,
}

impl GeocodeClient {
    pub fn new(timeout_seconds: u64) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("datalens/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: config::geocoder_url().unwrap_or_else(|| GEOCODER_BASE_URL.to_string()),
            email: config::geocoder_email(),
        })
    }
}

#[async_trait::async_trait]
impl Geocoder for GeocodeClient {
    async fn resolve(&self, location: &str) -> Option<GeoPoint> {
        let mut request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("format", "json"), ("limit", "1"), ("q", location)]);
        if let Some(email) = &self.email {
            request = request.query(&[("email", email.as_str())]);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Geocode request failed for '{}': {}", location, e);
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(
                "Geocoder returned HTTP {} for '{}'",
                response.status().as_u16(),
                location
            );
            return None;
        }

        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!("Geocode response for '{}' was not JSON: {}", location, e);
                return None;
            }
        };

        let point = parse_first_result(&body);
        if point.is_none() {
            debug!("No geocode result for '{}'", location);
        }
        point
    }
}

/// Extract `(lon, lat)` from the first element of a search result array.
/// The public endpoint returns coordinates as strings; accept plain
/// numbers as well for self-hosted variants.
pub fn parse_first_result(body: &Value) -> Option<GeoPoint> {
    let first = body.as_array()?.first()?;
    let longitude = coordinate(&first["lon"])?;
    let latitude = coordinate(&first["lat"])?;
    Some(GeoPoint {
        longitude,
        latitude,
    })
}

fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_string_coordinates() {
        let body = json!([{"lon": "-122.3300624", "lat": "47.6038321", "display_name": "Seattle"}]);
        let point = parse_first_result(&body).unwrap();
        assert!((point.longitude - -122.3300624).abs() < 1e-9);
        assert!((point.latitude - 47.6038321).abs() < 1e-9);
    }

    #[test]
    fn parses_numeric_coordinates() {
        let body = json!([{"lon": -0.1276, "lat": 51.5072}]);
        assert!(parse_first_result(&body).is_some());
    }

    #[test]
    fn empty_result_set_is_unresolved() {
        assert!(parse_first_result(&json!([])).is_none());
    }

    #[test]
    fn error_object_is_unresolved() {
        assert!(parse_first_result(&json!({"error": "quota exceeded"})).is_none());
    }
}

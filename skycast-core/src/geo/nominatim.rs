//! Reverse geocoding via Nominatim (OpenStreetMap). Free, no API key, but a
//! User-Agent is mandatory.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{geo::UNKNOWN_LOCATION, model::Coordinates};

use super::ReverseGeocoder;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create geocoding HTTP client")?;

        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

impl NominatimAddress {
    /// city > town > village, ignoring blank fields.
    fn place_name(self) -> String {
        [self.city, self.town, self.village]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn city_for(&self, coords: Coordinates) -> Result<String> {
        let url = format!("{}/reverse", self.base_url);
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[("lat", lat.as_str()), ("lon", lon.as_str()), ("format", "json")])
            .send()
            .await
            .context("Failed to send reverse geocoding request")?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("Nominatim reverse request failed with status {status}"));
        }

        let body: NominatimResponse =
            res.json().await.context("Failed to parse Nominatim reverse JSON")?;

        let address = body
            .address
            .ok_or_else(|| anyhow!("Nominatim returned no address for {coords}"))?;

        Ok(address.place_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TBILISI: Coordinates = Coordinates { latitude: 41.7151, longitude: 44.8271 };

    async fn geocode_with(body: serde_json::Value) -> Result<String> {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("format", "json"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::with_base_url(&server.uri()).expect("client");
        geocoder.city_for(TBILISI).await
    }

    #[tokio::test]
    async fn prefers_city() {
        let city = geocode_with(serde_json::json!({
            "address": { "city": "Tbilisi", "town": "Ignored", "country": "Georgia" }
        }))
        .await
        .expect("geocode should succeed");
        assert_eq!(city, "Tbilisi");
    }

    #[tokio::test]
    async fn falls_back_to_town_then_village() {
        let town = geocode_with(serde_json::json!({
            "address": { "town": "Mtskheta", "village": "Ignored" }
        }))
        .await
        .expect("geocode should succeed");
        assert_eq!(town, "Mtskheta");

        let village = geocode_with(serde_json::json!({
            "address": { "city": "", "village": "Sno" }
        }))
        .await
        .expect("geocode should succeed");
        assert_eq!(village, "Sno");
    }

    #[tokio::test]
    async fn unnamed_place_is_unknown_location() {
        let city = geocode_with(serde_json::json!({
            "address": { "country": "Georgia" }
        }))
        .await
        .expect("unknown location is not a failure");
        assert_eq!(city, UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn missing_address_is_an_error() {
        let err = geocode_with(serde_json::json!({ "error": "Unable to geocode" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no address"));
    }

    #[tokio::test]
    async fn http_failure_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::with_base_url(&server.uri()).expect("client");
        let err = geocoder.city_for(TBILISI).await.unwrap_err();
        assert!(err.to_string().contains("status 503"));
    }
}

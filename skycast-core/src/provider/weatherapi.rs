use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::model::{Condition, CurrentConditions, ForecastDay, LocationInfo, WeatherSnapshot};

use super::WeatherProvider;

/// Days requested from `forecast.json`: today plus the cards after it.
const FORECAST_DAYS: &str = "3";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        label: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        tracing::debug!("GET {url} ({label})");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to WeatherAPI.com ({label})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read WeatherAPI {label} response body"))?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "WeatherAPI {label} request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse WeatherAPI {label} JSON"))
    }

    async fn fetch_current(&self, city: &str) -> Result<WaCurrentResponse> {
        self.get_json("current.json", "current", &[("q", city)]).await
    }

    async fn fetch_forecast(&self, city: &str) -> Result<WaForecastResponse> {
        self.get_json("forecast.json", "forecast", &[("q", city), ("days", FORECAST_DAYS)])
            .await
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    #[serde(default)]
    icon: String,
}

impl From<WaCondition> for Condition {
    fn from(c: WaCondition) -> Self {
        Condition { text: c.text, icon: c.icon }
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
    #[serde(default)]
    uv: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaCurrentResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    avgtemp_c: f64,
    avghumidity: f64,
    maxwind_kph: f64,
    #[serde(default)]
    uv: f64,
    #[serde(default)]
    daily_chance_of_rain: u8,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    forecast: WaForecast,
}

/// Location and current conditions come from `current.json`, days from
/// `forecast.json`.
fn merge(current: WaCurrentResponse, forecast: WaForecastResponse) -> WeatherSnapshot {
    let WaCurrentResponse { location, current } = current;

    WeatherSnapshot {
        current: CurrentConditions {
            temp_c: current.temp_c,
            humidity: current.humidity,
            wind_kph: current.wind_kph,
            uv: current.uv,
            condition: current.condition.into(),
        },
        location: LocationInfo {
            name: location.name,
            region: location.region,
            country: location.country,
            localtime: location.localtime,
        },
        forecast: forecast
            .forecast
            .forecastday
            .into_iter()
            .map(|fd| ForecastDay {
                date: fd.date,
                avgtemp_c: fd.day.avgtemp_c,
                avghumidity: fd.day.avghumidity,
                maxwind_kph: fd.day.maxwind_kph,
                uv: fd.day.uv,
                daily_chance_of_rain: fd.day.daily_chance_of_rain,
                condition: fd.day.condition.into(),
            })
            .collect(),
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch(&self, city: &str) -> Result<WeatherSnapshot> {
        let (current, forecast) =
            tokio::try_join!(self.fetch_current(city), self.fetch_forecast(city))?;

        Ok(merge(current, forecast))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

//! Position sources standing in for a device location service.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{error::LocateError, model::Coordinates};

use super::PositionSource;

const IP_API_URL: &str = "http://ip-api.com/json";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Coordinates given up front (config file or command line).
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition {
    coords: Coordinates,
}

impl FixedPosition {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, LocateError> {
        Ok(self.coords)
    }
}

/// No location capability at all.
#[derive(Debug, Clone, Copy)]
pub struct NoPosition;

#[async_trait]
impl PositionSource for NoPosition {
    async fn current_position(&self) -> Result<Coordinates, LocateError> {
        Err(LocateError::Unsupported)
    }
}

/// Approximate position of the public IP address, via ip-api.com.
#[derive(Debug, Clone)]
pub struct IpPosition {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpPosition {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_url(IP_API_URL)
    }

    pub fn with_url(url: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create position HTTP client")?;

        Ok(Self { url: url.to_string(), http })
    }
}

#[async_trait]
impl PositionSource for IpPosition {
    async fn current_position(&self) -> Result<Coordinates, LocateError> {
        let res = self.http.get(&self.url).send().await.map_err(|e| {
            tracing::debug!("IP position request failed: {e}");
            LocateError::Unavailable("position service unreachable".to_string())
        })?;

        if matches!(res.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(LocateError::PermissionDenied);
        }
        if !res.status().is_success() {
            return Err(LocateError::Unavailable(format!(
                "position service returned status {}",
                res.status()
            )));
        }

        let body: IpApiResponse = res.json().await.map_err(|e| {
            tracing::debug!("IP position parse error: {e}");
            LocateError::Unavailable("unexpected position service response".to_string())
        })?;

        match body {
            IpApiResponse { status, lat: Some(latitude), lon: Some(longitude), .. }
                if status == "success" =>
            {
                Ok(Coordinates { latitude, longitude })
            }
            IpApiResponse { message, .. } => Err(LocateError::Unavailable(
                message.unwrap_or_else(|| "position unknown".to_string()),
            )),
        }
    }
}

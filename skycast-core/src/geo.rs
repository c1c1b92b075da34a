//! Turning "where am I" into a city name: a position source yields
//! coordinates, a reverse geocoder names them.

use crate::{
    Config,
    config::PositionSourceKind,
    error::LocateError,
    geo::{
        nominatim::NominatimGeocoder,
        position::{FixedPosition, IpPosition, NoPosition},
    },
    model::Coordinates,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod nominatim;
pub mod position;

/// Placeholder city when the geocoder knows the spot but not its name.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// One-shot device position.
#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocateError>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync + Debug {
    /// City name for a coordinate pair, falling back to [`UNKNOWN_LOCATION`].
    async fn city_for(&self, coords: Coordinates) -> anyhow::Result<String>;
}

/// Position, then city name.
pub async fn resolve_city(
    position: &dyn PositionSource,
    geocoder: &dyn ReverseGeocoder,
) -> Result<String, LocateError> {
    let coords = position.current_position().await?;
    tracing::debug!("Position resolved to {coords}");

    let city = geocoder.city_for(coords).await.map_err(|err| {
        tracing::warn!("Reverse geocoding {coords} failed: {err:#}");
        LocateError::Geocode(err.to_string())
    })?;

    tracing::info!("Location resolved to {city}");
    Ok(city)
}

/// Build the position source. `override_coords` (e.g. from the command line)
/// beats whatever the config says.
pub fn position_source_from_config(
    config: &Config,
    override_coords: Option<Coordinates>,
) -> anyhow::Result<Arc<dyn PositionSource>> {
    if let Some(coords) = override_coords {
        return Ok(Arc::new(FixedPosition::new(coords)));
    }

    let source: Arc<dyn PositionSource> = match config.location.source {
        PositionSourceKind::Ip => Arc::new(IpPosition::new()?),
        PositionSourceKind::Fixed => {
            let coords = config.fixed_coordinates().ok_or_else(|| {
                anyhow::anyhow!(
                    "Location source 'fixed' needs both latitude and longitude in the config file."
                )
            })?;
            Arc::new(FixedPosition::new(coords))
        }
        PositionSourceKind::None => Arc::new(NoPosition),
    };

    Ok(source)
}

pub fn geocoder_from_config(config: &Config) -> anyhow::Result<Arc<dyn ReverseGeocoder>> {
    Ok(Arc::new(NominatimGeocoder::with_base_url(config.geocoding_base_url())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct StubGeocoder(Option<&'static str>);

    #[async_trait]
    impl ReverseGeocoder for StubGeocoder {
        async fn city_for(&self, _coords: Coordinates) -> anyhow::Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("Nominatim reverse request failed with status 503"))
        }
    }

    const STUTTGART: Coordinates = Coordinates { latitude: 48.7758, longitude: 9.1829 };

    #[tokio::test]
    async fn resolve_city_chains_position_and_geocoder() {
        let city = resolve_city(&FixedPosition::new(STUTTGART), &StubGeocoder(Some("Stuttgart")))
            .await
            .expect("resolution should succeed");
        assert_eq!(city, "Stuttgart");
    }

    #[tokio::test]
    async fn missing_capability_is_reported() {
        let err = resolve_city(&NoPosition, &StubGeocoder(Some("Stuttgart"))).await.unwrap_err();
        assert_eq!(err, LocateError::Unsupported);
    }

    #[tokio::test]
    async fn geocoder_failure_is_a_locate_error() {
        let err = resolve_city(&FixedPosition::new(STUTTGART), &StubGeocoder(None))
            .await
            .unwrap_err();
        assert!(matches!(err, LocateError::Geocode(msg) if msg.contains("503")));
    }

    #[test]
    fn fixed_source_requires_coordinates() {
        let mut cfg = Config::default();
        cfg.location.source = PositionSourceKind::Fixed;

        let err = position_source_from_config(&cfg, None).unwrap_err();
        assert!(err.to_string().contains("needs both latitude and longitude"));
    }

    #[test]
    fn override_beats_config() {
        let mut cfg = Config::default();
        cfg.location.source = PositionSourceKind::Fixed;

        assert!(position_source_from_config(&cfg, Some(STUTTGART)).is_ok());
    }
}

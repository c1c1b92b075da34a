use crate::{Config, model::WeatherSnapshot, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod weatherapi;

/// Source of weather snapshots.
///
/// Every call goes to the network; implementations must not cache.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions and forecast for a free-text location.
    ///
    /// Either both halves arrive or the call fails.
    async fn fetch(&self, city: &str) -> anyhow::Result<WeatherSnapshot>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No weather API key configured.\n\
                 Hint: run `skycast configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    Ok(Arc::new(WeatherApiProvider::with_base_url(api_key, config.weather_base_url())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        if std::env::var(crate::config::API_KEY_ENV).is_ok() {
            return;
        }

        let err = provider_from_config(&cfg).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No weather API key configured"));
        assert!(msg.contains("Hint: run `skycast configure`"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}

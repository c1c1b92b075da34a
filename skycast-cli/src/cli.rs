use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use skycast_core::{
    Config, Coordinates, Session,
    config::PositionSourceKind,
    geo::{geocoder_from_config, position_source_from_config},
    provider_from_config,
};

use crate::{interactive, prompt::blocking_prompt, render::render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// Latitude used by "Get location" instead of the configured source.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude used by "Get location" instead of the configured source.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weather API key and pick a location source.
    Configure,

    /// Look up one city and print the dashboard.
    Show {
        /// City or free-text location.
        city: String,
    },

    /// Interactive dashboard (default).
    Run,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let override_coords = match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        };

        match self.command.unwrap_or(Command::Run) {
            Command::Configure => configure().await,
            Command::Show { city } => {
                let mut session = build_session(override_coords)?;
                session.submit(city);
                session.settle().await;
                print!("{}", render(session.state(), Local::now().naive_local()));
                Ok(())
            }
            Command::Run => {
                let session = build_session(override_coords)?;
                interactive::run(session).await
            }
        }
    }
}

fn build_session(override_coords: Option<Coordinates>) -> anyhow::Result<Session> {
    let config = Config::load()?;

    let provider = provider_from_config(&config)?;
    let position = position_source_from_config(&config, override_coords)?;
    let geocoder = geocoder_from_config(&config)?;

    Ok(Session::new(provider, position, geocoder))
}

async fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let current_key = config.weather.api_key.clone().unwrap_or_default();
    let api_key = blocking_prompt(move || {
        Text::new("weatherapi.com API key:").with_initial_value(&current_key).prompt()
    })
    .await?;
    config.set_api_key(api_key.trim().to_string());

    let source = blocking_prompt(|| {
        Select::new("Location source for \"Get location\":", PositionSourceKind::all().to_vec())
            .prompt()
    })
    .await?;
    config.location.source = source;

    if source == PositionSourceKind::Fixed {
        let latitude = prompt_coordinate("Latitude:").await?;
        let longitude = prompt_coordinate("Longitude:").await?;
        config.location.latitude = Some(latitude);
        config.location.longitude = Some(longitude);
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn prompt_coordinate(message: &'static str) -> anyhow::Result<f64> {
    let raw = blocking_prompt(move || Text::new(message).prompt()).await?;
    raw.trim().parse().with_context(|| format!("'{raw}' is not a valid coordinate"))
}

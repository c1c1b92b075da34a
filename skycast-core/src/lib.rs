//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its weatherapi.com implementation
//! - Background-video and livestream lookup tables
//! - Position sources and reverse geocoding for "Get location"
//! - The dashboard state machine and the session that drives it
//!
//! It is used by `skycast-cli`, but a different front end only needs
//! [`Session`] and a renderer of its [`DashboardState`].

pub mod assets;
pub mod config;
pub mod error;
pub mod format;
pub mod geo;
pub mod model;
pub mod provider;
pub mod session;
pub mod state;

pub use config::Config;
pub use error::{InputError, LivestreamError, LocateError};
pub use model::{Coordinates, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config};
pub use session::Session;
pub use state::{Action, DashboardState, Tab};

//! User-facing error channels. Each channel has its own slot in
//! [`DashboardState`](crate::state::DashboardState) and is set and cleared
//! independently of the others.

use thiserror::Error;

/// Search input and weather fetch problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please enter a location.")]
    EmptyQuery,

    #[error("Location not found.")]
    LocationNotFound,

    /// Weather is still shown; only the background is missing.
    #[error("No matching background video found.")]
    NoBackgroundVideo,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LivestreamError {
    #[error("No livestream found for this city.")]
    NotAvailable,
}

/// Failure to turn the device position into a city name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("Location detection is not supported on this system.")]
    Unsupported,

    #[error("Access to your location was denied.")]
    PermissionDenied,

    #[error("Could not determine location: {0}")]
    Unavailable(String),

    #[error("Could not determine location: {0}")]
    Geocode(String),
}

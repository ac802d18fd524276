//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Fetching current weather from OpenWeather
//! - Extracting fields from the raw response
//! - The session's favorite cities
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod extract;
pub mod favorites;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::{ErrorKind, WeatherError};
pub use extract::{ResponseParser, extract_field};
pub use favorites::FavoritesStore;
pub use model::WeatherReading;
pub use provider::{WeatherProvider, lookup};

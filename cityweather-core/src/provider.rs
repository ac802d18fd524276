use crate::{
    Config, WeatherReading,
    error::{Result, WeatherError},
    extract::ResponseParser,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::debug;

pub mod openweather;

/// Source of raw current-weather responses.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Performs one request for `city` and returns the response body.
    async fn fetch_raw(&self, city: &str) -> Result<String>;
}

/// Construct the OpenWeather provider, reading the API key from the key file.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    Ok(Box::new(OpenWeatherProvider::new(api_key, config)?))
}

/// Fetches and parses current conditions for `city`.
pub async fn lookup(
    provider: &dyn WeatherProvider,
    parser: ResponseParser,
    city: &str,
) -> Result<WeatherReading> {
    let city = city.trim();
    if city.is_empty() {
        return Err(WeatherError::EmptyCityName);
    }

    debug!(city, "looking up weather");
    let raw = provider.fetch_raw(city).await?;
    parser.parse(city, &raw)
}

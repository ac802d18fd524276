use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{Result, WeatherError},
};

use super::WeatherProvider;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Client for OpenWeather's "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: &Config) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn request_url(&self, city: &str) -> String {
        build_url(&self.base_url, city, &self.api_key)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_raw(&self, city: &str) -> Result<String> {
        debug!(url = %build_url(&self.base_url, city, "<redacted>"), "requesting current weather");

        let res = self.http.get(self.request_url(city)).send().await.map_err(|e| {
            let e = e.without_url();
            warn!(error = %e, "OpenWeather request failed");
            WeatherError::from(e)
        })?;

        // Error statuses still carry a JSON body ("city not found") for the parser.
        let status = res.status();
        let body = res.text().await.map_err(|e| {
            let e = e.without_url();
            warn!(error = %e, "failed to read OpenWeather response body");
            WeatherError::from(e)
        })?;

        debug!(%status, bytes = body.len(), "OpenWeather responded");
        Ok(body)
    }
}

/// Percent-encodes a city name for the `q` query parameter.
///
/// Spaces become `%20`; other reserved and non-ASCII characters are encoded
/// as well so they cannot break out of the parameter.
pub fn encode_city(city: &str) -> String {
    urlencoding::encode(city).into_owned()
}

pub fn build_url(base_url: &str, city: &str, api_key: &str) -> String {
    format!("{base_url}{CURRENT_WEATHER_PATH}?q={}&appid={api_key}", encode_city(city))
}

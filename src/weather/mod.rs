//! Weather lookup for trip destinations

use async_trait::async_trait;

use crate::Result;
use crate::models::WeatherSnapshot;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Source of current conditions and a short daily forecast
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch the weather for a place name.
    ///
    /// Fails with `InvalidInput` for a blank location and with
    /// `WeatherService` for any upstream failure.
    async fn get_weather(&self, location: &str) -> Result<WeatherSnapshot>;
}

/// Strip the API key from a request URL before it reaches the logs
pub(crate) fn redact_key(url: &str) -> &str {
    url.split("appid=").next().unwrap_or(url)
}

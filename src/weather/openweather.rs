//! Weather API client for OpenWeather integration
//!
//! Uses the 5 day / 3 hour forecast endpoint: the first entry stands in for
//! current conditions and later entries are folded into daily summaries.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::{WeatherProvider, redact_key};
use crate::config::WeatherConfig;
use crate::models::{MAX_FORECAST_DAYS, WeatherSnapshot};
use crate::{Result, TravelPlanError};

/// Weather API client for OpenWeather
#[derive(Debug)]
pub struct OpenWeatherClient {
    /// HTTP client
    client: Client,
    /// API configuration
    config: WeatherConfig,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a new weather API client. Fails if no API key is configured.
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TravelPlanError::config("Weather API key is missing"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("TravelPlan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TravelPlanError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn forecast_url(&self, location: &str) -> String {
        format!(
            "{}/forecast?q={}&appid={}&units=metric",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(location),
            urlencoding::encode(&self.api_key)
        )
    }

    fn request_error(&self, error: reqwest::Error) -> TravelPlanError {
        if error.is_timeout() {
            TravelPlanError::weather(format!(
                "request timed out after {}s",
                self.config.timeout_seconds
            ))
        } else {
            TravelPlanError::weather(format!("network error ({})", error.without_url()))
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self), fields(location = %location))]
    async fn get_weather(&self, location: &str) -> Result<WeatherSnapshot> {
        let location = location.trim();
        if location.is_empty() {
            return Err(TravelPlanError::invalid_input("city name is required"));
        }

        let url = self.forecast_url(location);
        debug!(url = %redact_key(&url), "Requesting OpenWeather forecast");
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = payload::error_message(&body);
            warn!(status = %status, message = %message, "OpenWeather request failed");
            return Err(TravelPlanError::weather_status(status.as_u16(), message));
        }

        let forecast: payload::ForecastResponse = response.json().await.map_err(|e| {
            TravelPlanError::weather(format!(
                "invalid JSON received from OpenWeather API ({})",
                e.without_url()
            ))
        })?;

        let days = usize::try_from(self.config.forecast_days)
            .unwrap_or(MAX_FORECAST_DAYS)
            .min(MAX_FORECAST_DAYS);
        let snapshot = payload::build_snapshot(forecast, location, days)?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved weather for {} with {} forecast days in {:.3}s",
            snapshot.location,
            snapshot.forecast.len(),
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow weather API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(snapshot)
    }
}

/// OpenWeather response structures and conversion to [`WeatherSnapshot`]
mod payload {
    use super::{Result, TravelPlanError, WeatherSnapshot};
    use crate::models::{CurrentConditions, DailyForecast};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        #[serde(default)]
        pub list: Vec<ForecastEntry>,
        pub city: Option<City>,
    }

    /// One 3-hour forecast step
    #[derive(Debug, Deserialize)]
    pub struct ForecastEntry {
        pub main: Option<MainData>,
        #[serde(default)]
        pub weather: Vec<Condition>,
        pub dt_txt: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: Option<f64>,
        pub humidity: Option<u8>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct City {
        pub name: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    impl ForecastEntry {
        fn date(&self) -> Option<NaiveDate> {
            let text = self.dt_txt.as_deref()?;
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        }

        fn temperature(&self) -> Option<f64> {
            self.main.as_ref().and_then(|m| m.temp)
        }

        fn humidity(&self) -> Option<u8> {
            self.main.as_ref().and_then(|m| m.humidity)
        }

        fn description(&self) -> Option<&str> {
            self.weather
                .first()
                .and_then(|c| c.description.as_deref())
                .filter(|d| !d.trim().is_empty())
        }
    }

    #[derive(Default)]
    struct DayBucket {
        temps: Vec<f64>,
        descriptions: Vec<String>,
    }

    impl DayBucket {
        fn into_forecast(self, date: NaiveDate) -> Option<DailyForecast> {
            if self.temps.is_empty() {
                return None;
            }
            let low_c = self.temps.iter().copied().fold(f64::INFINITY, f64::min);
            let high_c = self.temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let description = most_common(&self.descriptions)
                .map_or_else(|| "No description".to_string(), capitalize);

            Some(DailyForecast {
                date,
                high_c,
                low_c,
                description,
            })
        }
    }

    /// Most frequent value; ties go to the one seen first
    fn most_common(values: &[String]) -> Option<&str> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for value in values {
            match counts.iter_mut().find(|(v, _)| *v == value.as_str()) {
                Some((_, count)) => *count += 1,
                None => counts.push((value.as_str(), 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (value, count) in counts {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value)
    }

    fn capitalize(text: &str) -> String {
        let lower = text.trim().to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Pull the `message` field out of an OpenWeather error body
    pub fn error_message(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| body.trim().to_string())
    }

    pub fn build_snapshot(
        response: ForecastResponse,
        query: &str,
        forecast_days: usize,
    ) -> Result<WeatherSnapshot> {
        let mut entries = response.list.into_iter();
        let current_entry = entries.next().ok_or_else(|| {
            TravelPlanError::weather("no forecast data returned by OpenWeather API")
        })?;

        let current_date = current_entry.date();
        let current = CurrentConditions {
            temperature_c: current_entry.temperature(),
            description: current_entry
                .description()
                .map_or_else(|| "Unknown".to_string(), capitalize),
            humidity: current_entry.humidity(),
        };

        let mut by_day: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
        for entry in entries {
            let Some(date) = entry.date() else {
                continue;
            };
            if current_date.is_some_and(|current| date <= current) {
                continue;
            }

            let bucket = by_day.entry(date).or_default();
            if let Some(temp) = entry.temperature() {
                bucket.temps.push(temp);
            }
            if let Some(description) = entry.description() {
                bucket.descriptions.push(description.to_lowercase());
            }
        }

        let forecast: Vec<DailyForecast> = by_day
            .into_iter()
            .filter_map(|(date, bucket)| bucket.into_forecast(date))
            .take(forecast_days)
            .collect();

        let location = response
            .city
            .and_then(|c| c.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| query.to_string());

        Ok(WeatherSnapshot::new(location, current, forecast))
    }

}

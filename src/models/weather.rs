//! Weather snapshot model and display methods

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Forecast APIs used here never report more than five future days
pub const MAX_FORECAST_DAYS: usize = 5;

/// Current conditions at the destination
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature_c: Option<f64>,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Relative humidity percentage (0-100)
    pub humidity: Option<u8>,
}

/// Aggregated forecast for one calendar day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Highest temperature of the day in Celsius
    pub high_c: f64,
    /// Lowest temperature of the day in Celsius
    pub low_c: f64,
    /// Most frequent description of the day
    pub description: String,
}

/// Current conditions plus a short daily forecast for one location
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Location name as resolved by the weather service
    pub location: String,
    pub current: CurrentConditions,
    /// Daily forecasts, ascending by date, at most [`MAX_FORECAST_DAYS`]
    pub forecast: Vec<DailyForecast>,
    /// When this snapshot was retrieved
    pub retrieved_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Create a snapshot, ordering the forecast by date and capping its length
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        current: CurrentConditions,
        mut forecast: Vec<DailyForecast>,
    ) -> Self {
        forecast.sort_by_key(|day| day.date);
        forecast.truncate(MAX_FORECAST_DAYS);
        Self {
            location: location.into(),
            current,
            forecast,
            retrieved_at: Utc::now(),
        }
    }

    /// One-line summary used as context in model prompts
    #[must_use]
    pub fn summary_line(&self) -> String {
        let mut summary = format!(
            "Current weather in {}: {}, {}.",
            self.location,
            self.current.format_temperature(),
            self.current.description.to_lowercase()
        );

        if !self.forecast.is_empty() {
            let days: Vec<String> = self
                .forecast
                .iter()
                .map(|day| {
                    format!(
                        "{} {}, {}",
                        day.format_date(),
                        day.format_range(),
                        day.description.to_lowercase()
                    )
                })
                .collect();
            summary.push_str(&format!(" Forecast: {}.", days.join("; ")));
        }

        summary
    }
}

impl CurrentConditions {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        match self.temperature_c {
            Some(temperature) => format!("{temperature:.1}°C"),
            None => "N/A".to_string(),
        }
    }
}

impl DailyForecast {
    /// Format the low to high range with unit
    #[must_use]
    pub fn format_range(&self) -> String {
        format!("{:.1} to {:.1}°C", self.low_c, self.high_c)
    }

    /// Format the date as e.g. "Tue, Jan 16"
    #[must_use]
    pub fn format_date(&self) -> String {
        self.date.format("%a, %b %d").to_string()
    }
}

impl Display for WeatherSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Weather for {}", self.location)?;
        write!(
            f,
            "Current: {}, {}",
            self.current.format_temperature(),
            self.current.description
        )?;
        if let Some(humidity) = self.current.humidity {
            write!(f, ", humidity {humidity}%")?;
        }
        writeln!(f)?;

        if self.forecast.is_empty() {
            write!(f, "Forecast summary unavailable for the coming days.")?;
            return Ok(());
        }

        write!(f, "Next {} days:", self.forecast.len())?;
        for day in &self.forecast {
            write!(
                f,
                "\n- {}: {}, {}",
                day.format_date(),
                day.format_range(),
                day.description
            )?;
        }
        Ok(())
    }
}

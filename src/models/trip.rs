//! Trip request model

use serde::{Deserialize, Serialize};

use crate::{Result, TravelPlanError};

/// Longest trip the planner accepts
pub const MAX_TRIP_DAYS: i32 = 30;

/// Longest destination name accepted from user input
const MAX_DESTINATION_LEN: usize = 100;

/// A desired trip as entered by the user
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripRequest {
    /// Destination city or place name
    pub destination: String,
    /// Trip length in days
    #[serde(alias = "days")]
    pub duration_days: i32,
    /// Travel month or season, e.g. "April" or "late autumn"
    #[serde(default)]
    pub month: Option<String>,
    /// Free-text preferences: budget, pace, food, interests
    #[serde(default)]
    pub preferences: Option<String>,
}

impl TripRequest {
    /// Create a new trip request
    #[must_use]
    pub fn new(destination: impl Into<String>, duration_days: i32) -> Self {
        Self {
            destination: destination.into(),
            duration_days,
            month: None,
            preferences: None,
        }
    }

    /// Set the travel month or season, ignoring blank input
    #[must_use]
    pub fn with_month(mut self, month: Option<String>) -> Self {
        self.month = non_blank(month);
        self
    }

    /// Set free-text preferences, ignoring blank input
    #[must_use]
    pub fn with_preferences(mut self, preferences: Option<String>) -> Self {
        self.preferences = non_blank(preferences);
        self
    }

    /// Destination with surrounding whitespace removed
    #[must_use]
    pub fn destination(&self) -> &str {
        self.destination.trim()
    }

    /// Trip length as an unsigned day count. Only meaningful after [`validate`](Self::validate).
    #[must_use]
    pub fn days(&self) -> u32 {
        u32::try_from(self.duration_days).unwrap_or(0)
    }

    /// Month or season, if given and not blank
    #[must_use]
    pub fn month(&self) -> Option<&str> {
        self.month.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }

    /// Preferences, if given and not blank
    #[must_use]
    pub fn preferences(&self) -> Option<&str> {
        self.preferences
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Check destination and trip length
    pub fn validate(&self) -> Result<()> {
        let destination = self.destination();
        if destination.is_empty() {
            return Err(TravelPlanError::invalid_input(
                "destination city is required",
            ));
        }

        if destination.chars().count() > MAX_DESTINATION_LEN {
            return Err(TravelPlanError::invalid_input(format!(
                "destination cannot exceed {MAX_DESTINATION_LEN} characters"
            )));
        }

        if self.duration_days < 1 {
            return Err(TravelPlanError::invalid_input(
                "trip length must be a positive number of days",
            ));
        }

        if self.duration_days > MAX_TRIP_DAYS {
            return Err(TravelPlanError::invalid_input(format!(
                "trip length cannot exceed {MAX_TRIP_DAYS} days"
            )));
        }

        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

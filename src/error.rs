//! Error types and handling for `TravelPlan`

use thiserror::Error;

/// Main error type for the `TravelPlan` application
#[derive(Error, Debug)]
pub enum TravelPlanError {
    /// Bad or missing trip request fields
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Missing credentials or unusable settings
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Weather API failures (network, timeout, non-2xx, malformed payload)
    #[error("Weather service error: {message}")]
    WeatherService { status: Option<u16>, message: String },

    /// Generative model failures (auth, quota, network, timeout)
    #[error("Model unavailable: {message}")]
    ModelUnavailable { status: Option<u16>, message: String },

    /// The model answered with blank text
    #[error("Empty completion: {message}")]
    EmptyCompletion { message: String },

    /// The day-by-day plan did not contain the requested number of days
    #[error("Day-by-day plan has {found} day entries, expected {expected}")]
    DayCountMismatch { expected: u32, found: usize },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl TravelPlanError {
    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a weather error without an upstream status (network, parse)
    pub fn weather<S: Into<String>>(message: S) -> Self {
        Self::WeatherService {
            status: None,
            message: message.into(),
        }
    }

    /// Create a weather error for a non-2xx upstream response
    pub fn weather_status<S: Into<String>>(status: u16, message: S) -> Self {
        Self::WeatherService {
            status: Some(status),
            message: format!("OpenWeather API returned {status} ({})", message.into()),
        }
    }

    /// Create a model error without an upstream status (network, parse)
    pub fn model_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ModelUnavailable {
            status: None,
            message: message.into(),
        }
    }

    /// Create a model error for a non-2xx upstream response
    pub fn model_status<S: Into<String>>(status: u16, message: S) -> Self {
        Self::ModelUnavailable {
            status: Some(status),
            message: format!("model API returned {status} ({})", message.into()),
        }
    }

    /// Create a new empty completion error
    pub fn empty_completion<S: Into<String>>(message: S) -> Self {
        Self::EmptyCompletion {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            TravelPlanError::InvalidInput { .. } => "invalid_input",
            TravelPlanError::Configuration { .. } => "configuration",
            TravelPlanError::WeatherService { .. } => "weather_service",
            TravelPlanError::ModelUnavailable { .. } => "model_unavailable",
            TravelPlanError::EmptyCompletion { .. } => "empty_completion",
            TravelPlanError::DayCountMismatch { .. } => "day_count_mismatch",
            TravelPlanError::Io { .. } => "io",
            TravelPlanError::General { .. } => "general",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelPlanError::InvalidInput { message } => format!("Invalid input: {message}"),
            TravelPlanError::Configuration { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TravelPlanError::WeatherService { message, .. } => {
                format!("Weather lookup failed: {message}. You can resubmit to try again.")
            }
            TravelPlanError::ModelUnavailable { message, .. } => {
                format!("The itinerary model is unavailable: {message}. You can resubmit to try again.")
            }
            TravelPlanError::EmptyCompletion { .. } => {
                "The model returned an empty answer, so no plan was produced. Please try again."
                    .to_string()
            }
            TravelPlanError::DayCountMismatch { expected, found } => format!(
                "The generated day-by-day plan covered {found} days instead of {expected}. Please try again."
            ),
            TravelPlanError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            TravelPlanError::General { message } => message.clone(),
        }
    }
}

//! Configuration management for `TravelPlan`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::{Result, TravelPlanError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `TravelPlan` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelPlanConfig {
    /// Weather API configuration
    pub weather: WeatherConfig,
    /// Generative model API configuration
    pub llm: LlmConfig,
    /// Itinerary assembly settings
    pub planner: PlannerConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeather API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Number of daily forecast entries to keep (1-5)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
}

/// Generative model API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Google Generative Language API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL for the model API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model identifier, fixed for the lifetime of the process
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Sampling temperature (0.0-2.0)
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    /// Upper bound on generated tokens per section
    #[serde(default = "default_llm_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u32,
    /// Pick the best available model at startup instead of trusting `model`
    #[serde(default)]
    pub auto_select_model: bool,
}

/// Itinerary assembly settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Regenerations allowed when the day-by-day plan has the wrong day count
    #[serde(default = "default_day_plan_retries")]
    pub day_plan_retries: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_timeout() -> u32 {
    8
}

fn default_forecast_days() -> u32 {
    5
}

fn default_llm_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_llm_temperature() -> f32 {
    0.3
}

fn default_llm_max_output_tokens() -> u32 {
    4096
}

fn default_llm_timeout() -> u32 {
    30
}

fn default_day_plan_retries() -> u32 {
    1
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            max_output_tokens: default_llm_max_output_tokens(),
            timeout_seconds: default_llm_timeout(),
            auto_select_model: false,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            day_plan_retries: default_day_plan_retries(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl TravelPlanConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRAVELPLAN_WEATHER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("TRAVELPLAN")
                .prefix_separator("_")
                .separator("__"),
        );

        let settings = builder.build().map_err(|e| {
            TravelPlanError::config(format!(
                "Failed to build configuration from {}: {e}",
                config_file.display()
            ))
        })?;

        let mut config: TravelPlanConfig = settings.try_deserialize().map_err(|e| {
            TravelPlanError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.apply_credential_fallbacks(|name| std::env::var(name).ok());
        config.apply_defaults();
        config.validate_settings()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travelplan").join("config.toml"))
    }

    /// Fill missing credentials from the plain `OPENWEATHER_KEY`,
    /// `GOOGLE_API_KEY` and `GEMINI_MODEL` variables
    pub fn apply_credential_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());

        if !present(&self.weather.api_key) {
            if let Some(key) = lookup("OPENWEATHER_KEY") {
                self.weather.api_key = Some(key);
            }
        }
        if !present(&self.llm.api_key) {
            if let Some(key) = lookup("GOOGLE_API_KEY") {
                self.llm.api_key = Some(key);
            }
        }
        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            if self.llm.model == default_llm_model() {
                self.llm.model = model.trim().to_string();
            }
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.forecast_days == 0 {
            self.weather.forecast_days = default_forecast_days();
        }
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.model.trim().is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.llm.max_output_tokens == 0 {
            self.llm.max_output_tokens = default_llm_max_output_tokens();
        }
        if self.llm.timeout_seconds == 0 {
            self.llm.timeout_seconds = default_llm_timeout();
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_settings()
    }

    /// Validate everything except credentials.
    ///
    /// Keys are checked per command, so a command that only talks to the
    /// weather service does not need the model key.
    pub fn validate_settings(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        self.validate_weather_key()?;
        self.validate_llm_key()
    }

    pub fn validate_weather_key(&self) -> Result<()> {
        validate_key(
            self.weather.api_key.as_deref(),
            "Weather API key is missing. Set TRAVELPLAN_WEATHER__API_KEY or OPENWEATHER_KEY.",
            "Weather",
        )
    }

    pub fn validate_llm_key(&self) -> Result<()> {
        validate_key(
            self.llm.api_key.as_deref(),
            "Model API key is missing. Set TRAVELPLAN_LLM__API_KEY or GOOGLE_API_KEY.",
            "Model",
        )
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(TravelPlanError::config(
                "Weather API timeout cannot exceed 300 seconds",
            ));
        }

        if !(1..=5).contains(&self.weather.forecast_days) {
            return Err(TravelPlanError::config(
                "Weather forecast days must be between 1 and 5",
            ));
        }

        if self.llm.timeout_seconds > 300 {
            return Err(TravelPlanError::config(
                "Model API timeout cannot exceed 300 seconds",
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(TravelPlanError::config(
                "Model temperature must be between 0.0 and 2.0",
            ));
        }

        if self.planner.day_plan_retries > 3 {
            return Err(TravelPlanError::config(
                "Day plan retries cannot exceed 3",
            ));
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelPlanError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelPlanError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("Weather", &self.weather.base_url),
            ("Model", &self.llm.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TravelPlanError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }
}

fn validate_key(key: Option<&str>, missing: &str, name: &str) -> Result<()> {
    let Some(key) = key else {
        return Err(TravelPlanError::config(missing));
    };

    if key.trim().is_empty() {
        return Err(TravelPlanError::config(missing));
    }

    if key.len() > 200 {
        return Err(TravelPlanError::config(format!(
            "{name} API key appears to be invalid (too long). Please check your API key."
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn configured() -> TravelPlanConfig {
        let mut config = TravelPlanConfig::default();
        config.weather.api_key = Some("weather_key_123".to_string());
        config.llm.api_key = Some("model_key_123".to_string());
        config
    }

    #[test]
    fn test_default_config() {
        let config = TravelPlanConfig::default();
        assert_eq!(
            config.weather.base_url,
            "https://api.openweathermap.org/data/2.5"
        );
        assert_eq!(config.weather.timeout_seconds, 8);
        assert_eq!(config.weather.forecast_days, 5);
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.planner.day_plan_retries, 1);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(config.weather.api_key.is_none());
    }

    #[test]
    fn test_config_validation_missing_api_keys() {
        let config = TravelPlanConfig::default();
        let result = config.validate();
        assert!(matches!(result, Err(TravelPlanError::Configuration { .. })));

        let mut config = configured();
        config.llm.api_key = Some("   ".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_weather_key_alone_is_checked_separately() {
        let mut config = TravelPlanConfig::default();
        config.weather.api_key = Some("weather_key_123".to_string());

        assert!(config.validate_weather_key().is_ok());
        assert!(config.validate_settings().is_ok());
        let err = config.validate_llm_key().unwrap_err();
        assert!(err.to_string().contains("Model API key is missing"));
        assert!(config.validate_api_keys().is_err());
    }

    #[test]
    fn test_config_validation_valid_api_keys() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = configured();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = configured();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = configured();
        config.weather.forecast_days = 6;
        assert!(config.validate().is_err());

        let mut config = configured();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = configured();
        config.llm.base_url = "ftp://example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Model API base URL"));
    }

    #[test]
    fn test_credential_fallbacks() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENWEATHER_KEY", "ow_key"),
            ("GOOGLE_API_KEY", "google_key"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
        ]);
        let lookup = |name: &str| env.get(name).map(|v| (*v).to_string());

        let mut config = TravelPlanConfig::default();
        config.apply_credential_fallbacks(lookup);

        assert_eq!(config.weather.api_key.as_deref(), Some("ow_key"));
        assert_eq!(config.llm.api_key.as_deref(), Some("google_key"));
        assert_eq!(config.llm.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_credential_fallbacks_do_not_override_explicit_values() {
        let mut config = configured();
        config.llm.model = "gemini-1.5-pro".to_string();
        config.apply_credential_fallbacks(|_| Some("from_env".to_string()));

        assert_eq!(config.weather.api_key.as_deref(), Some("weather_key_123"));
        assert_eq!(config.llm.api_key.as_deref(), Some("model_key_123"));
        assert_eq!(config.llm.model, "gemini-1.5-pro");
    }

    #[test]
    fn test_apply_defaults_repairs_zero_values() {
        let mut config = configured();
        config.weather.timeout_seconds = 0;
        config.llm.model = String::new();
        config.logging.format = String::new();
        config.apply_defaults();

        assert_eq!(config.weather.timeout_seconds, 8);
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "travelplan-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"
[weather]
api_key = "file_weather_key"
forecast_days = 3

[llm]
api_key = "file_model_key"
temperature = 0.7

[server]
port = 9090
"#,
        )
        .unwrap();

        let config = TravelPlanConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.weather.forecast_days, 3);
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_without_keys_defers_key_checks() {
        let path = std::env::temp_dir().join(format!(
            "travelplan-keyless-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[server]\nport = 9191\n").unwrap();

        let result = TravelPlanConfig::load_from_path(Some(path.clone()));
        std::fs::remove_file(&path).ok();

        let config = result.unwrap();
        assert_eq!(config.server.port, 9191);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = TravelPlanConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("travelplan"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}

//! `TravelPlan` - AI trip planner
//!
//! This library fetches destination weather, prompts a generative model for
//! a cultural overview, flights, hotels and a day-by-day plan, and assembles
//! the answers into one itinerary document.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod planner;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::TravelPlanConfig;
pub use error::TravelPlanError;
pub use llm::{GeminiClient, TextGenerator};
pub use models::{ItineraryDocument, ItinerarySection, SectionKind, TripRequest, WeatherSnapshot};
pub use planner::ItineraryAssembler;
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelPlanError>;

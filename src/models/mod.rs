//! Data models for the TravelPlan application
//!
//! This module contains the core domain models organized by concern:
//! - Trip: the validated user request
//! - Weather: current conditions and the short daily forecast
//! - Itinerary: titled sections and the assembled document

pub mod itinerary;
pub mod trip;
pub mod weather;

// Re-export all public types for convenient access
pub use itinerary::{ItineraryDocument, ItinerarySection, SectionKind};
pub use trip::{MAX_TRIP_DAYS, TripRequest};
pub use weather::{CurrentConditions, DailyForecast, MAX_FORECAST_DAYS, WeatherSnapshot};

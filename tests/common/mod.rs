//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use travelplan::config::PlannerConfig;
use travelplan::models::{CurrentConditions, DailyForecast, WeatherSnapshot};
use travelplan::{ItineraryAssembler, Result, TextGenerator, TravelPlanError, WeatherProvider};

pub fn sample_snapshot(location: &str) -> WeatherSnapshot {
    WeatherSnapshot::new(
        location,
        CurrentConditions {
            temperature_c: Some(14.2),
            description: "Scattered clouds".to_string(),
            humidity: Some(62),
        },
        (2..=6)
            .map(|day| DailyForecast {
                date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
                high_c: 15.0 + f64::from(day),
                low_c: 8.0 + f64::from(day),
                description: "Clear sky".to_string(),
            })
            .collect(),
    )
}

/// Weather provider that counts calls and can be told to fail
#[derive(Default)]
pub struct FakeWeather {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeWeather {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn get_weather(&self, location: &str) -> Result<WeatherSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TravelPlanError::weather_status(503, "service unavailable"));
        }
        Ok(sample_snapshot(location))
    }
}

/// Generator that answers each prompt by section, with scripted day plans
pub struct FakeGenerator {
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    day_plans: Mutex<VecDeque<String>>,
    blank_marker: Option<&'static str>,
}

impl FakeGenerator {
    /// Answers every day plan prompt with exactly the requested days
    pub fn new() -> Self {
        Self::with_day_plans(Vec::new())
    }

    /// Answers day plan prompts from `plans` in order, then falls back to exact plans
    pub fn with_day_plans(plans: Vec<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            day_plans: Mutex::new(plans.into()),
            blank_marker: None,
        }
    }

    /// Answers blank to every prompt
    pub fn blank() -> Self {
        Self::blank_on("")
    }

    /// Answers blank to prompts containing `marker`
    pub fn blank_on(marker: &'static str) -> Self {
        Self {
            blank_marker: Some(marker),
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

/// Plan text with `Day 1` through `Day days`
pub fn day_plan(days: u32) -> String {
    (1..=days)
        .map(|day| format!("Day {day}: Morning market, afternoon museum, evening river walk."))
        .collect::<Vec<_>>()
        .join("\n")
}

fn requested_days(prompt: &str) -> u32 {
    prompt
        .split("-day travel itinerary")
        .next()
        .and_then(|head| head.rsplit(' ').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.blank_marker.is_some_and(|marker| prompt.contains(marker)) {
            return Ok(String::new());
        }

        if prompt.contains("-day travel itinerary") {
            if let Some(plan) = self.day_plans.lock().unwrap().pop_front() {
                return Ok(plan);
            }
            return Ok(day_plan(requested_days(prompt)));
        }
        if prompt.contains("flight options") {
            return Ok("Option 1: ANA | SFO-HND | 11h | Nonstop | $900".to_string());
        }
        if prompt.contains("hotel options") {
            return Ok("1. Hotel Gracery - Shinjuku - $150/night - central".to_string());
        }
        Ok("A city of shrines, neon and deep culinary traditions.".to_string())
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

pub fn assembler(
    weather: Arc<FakeWeather>,
    generator: Arc<FakeGenerator>,
    retries: u32,
) -> ItineraryAssembler {
    ItineraryAssembler::new(
        weather,
        generator,
        PlannerConfig {
            day_plan_retries: retries,
        },
    )
}

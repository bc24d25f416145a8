//! Prompt construction for the generated itinerary sections

use crate::models::{SectionKind, TripRequest, WeatherSnapshot};
use crate::{Result, TravelPlanError};

/// Build the prompt for one generated section.
///
/// The request is validated first, so a prompt is never built for an empty
/// destination or a non-positive trip length.
pub fn build_prompt(
    section: SectionKind,
    request: &TripRequest,
    weather: Option<&WeatherSnapshot>,
) -> Result<String> {
    request.validate()?;

    let city = request.destination();
    let instruction = match section {
        SectionKind::Weather => {
            return Err(TravelPlanError::invalid_input(
                "the weather section is not generated by the model",
            ));
        }
        SectionKind::Overview => format!(
            "Write exactly one well-structured paragraph about the historical and cultural \
             significance of {city}. Keep it factual, engaging, and concise (120-170 words)."
        ),
        SectionKind::Flights => format!(
            "Generate 3 realistic economy flight options from major US hubs to {city}. \
             Use this exact format for each option: \
             Option X: Airline | Route | Duration | Stops | Approx Price (USD). \
             Use plausible airlines, routes, and approximate round-trip prices. \
             Do not include markdown tables."
        ),
        SectionKind::Hotels => format!(
            "Generate 3 realistic mid-range hotel options in {city}. \
             For each hotel, include: Hotel Name, area/location, price per night in USD, \
             and one short reason it is a good choice. \
             Keep output concise and cleanly formatted as numbered items."
        ),
        SectionKind::DayByDayPlan => day_plan_instruction(city, request.days()),
    };

    Ok(with_context(instruction, request, weather))
}

/// Day plan prompt restated with a correction after a wrong day count
pub fn build_day_plan_retry_prompt(
    request: &TripRequest,
    weather: Option<&WeatherSnapshot>,
    found: usize,
) -> Result<String> {
    let mut prompt = build_prompt(SectionKind::DayByDayPlan, request, weather)?;
    let days = request.days();
    prompt.push_str(&format!(
        "\n\nCorrection: your previous answer contained {found} day entries, but the trip \
         lasts exactly {days} days. Return exactly {days} entries, Day 1 through Day {days}, \
         and nothing before Day 1 or after Day {days}."
    ));
    Ok(prompt)
}

fn day_plan_instruction(city: &str, days: u32) -> String {
    format!(
        "Create a detailed {days}-day travel itinerary for {city}. \
         Write exactly {days} day entries, each starting on its own line with a heading \
         from Day 1 to Day {days}. \
         For each day, include: morning, afternoon, evening, food suggestions, and \
         one practical local tip, naming at least one concrete place or activity. \
         Keep it realistic and traveler-friendly. \
         Do not start any other line with the word \"Day\"."
    )
}

fn with_context(
    instruction: String,
    request: &TripRequest,
    weather: Option<&WeatherSnapshot>,
) -> String {
    let mut prompt = instruction;
    let mut context = Vec::new();

    if let Some(month) = request.month() {
        context.push(format!("Travel month or season: {month}."));
    }
    if let Some(preferences) = request.preferences() {
        context.push(format!("Traveler preferences: {preferences}."));
    }
    if let Some(weather) = weather {
        context.push(weather.summary_line());
    }

    if !context.is_empty() {
        prompt.push_str("\n\nContext:\n");
        prompt.push_str(&context.join("\n"));
    }
    prompt
}

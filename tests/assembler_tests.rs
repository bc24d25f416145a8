//! Integration tests for itinerary assembly

mod common;

use std::sync::Arc;

use common::{FakeGenerator, FakeWeather, assembler, day_plan};
use rstest::rstest;
use travelplan::planner::count_day_entries;
use travelplan::{SectionKind, TravelPlanError, TripRequest};

#[tokio::test]
async fn test_tokyo_three_day_itinerary() {
    let weather = Arc::new(FakeWeather::default());
    let generator = Arc::new(FakeGenerator::new());
    let planner = assembler(weather.clone(), generator.clone(), 1);

    let document = planner
        .assemble_itinerary(&TripRequest::new("Tokyo", 3))
        .await
        .unwrap();

    assert_eq!(weather.call_count(), 1);
    assert_eq!(generator.call_count(), 4);
    assert_eq!(document.destination, "Tokyo");
    assert_eq!(document.duration_days, 3);
    assert_eq!(document.model, "fake-model");

    let titles: Vec<&str> = document.sections().iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        ["Weather", "Cultural Overview", "Flights", "Hotels", "Itinerary"]
    );
    for section in document.sections() {
        assert!(!section.content.trim().is_empty(), "{} is blank", section.title);
    }

    let plan = document.section(SectionKind::DayByDayPlan).unwrap();
    assert_eq!(count_day_entries(&plan.content), 3);

    let weather_section = document.section(SectionKind::Weather).unwrap();
    assert!(weather_section.content.contains("Weather for Tokyo"));
    assert!(weather_section.content.contains("14.2°C"));
    assert!(weather_section.content.contains("Next 5 days:"));

    let markdown = document.to_string();
    assert!(markdown.starts_with("# 3-Day Travel Plan: Tokyo"));
    assert!(markdown.contains("## Cultural Overview"));
}

#[tokio::test]
async fn test_every_prompt_carries_destination_and_weather() {
    let weather = Arc::new(FakeWeather::default());
    let generator = Arc::new(FakeGenerator::new());
    let request = TripRequest::new("Kyoto", 2).with_month(Some("November".to_string()));

    assembler(weather, generator.clone(), 1)
        .assemble_itinerary(&request)
        .await
        .unwrap();

    for prompt in generator.prompts() {
        assert!(prompt.contains("Kyoto"));
        assert!(prompt.contains("Travel month or season: November."));
        assert!(prompt.contains("Current weather in Kyoto"));
    }
}

#[rstest]
#[tokio::test]
async fn test_day_count_matches_request(#[values(1, 2, 5, 7, 10, 14)] days: i32) {
    let weather = Arc::new(FakeWeather::default());
    let generator = Arc::new(FakeGenerator::new());

    let document = assembler(weather, generator, 1)
        .assemble_itinerary(&TripRequest::new("Lisbon", days))
        .await
        .unwrap();

    let plan = document.section(SectionKind::DayByDayPlan).unwrap();
    assert_eq!(count_day_entries(&plan.content), days as usize);
}

#[rstest]
#[case("", 3)]
#[case("   ", 3)]
#[case("Tokyo", 0)]
#[case("Tokyo", -1)]
#[case("Tokyo", 31)]
#[tokio::test]
async fn test_invalid_request_makes_no_calls(#[case] destination: &str, #[case] days: i32) {
    let weather = Arc::new(FakeWeather::default());
    let generator = Arc::new(FakeGenerator::new());

    let result = assembler(weather.clone(), generator.clone(), 1)
        .assemble_itinerary(&TripRequest::new(destination, days))
        .await;

    assert!(matches!(result, Err(TravelPlanError::InvalidInput { .. })));
    assert_eq!(weather.call_count(), 0);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_weather_failure_skips_generation() {
    let weather = Arc::new(FakeWeather::failing());
    let generator = Arc::new(FakeGenerator::new());

    let result = assembler(weather.clone(), generator.clone(), 1)
        .assemble_itinerary(&TripRequest::new("Tokyo", 3))
        .await;

    assert!(matches!(
        result,
        Err(TravelPlanError::WeatherService {
            status: Some(503),
            ..
        })
    ));
    assert_eq!(weather.call_count(), 1);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_blank_completion_fails_whole_assembly() {
    let weather = Arc::new(FakeWeather::default());
    let generator = Arc::new(FakeGenerator::blank());

    let result = assembler(weather, generator.clone(), 1)
        .assemble_itinerary(&TripRequest::new("Tokyo", 3))
        .await;

    assert!(matches!(result, Err(TravelPlanError::EmptyCompletion { .. })));
    assert_eq!(generator.call_count(), 1);
}

#[rstest]
#[case("cultural significance", 1)]
#[case("flight options", 2)]
#[case("hotel options", 3)]
#[case("-day travel itinerary", 4)]
#[tokio::test]
async fn test_any_blank_section_fails(#[case] marker: &'static str, #[case] calls: usize) {
    let weather = Arc::new(FakeWeather::default());
    let generator = Arc::new(FakeGenerator::blank_on(marker));

    let result = assembler(weather, generator.clone(), 1)
        .assemble_itinerary(&TripRequest::new("Tokyo", 3))
        .await;

    assert!(matches!(result, Err(TravelPlanError::EmptyCompletion { .. })));
    assert_eq!(generator.call_count(), calls);
}

#[tokio::test]
async fn test_short_day_plan_is_regenerated() {
    let weather = Arc::new(FakeWeather::default());
    let generator = Arc::new(FakeGenerator::with_day_plans(vec![day_plan(3)]));

    let document = assembler(weather, generator.clone(), 1)
        .assemble_itinerary(&TripRequest::new("Tokyo", 4))
        .await
        .unwrap();

    let plan = document.section(SectionKind::DayByDayPlan).unwrap();
    assert_eq!(count_day_entries(&plan.content), 4);
    assert_eq!(generator.call_count(), 5);

    let prompts = generator.prompts();
    assert!(prompts[4].contains("contained 3 day entries"));
}

#[tokio::test]
async fn test_persistent_mismatch_is_reported() {
    let weather = Arc::new(FakeWeather::default());
    let generator = Arc::new(FakeGenerator::with_day_plans(vec![
        day_plan(6),
        day_plan(6),
    ]));

    let result = assembler(weather, generator.clone(), 1)
        .assemble_itinerary(&TripRequest::new("Tokyo", 5))
        .await;

    match result {
        Err(TravelPlanError::DayCountMismatch { expected, found }) => {
            assert_eq!(expected, 5);
            assert_eq!(found, 6);
        }
        other => panic!("Expected DayCountMismatch, got {other:?}"),
    }
    assert_eq!(generator.call_count(), 5);
}

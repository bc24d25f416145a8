//! Itinerary assembly: weather first, then each generated section in order

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use super::day_plan::{count_day_entries, has_exact_days};
use super::prompts::{build_day_plan_retry_prompt, build_prompt};
use crate::config::PlannerConfig;
use crate::llm::TextGenerator;
use crate::models::{ItineraryDocument, ItinerarySection, SectionKind, TripRequest, WeatherSnapshot};
use crate::weather::WeatherProvider;
use crate::{Result, TravelPlanError};

/// Turns a trip request into a complete itinerary document
pub struct ItineraryAssembler {
    weather: Arc<dyn WeatherProvider>,
    generator: Arc<dyn TextGenerator>,
    settings: PlannerConfig,
}

impl ItineraryAssembler {
    #[must_use]
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        generator: Arc<dyn TextGenerator>,
        settings: PlannerConfig,
    ) -> Self {
        Self {
            weather,
            generator,
            settings,
        }
    }

    /// Model used for the generated sections
    #[must_use]
    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Build the full itinerary.
    ///
    /// Validation happens before any network call. Weather is fetched once;
    /// if it fails the model is never called. Any failure aborts the whole
    /// assembly, so a partial document is never returned.
    #[instrument(skip(self, request), fields(destination = %request.destination(), days = request.duration_days))]
    pub async fn assemble_itinerary(&self, request: &TripRequest) -> Result<ItineraryDocument> {
        let start_time = Instant::now();
        request.validate()?;

        let snapshot = self.weather.get_weather(request.destination()).await?;

        let mut sections = Vec::with_capacity(SectionKind::DOCUMENT_ORDER.len());
        sections.push(ItinerarySection::new(
            SectionKind::Weather,
            snapshot.to_string(),
        ));

        for kind in SectionKind::GENERATED {
            let content = match kind {
                SectionKind::DayByDayPlan => self.generate_day_plan(request, &snapshot).await?,
                _ => {
                    let prompt = build_prompt(kind, request, Some(&snapshot))?;
                    self.generate_section(kind, &prompt).await?
                }
            };
            sections.push(ItinerarySection::new(kind, content));
        }

        let document = ItineraryDocument::from_sections(
            request.destination(),
            request.days(),
            self.generator.model(),
            sections,
        )?;

        info!(
            "Assembled {}-day itinerary for {} in {:.3}s",
            document.duration_days,
            document.destination,
            start_time.elapsed().as_secs_f64()
        );
        Ok(document)
    }

    async fn generate_section(&self, kind: SectionKind, prompt: &str) -> Result<String> {
        let start_time = Instant::now();
        let text = self.generator.generate(prompt).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(TravelPlanError::empty_completion(format!(
                "model returned no text for the {kind} section"
            )));
        }

        let elapsed = start_time.elapsed();
        debug!(
            "Generated {} section ({} chars) in {:.3}s",
            kind,
            text.len(),
            elapsed.as_secs_f64()
        );
        if elapsed.as_secs() > 20 {
            warn!("Slow {} generation: {:.3}s", kind, elapsed.as_secs_f64());
        }
        Ok(text.to_string())
    }

    async fn generate_day_plan(
        &self,
        request: &TripRequest,
        snapshot: &WeatherSnapshot,
    ) -> Result<String> {
        let days = request.days();
        let prompt = build_prompt(SectionKind::DayByDayPlan, request, Some(snapshot))?;
        let mut plan = self
            .generate_section(SectionKind::DayByDayPlan, &prompt)
            .await?;

        let mut regenerations = 0;
        loop {
            if has_exact_days(&plan, days) {
                return Ok(plan);
            }

            let found = count_day_entries(&plan);
            if regenerations >= self.settings.day_plan_retries {
                warn!(
                    "Day plan still has {} entries instead of {} after {} regenerations",
                    found, days, regenerations
                );
                return Err(TravelPlanError::DayCountMismatch {
                    expected: days,
                    found,
                });
            }

            regenerations += 1;
            warn!(
                "Day plan has {} entries instead of {}, regenerating ({}/{})",
                found, days, regenerations, self.settings.day_plan_retries
            );
            let retry = build_day_plan_retry_prompt(request, Some(snapshot), found)?;
            plan = self
                .generate_section(SectionKind::DayByDayPlan, &retry)
                .await?;
        }
    }
}

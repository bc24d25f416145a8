//! Itinerary sections and the assembled document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::{Result, TravelPlanError};

/// Kind of itinerary section
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Weather,
    Overview,
    Flights,
    Hotels,
    DayByDayPlan,
}

impl SectionKind {
    /// Order of sections in every assembled document
    pub const DOCUMENT_ORDER: [SectionKind; 5] = [
        SectionKind::Weather,
        SectionKind::Overview,
        SectionKind::Flights,
        SectionKind::Hotels,
        SectionKind::DayByDayPlan,
    ];

    /// Sections produced by the model, in generation order
    pub const GENERATED: [SectionKind; 4] = [
        SectionKind::Overview,
        SectionKind::Flights,
        SectionKind::Hotels,
        SectionKind::DayByDayPlan,
    ];

    /// Heading shown to the user
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Weather => "Weather",
            SectionKind::Overview => "Cultural Overview",
            SectionKind::Flights => "Flights",
            SectionKind::Hotels => "Hotels",
            SectionKind::DayByDayPlan => "Itinerary",
        }
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// One titled block of generated or structured content
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ItinerarySection {
    pub kind: SectionKind,
    pub title: String,
    pub content: String,
}

impl ItinerarySection {
    #[must_use]
    pub fn new(kind: SectionKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            content: content.into(),
        }
    }
}

/// The complete itinerary returned to the caller
#[derive(Debug, Serialize, Clone)]
pub struct ItineraryDocument {
    pub destination: String,
    pub duration_days: u32,
    /// Model that generated the text sections
    pub model: String,
    pub generated_at: DateTime<Utc>,
    sections: Vec<ItinerarySection>,
}

impl ItineraryDocument {
    /// Build a document, rejecting sections that are missing or out of order
    pub fn from_sections(
        destination: impl Into<String>,
        duration_days: u32,
        model: impl Into<String>,
        sections: Vec<ItinerarySection>,
    ) -> Result<Self> {
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        if kinds != SectionKind::DOCUMENT_ORDER {
            return Err(TravelPlanError::general(format!(
                "itinerary sections out of order: {kinds:?}"
            )));
        }

        Ok(Self {
            destination: destination.into(),
            duration_days,
            model: model.into(),
            generated_at: Utc::now(),
            sections,
        })
    }

    #[must_use]
    pub fn sections(&self) -> &[ItinerarySection] {
        &self.sections
    }

    /// Look up a section by kind
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> Option<&ItinerarySection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

impl Display for ItineraryDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "# {}-Day Travel Plan: {}",
            self.duration_days, self.destination
        )?;
        for section in &self.sections {
            write!(f, "\n## {}\n{}\n", section.title, section.content.trim_end())?;
        }
        Ok(())
    }
}

//! Trip planning: prompts, day plan checks and itinerary assembly

pub mod assembler;
pub mod day_plan;
pub mod prompts;

pub use assembler::ItineraryAssembler;
pub use day_plan::{count_day_entries, day_entry_numbers, has_exact_days};
pub use prompts::{build_day_plan_retry_prompt, build_prompt};

//! Day entry detection in generated day-by-day plans

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// A line opening with `Day <n>`, after optional heading, bullet, numbered list,
/// quote or emphasis markers
static DAY_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:(?:[#>*_\-]|\d+[.)])[ \t]*)*day[ \t]+(\d{1,2})(?:_|\b)")
        .expect("day heading pattern should compile")
});

/// Distinct day numbers with their own heading line
#[must_use]
pub fn day_entry_numbers(text: &str) -> BTreeSet<u32> {
    DAY_HEADING
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Number of distinct day entries
#[must_use]
pub fn count_day_entries(text: &str) -> usize {
    day_entry_numbers(text).len()
}

/// True when the entries are exactly Day 1 through Day `days`
#[must_use]
pub fn has_exact_days(text: &str, days: u32) -> bool {
    day_entry_numbers(text).into_iter().eq(1..=days)
}

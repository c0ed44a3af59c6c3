use crate::models::{CompletionRecord, Habit};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

/// Per-day lookup of completion records across an inclusive date range.
/// Every day in the range is a key, days without records map to an empty
/// bucket. Consumers iterate their own date list; the map is a lookup
/// table, not an iteration source.
pub type CompletionMap = BTreeMap<NaiveDate, Vec<CompletionRecord>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for InvalidRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid date range: {} is after {}", self.start, self.end)
    }
}

impl std::error::Error for InvalidRange {}

/// Builds the completion map for `habit` over `[start, end]` inclusive.
///
/// Bucket contents keep the insertion order of `habit.records`; records
/// dated outside the range are excluded. The habit is only borrowed and
/// never mutated.
pub fn completion_map(
    habit: &Habit,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<CompletionMap, InvalidRange> {
    if start > end {
        return Err(InvalidRange { start, end });
    }

    let mut map = CompletionMap::new();
    for offset in 0..=(end - start).num_days() {
        map.insert(start + Duration::days(offset), Vec::new());
    }

    for record in &habit.records {
        if let Some(bucket) = map.get_mut(&record.day) {
            bucket.push(record.clone());
        }
    }

    Ok(map)
}

/// Effective completion threshold for a habit, never below one.
pub fn goal_of(habit: &Habit) -> u32 {
    habit.goal.max(1)
}

/// A day is completed once its bucket meets the habit's goal.
pub fn is_completed(habit: &Habit, entries: &[CompletionRecord]) -> bool {
    entries.len() as u32 >= goal_of(habit)
}

/// The days of `map` whose bucket meets the habit's goal, ascending.
pub fn completed_days(habit: &Habit, map: &CompletionMap) -> Vec<NaiveDate> {
    map.iter()
        .filter(|(_, entries)| is_completed(habit, entries))
        .map(|(day, _)| *day)
        .collect()
}

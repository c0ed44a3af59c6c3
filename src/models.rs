use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    #[default]
    Active,
    Archived,
    SoftDeleted,
}

/// One piece of evidence that a habit was performed on a given day.
/// A day may carry any number of records; the goal threshold decides
/// when the day counts as completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub day: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: HabitStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_goal")]
    pub goal: u32,
    #[serde(default)]
    pub records: Vec<CompletionRecord>,
}

fn default_goal() -> u32 {
    1
}

impl Habit {
    pub fn new(name: &str, tags: Vec<String>, goal: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            status: HabitStatus::Active,
            tags,
            goal: goal.max(1),
            records: Vec::new(),
        }
    }
}

/// Persisted root document. The order of `habits` is the display order
/// and is only changed through the reorder endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HabitData {
    #[serde(default)]
    pub habits: Vec<Habit>,
}

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    pub tags: Option<Vec<String>>,
    pub goal: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TickRequest {
    pub day: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UntickRequest {
    pub day: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompletionsResponse {
    pub habit_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: crate::completions::CompletionMap,
    pub completed: Vec<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub id: String,
    pub name: String,
    pub completed_days: u32,
    pub current_streak: u32,
    pub last_7_days: u32,
    pub this_month: u32,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub habits: Vec<HabitSummary>,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub habits: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn habit_deserializes_with_defaults() {
        let habit: Habit =
            serde_json::from_str(r#"{"id":"h1","name":"Read"}"#).expect("parse habit");
        assert_eq!(habit.status, HabitStatus::Active);
        assert_eq!(habit.goal, 1);
        assert!(habit.tags.is_empty());
        assert!(habit.records.is_empty());
    }

    #[test]
    fn status_uses_snake_case_on_the_wire() {
        let json = serde_json::to_string(&HabitStatus::SoftDeleted).unwrap();
        assert_eq!(json, r#""soft_deleted""#);
    }

    #[test]
    fn new_habit_normalizes_goal() {
        let habit = Habit::new("Stretch", Vec::new(), 0);
        assert_eq!(habit.goal, 1);
        assert!(!habit.id.is_empty());
    }
}

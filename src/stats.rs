use crate::completions::goal_of;
use crate::habits::HabitListBuilder;
use crate::models::{Habit, HabitData, HabitStatus, HabitSummary, StatsResponse};
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::collections::BTreeMap;

pub fn build_stats(data: &HabitData) -> StatsResponse {
    build_stats_at(Local::now().date_naive(), data)
}

pub fn build_stats_at(today: NaiveDate, data: &HabitData) -> StatsResponse {
    let active = HabitListBuilder::new(&data.habits)
        .status(HabitStatus::Active)
        .build();

    StatsResponse {
        habits: active
            .iter()
            .map(|habit| summarize_at(today, habit))
            .collect(),
    }
}

fn summarize_at(today: NaiveDate, habit: &Habit) -> HabitSummary {
    let goal = goal_of(habit);
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for record in &habit.records {
        *per_day.entry(record.day).or_default() += 1;
    }
    let done = |day: NaiveDate| per_day.get(&day).is_some_and(|count| *count >= goal);

    // An incomplete today does not break a streak alive through yesterday.
    let mut streak = 0u32;
    let mut cursor = if done(today) {
        Some(today)
    } else {
        today.pred_opt()
    };
    while let Some(day) = cursor {
        if !done(day) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }

    let last_7_days = (0..7i64)
        .filter(|offset| done(today - Duration::days(*offset)))
        .count() as u32;
    let this_month = per_day
        .iter()
        .filter(|(day, count)| {
            day.year() == today.year() && day.month() == today.month() && **count >= goal
        })
        .count() as u32;
    let completed_days = per_day.values().filter(|count| **count >= goal).count() as u32;

    HabitSummary {
        id: habit.id.clone(),
        name: habit.name.clone(),
        completed_days,
        current_streak: streak,
        last_7_days,
        this_month,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompletionRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit_done_on(days: &[NaiveDate]) -> Habit {
        Habit {
            id: "h1".to_string(),
            name: "Read".to_string(),
            status: HabitStatus::Active,
            tags: Vec::new(),
            goal: 1,
            records: days
                .iter()
                .map(|day| CompletionRecord {
                    day: *day,
                    note: None,
                })
                .collect(),
        }
    }

    fn data_with(habits: Vec<Habit>) -> HabitData {
        HabitData { habits }
    }

    #[test]
    fn streak_counts_consecutive_days_through_today() {
        let today = date(2026, 1, 5);
        let habit = habit_done_on(&[date(2026, 1, 3), date(2026, 1, 4), today]);

        let stats = build_stats_at(today, &data_with(vec![habit]));
        assert_eq!(stats.habits[0].current_streak, 3);
    }

    #[test]
    fn incomplete_today_keeps_yesterdays_streak() {
        let today = date(2026, 1, 5);
        let habit = habit_done_on(&[date(2026, 1, 3), date(2026, 1, 4)]);

        let stats = build_stats_at(today, &data_with(vec![habit]));
        assert_eq!(stats.habits[0].current_streak, 2);
    }

    #[test]
    fn gap_before_yesterday_resets_streak() {
        let today = date(2026, 1, 5);
        let habit = habit_done_on(&[date(2026, 1, 2)]);

        let stats = build_stats_at(today, &data_with(vec![habit]));
        assert_eq!(stats.habits[0].current_streak, 0);
    }

    #[test]
    fn goal_threshold_gates_every_summary_count() {
        let today = date(2026, 1, 5);
        let mut habit = habit_done_on(&[today, today, date(2026, 1, 4)]);
        habit.goal = 2;

        let stats = build_stats_at(today, &data_with(vec![habit]));
        let summary = &stats.habits[0];
        assert_eq!(summary.completed_days, 1);
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.last_7_days, 1);
        assert_eq!(summary.this_month, 1);
    }

    #[test]
    fn window_counts_split_week_and_month() {
        let today = date(2026, 2, 3);
        let habit = habit_done_on(&[
            date(2026, 1, 28),
            date(2026, 2, 1),
            date(2026, 2, 3),
        ]);

        let stats = build_stats_at(today, &data_with(vec![habit]));
        let summary = &stats.habits[0];
        assert_eq!(summary.completed_days, 3);
        assert_eq!(summary.last_7_days, 3);
        assert_eq!(summary.this_month, 2);
    }

    #[test]
    fn only_active_habits_are_summarized() {
        let today = date(2026, 1, 5);
        let mut archived = habit_done_on(&[today]);
        archived.id = "h2".to_string();
        archived.status = HabitStatus::Archived;

        let stats = build_stats_at(today, &data_with(vec![habit_done_on(&[today]), archived]));
        assert_eq!(stats.habits.len(), 1);
        assert_eq!(stats.habits[0].id, "h1");
    }
}

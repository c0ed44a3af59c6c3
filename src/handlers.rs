use crate::completions::{completed_days, completion_map};
use crate::errors::AppError;
use crate::habits::{group_by_tags, HabitListBuilder};
use crate::models::{
    CompletionRecord, CompletionsQuery, CompletionsResponse, CreateHabitRequest, Habit, HabitData,
    HabitStatus, ImportSummary, ListQuery, OrderRequest, StatsResponse, TickRequest,
    UntickRequest,
};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Json,
};
use chrono::{Duration, Local, NaiveDate};
use std::collections::HashSet;
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let today = Local::now().date_naive();
    let mut days: Vec<NaiveDate> = (0..state.config.index_days)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect();
    let (start, end) = (days[0], days[days.len() - 1]);
    if state.config.reverse_days {
        days.reverse();
    }

    let data = state.data.lock().await;
    let active = HabitListBuilder::new(&data.habits)
        .status(HabitStatus::Active)
        .build();

    let mut sections = Vec::new();
    for (tag, habits) in group_by_tags(&active) {
        let mut rows = Vec::new();
        for habit in habits {
            let map = completion_map(&habit, start, end)?;
            rows.push((habit, map));
        }
        sections.push((tag, rows));
    }

    Ok(Html(render_index(&days, &sections, state.config.show_count)))
}

pub async fn list_habits(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Habit>>, AppError> {
    let statuses = parse_status_filter(query.status.as_deref())?;
    let data = state.data.lock().await;

    let mut builder = HabitListBuilder::new(&data.habits);
    for status in statuses {
        builder = builder.status(status);
    }
    Ok(Json(builder.build()))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<CreateHabitRequest>,
) -> Result<Json<Habit>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }
    if payload.goal == Some(0) {
        return Err(AppError::bad_request("goal must be at least 1"));
    }
    let tags: Vec<String> = payload
        .tags
        .unwrap_or_default()
        .iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

    let habit = Habit::new(name, tags, payload.goal.unwrap_or(1));
    let mut data = state.data.lock().await;
    data.habits.push(habit.clone());
    persist_data(&state.data_path, &data).await?;

    Ok(Json(habit))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, AppError> {
    let data = state.data.lock().await;
    let habit = find_habit(&data, &id)?;
    Ok(Json(habit.clone()))
}

pub async fn get_completions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CompletionsQuery>,
) -> Result<Json<CompletionsResponse>, AppError> {
    let today = Local::now().date_naive();
    let end = parse_day(query.end.as_deref(), today)?;
    let default_start = end - Duration::days(state.config.index_days - 1);
    let start = parse_day(query.start.as_deref(), default_start)?;

    let data = state.data.lock().await;
    let habit = find_habit(&data, &id)?;
    let days = completion_map(habit, start, end)?;
    let completed = completed_days(habit, &days);

    Ok(Json(CompletionsResponse {
        habit_id: habit.id.clone(),
        start,
        end,
        days,
        completed,
    }))
}

pub async fn tick(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TickRequest>,
) -> Result<Json<Habit>, AppError> {
    let day = payload.day.unwrap_or_else(|| Local::now().date_naive());

    let mut data = state.data.lock().await;
    let updated = {
        let habit = find_habit_mut(&mut data, &id)?;
        habit.records.push(CompletionRecord {
            day,
            note: payload.note,
        });
        habit.clone()
    };
    persist_data(&state.data_path, &data).await?;

    Ok(Json(updated))
}

pub async fn untick(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UntickRequest>,
) -> Result<Json<Habit>, AppError> {
    let mut data = state.data.lock().await;
    let updated = {
        let habit = find_habit_mut(&mut data, &id)?;
        habit.records.retain(|record| record.day != payload.day);
        habit.clone()
    };
    persist_data(&state.data_path, &data).await?;

    Ok(Json(updated))
}

/// Form endpoint behind the grid checkboxes: flips the day between
/// "has records" and "has none", then returns to the index.
pub async fn toggle_day(
    State(state): State<AppState>,
    Path((id, day)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    let day: NaiveDate = day
        .parse()
        .map_err(|_| AppError::bad_request(format!("invalid date '{day}', expected YYYY-MM-DD")))?;

    let mut data = state.data.lock().await;
    {
        let habit = find_habit_mut(&mut data, &id)?;
        if habit.records.iter().any(|record| record.day == day) {
            habit.records.retain(|record| record.day != day);
        } else {
            habit.records.push(CompletionRecord { day, note: None });
        }
    }
    persist_data(&state.data_path, &data).await?;

    Ok(Redirect::to("/"))
}

pub async fn archive_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, AppError> {
    set_status(&state, &id, HabitStatus::Archived).await
}

pub async fn restore_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, AppError> {
    set_status(&state, &id, HabitStatus::Active).await
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, AppError> {
    set_status(&state, &id, HabitStatus::SoftDeleted).await
}

pub async fn reorder(
    State(state): State<AppState>,
    Json(payload): Json<OrderRequest>,
) -> Result<Json<Vec<Habit>>, AppError> {
    let mut data = state.data.lock().await;
    // Unlisted habits keep their relative order after the listed ones.
    data.habits.sort_by_key(|habit| {
        payload
            .ids
            .iter()
            .position(|id| *id == habit.id)
            .unwrap_or(usize::MAX)
    });
    persist_data(&state.data_path, &data).await?;

    Ok(Json(data.habits.clone()))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(build_stats(&data)))
}

pub async fn export(State(state): State<AppState>) -> Json<HabitData> {
    let data = state.data.lock().await;
    Json(data.clone())
}

pub async fn import(
    State(state): State<AppState>,
    Json(payload): Json<HabitData>,
) -> Result<Json<ImportSummary>, AppError> {
    let mut seen = HashSet::new();
    for habit in &payload.habits {
        if habit.id.trim().is_empty() {
            return Err(AppError::bad_request("every habit needs a non-empty id"));
        }
        if habit.name.trim().is_empty() {
            return Err(AppError::bad_request(format!(
                "habit '{}' has an empty name",
                habit.id
            )));
        }
        if !seen.insert(habit.id.as_str()) {
            return Err(AppError::bad_request(format!(
                "duplicate habit id '{}'",
                habit.id
            )));
        }
    }

    let mut data = state.data.lock().await;
    *data = payload;
    persist_data(&state.data_path, &data).await?;
    info!("imported {} habits", data.habits.len());

    Ok(Json(ImportSummary {
        habits: data.habits.len(),
    }))
}

async fn set_status(state: &AppState, id: &str, status: HabitStatus) -> Result<Json<Habit>, AppError> {
    let mut data = state.data.lock().await;
    let updated = {
        let habit = find_habit_mut(&mut data, id)?;
        habit.status = status;
        habit.clone()
    };
    persist_data(&state.data_path, &data).await?;

    Ok(Json(updated))
}

fn find_habit<'a>(data: &'a HabitData, id: &str) -> Result<&'a Habit, AppError> {
    data.habits
        .iter()
        .find(|habit| habit.id == id)
        .ok_or_else(|| AppError::not_found(format!("no habit with id '{id}'")))
}

fn find_habit_mut<'a>(data: &'a mut HabitData, id: &str) -> Result<&'a mut Habit, AppError> {
    data.habits
        .iter_mut()
        .find(|habit| habit.id == id)
        .ok_or_else(|| AppError::not_found(format!("no habit with id '{id}'")))
}

fn parse_status_filter(raw: Option<&str>) -> Result<Vec<HabitStatus>, AppError> {
    match raw.unwrap_or("active") {
        "active" => Ok(vec![HabitStatus::Active]),
        "archived" => Ok(vec![HabitStatus::Archived]),
        "deleted" => Ok(vec![HabitStatus::SoftDeleted]),
        "all" => Ok(vec![HabitStatus::Active, HabitStatus::Archived]),
        other => Err(AppError::bad_request(format!(
            "unknown status filter '{other}'"
        ))),
    }
}

fn parse_day(raw: Option<&str>, default: NaiveDate) -> Result<NaiveDate, AppError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| AppError::bad_request(format!("invalid date '{value}', expected YYYY-MM-DD"))),
    }
}

use crate::errors::AppError;
use crate::models::{
    Activity, Category, CompletionRequest, DayFlagRequest, DayKind, FitnessSnapshot, Habit,
    NewActivityRequest, NewCategoryRequest, NewHabitRequest, NewSessionRequest, Session,
    StatsSnapshot,
};
use crate::schedule::{date_key, is_completed, is_scheduled, parse_date_key};
use crate::state::AppState;
use crate::stats::{build_fitness, build_snapshot, validate_frequency};
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use tracing::error;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = Local::now().date_naive();
    let data = state.data.lock().await;
    let due: Vec<&Habit> = data
        .habits
        .iter()
        .filter(|habit| {
            habit.is_well_formed() && !habit.paused && is_scheduled(habit, today, today)
        })
        .collect();
    let completed = due.iter().filter(|habit| is_completed(habit, today)).count();
    Html(render_index(&date_key(today), completed, due.len()))
}

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<Habit>> {
    let data = state.data.lock().await;
    Json(data.habits.clone())
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabitRequest>,
) -> Result<Json<Habit>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("habit name must not be empty"));
    }
    if let Err(err) = validate_frequency(&payload.frequency) {
        return Err(AppError::bad_request(err.to_string()));
    }

    let today = Local::now().date_naive();
    let mut data = state.data.lock().await;
    let id = fresh_id(|candidate| data.habits.iter().any(|habit| habit.id == candidate));
    let habit = Habit {
        id,
        name: name.to_string(),
        category_id: payload.category_id,
        frequency: payload.frequency,
        paused: false,
        created_at: Some(date_key(today)),
        completions: BTreeMap::new(),
    };
    data.habits.push(habit.clone());

    persist_data(&state.data_path, &data).await?;
    Ok(Json(habit))
}

pub async fn complete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CompletionRequest>,
) -> Result<Json<Habit>, AppError> {
    let date = parse_request_date(payload.date.as_deref())?;
    let done = payload.done.unwrap_or(true);

    let mut data = state.data.lock().await;
    let habit = data
        .habits
        .iter_mut()
        .find(|habit| habit.id == id)
        .ok_or_else(|| AppError::not_found("no such habit"))?;
    if done {
        habit.completions.insert(date_key(date), true);
    } else {
        habit.completions.remove(&date_key(date));
    }
    let updated = habit.clone();

    persist_data(&state.data_path, &data).await?;
    Ok(Json(updated))
}

pub async fn pause_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, AppError> {
    let mut data = state.data.lock().await;
    let habit = data
        .habits
        .iter_mut()
        .find(|habit| habit.id == id)
        .ok_or_else(|| AppError::not_found("no such habit"))?;
    habit.paused = !habit.paused;
    let updated = habit.clone();

    persist_data(&state.data_path, &data).await?;
    Ok(Json(updated))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsSnapshot>, AppError> {
    let data = state.data.lock().await;
    match build_snapshot(&data) {
        Ok(snapshot) => Ok(Json(snapshot)),
        // All-or-nothing: no partial snapshot leaves the server.
        Err(err) => {
            error!("failed to build stats snapshot: {err}");
            Err(AppError::unavailable("statistics unavailable"))
        }
    }
}

pub async fn get_fitness(State(state): State<AppState>) -> Json<FitnessSnapshot> {
    let data = state.data.lock().await;
    Json(build_fitness(&data))
}

pub async fn list_activities(State(state): State<AppState>) -> Json<Vec<Activity>> {
    let data = state.data.lock().await;
    Json(data.activities.clone())
}

pub async fn create_activity(
    State(state): State<AppState>,
    Json(payload): Json<NewActivityRequest>,
) -> Result<Json<Activity>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("activity name must not be empty"));
    }

    let mut data = state.data.lock().await;
    let id = fresh_id(|candidate| data.activities.iter().any(|activity| activity.id == candidate));
    let activity = Activity {
        id,
        name: name.to_string(),
        category_id: payload.category_id,
        sessions: BTreeMap::new(),
    };
    data.activities.push(activity.clone());

    persist_data(&state.data_path, &data).await?;
    Ok(Json(activity))
}

pub async fn log_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NewSessionRequest>,
) -> Result<Json<Activity>, AppError> {
    let date = parse_request_date(payload.date.as_deref())?;

    let mut data = state.data.lock().await;
    let activity = data
        .activities
        .iter_mut()
        .find(|activity| activity.id == id)
        .ok_or_else(|| AppError::not_found("no such activity"))?;
    activity
        .sessions
        .entry(date_key(date))
        .or_default()
        .push(Session {
            duration: payload.duration,
            category_id: payload.category_id,
        });
    let updated = activity.clone();

    persist_data(&state.data_path, &data).await?;
    Ok(Json(updated))
}

pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    let data = state.data.lock().await;
    Json(data.categories.clone())
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<NewCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("category name must not be empty"));
    }

    let mut data = state.data.lock().await;
    let id = fresh_id(|candidate| data.categories.iter().any(|category| category.id == candidate));
    let category = Category {
        id,
        name: name.to_string(),
        color: payload.color,
    };
    data.categories.push(category.clone());

    persist_data(&state.data_path, &data).await?;
    Ok(Json(category))
}

pub async fn flag_day(
    State(state): State<AppState>,
    Json(payload): Json<DayFlagRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let date = parse_date_key(&payload.date)
        .ok_or_else(|| AppError::bad_request("date must be YYYY-MM-DD"))?;

    let mut data = state.data.lock().await;
    match payload.kind {
        DayKind::Holiday => data.holidays.insert(date_key(date)),
        DayKind::Rest => data.rest_days.insert(date_key(date)),
    };

    persist_data(&state.data_path, &data).await?;
    Ok(Json(serde_json::json!({ "date": date_key(date) })))
}

fn parse_request_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw {
        Some(raw) => {
            parse_date_key(raw).ok_or_else(|| AppError::bad_request("date must be YYYY-MM-DD"))
        }
        None => Ok(Local::now().date_naive()),
    }
}

/// Record identifiers carry a millisecond timestamp, which legacy habit
/// records use for start-date parsing; bump until unique if two records
/// land on the same millisecond.
fn fresh_id(taken: impl Fn(&str) -> bool) -> String {
    let mut millis = Local::now().timestamp_millis();
    loop {
        let candidate = millis.to_string();
        if !taken(&candidate) {
            return candidate;
        }
        millis += 1;
    }
}

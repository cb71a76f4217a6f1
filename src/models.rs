use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How often a habit is due. Weekly and monthly schedules may name specific
/// days; an empty list means every day in the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly {
        /// ISO weekday numbers, Monday = 1 through Sunday = 7.
        #[serde(default)]
        days: Vec<u32>,
    },
    Monthly {
        /// Days of the month, 1 through 31.
        #[serde(default)]
        days: Vec<u32>,
    },
    Yearly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    pub frequency: Frequency,
    #[serde(default)]
    pub paused: bool,
    /// ISO date the habit was created. Older data may omit this and embed a
    /// millisecond timestamp in the leading 13 characters of `id` instead.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Date key -> whether the habit was completed that day.
    #[serde(default)]
    pub completions: BTreeMap<String, bool>,
}

impl Habit {
    /// Entries missing an identifier or a display name are dropped before
    /// aggregation rather than surfaced as errors.
    pub fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDuration {
    pub value: f64,
    pub unit: DurationUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub duration: Option<SessionDuration>,
    #[serde(default)]
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    /// Date key -> sessions logged that day.
    #[serde(default)]
    pub sessions: BTreeMap<String, Vec<Session>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub categories: Vec<Category>,
    /// User-flagged days excluded from yearly accounting.
    #[serde(default)]
    pub holidays: BTreeSet<String>,
    /// User-flagged days excluded from fitness "due" accounting.
    #[serde(default)]
    pub rest_days: BTreeSet<String>,
}

impl AppData {
    pub fn is_holiday(&self, date_key: &str) -> bool {
        self.holidays.contains(date_key)
    }

    pub fn is_rest_day(&self, date_key: &str) -> bool {
        self.rest_days.contains(date_key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitStreak {
    pub id: String,
    pub name: String,
    pub current: u32,
    pub longest: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub name: String,
    pub color: String,
    pub habit_count: usize,
    pub mean_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyBucket {
    pub habits: Vec<String>,
    pub mean_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_habits: usize,
    pub active_habits: usize,
    pub paused_habits: usize,
    pub completed_today: usize,
    pub streaks: Vec<HabitStreak>,
    pub categories: BTreeMap<String, CategoryStats>,
    pub daily: FrequencyBucket,
    pub weekly: FrequencyBucket,
    pub monthly: FrequencyBucket,
    pub yearly: FrequencyBucket,
    pub longest_simultaneous_streak: u32,
    pub holidays_this_year: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitnessSnapshot {
    pub total_sessions: usize,
    pub categories_used: Vec<String>,
    pub total_minutes: f64,
    pub avg_minutes: f64,
    pub recent_sessions: usize,
    pub rest_days_last_30: u32,
    pub rest_day_pct: f64,
}

#[derive(Debug, Deserialize)]
pub struct NewHabitRequest {
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    pub frequency: Frequency,
}

#[derive(Debug, Deserialize)]
pub struct CompletionRequest {
    /// Defaults to today.
    #[serde(default)]
    pub date: Option<String>,
    /// Defaults to true; false clears a completion.
    #[serde(default)]
    pub done: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct NewActivityRequest {
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewSessionRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub duration: Option<SessionDuration>,
    #[serde(default)]
    pub category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewCategoryRequest {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    Holiday,
    Rest,
}

#[derive(Debug, Deserialize)]
pub struct DayFlagRequest {
    pub date: String,
    pub kind: DayKind,
}

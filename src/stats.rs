use crate::models::{
    AppData, CategoryStats, DurationUnit, FitnessSnapshot, Frequency, FrequencyBucket, Habit,
    HabitStreak, Session, StatsSnapshot,
};
use crate::schedule::{date_key, is_completed, is_scheduled, parse_date_key, start_date};
use crate::window::{
    is_within_monthly_window, is_within_weekly_window, month_range, shift_month, week_start,
};
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::warn;

pub const DAILY_RATE_WINDOW: u32 = 30;
pub const WEEKLY_RATE_WINDOW: u32 = 4;
pub const MONTHLY_RATE_WINDOW: u32 = 3;
pub const REST_DAY_WINDOW: u32 = 30;

/// Backward scans never look further than a year into the past.
const STREAK_SCAN_DAYS: i64 = 365;

/// A fault confined to a single habit. The aggregator folds these to a zero
/// contribution instead of aborting the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputationError {
    #[error("weekly schedule day {0} is out of range (1-7)")]
    BadWeekday(u32),
    #[error("monthly schedule day {0} is out of range (1-31)")]
    BadMonthDay(u32),
}

/// A fault that invalidates the whole snapshot; callers render a generic
/// error state rather than partial data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("duplicate category id {0}")]
    DuplicateCategory(String),
}

pub fn validate_frequency(frequency: &Frequency) -> Result<(), ComputationError> {
    match frequency {
        Frequency::Weekly { days } => match days.iter().find(|day| !(1..=7).contains(*day)) {
            Some(day) => Err(ComputationError::BadWeekday(*day)),
            None => Ok(()),
        },
        Frequency::Monthly { days } => match days.iter().find(|day| !(1..=31).contains(*day)) {
            Some(day) => Err(ComputationError::BadMonthDay(*day)),
            None => Ok(()),
        },
        Frequency::Daily | Frequency::Yearly => Ok(()),
    }
}

/// Percentage of scheduled periods in the lookback window that were
/// completed, in [0, 100]. The window is clipped so it never reaches before
/// the habit's start date, and only scheduled periods count toward the
/// denominator; a habit with nothing scheduled in the window rates 0.
pub fn completion_rate(
    habit: &Habit,
    window: u32,
    today: NaiveDate,
) -> Result<f64, ComputationError> {
    validate_frequency(&habit.frequency)?;
    let start = start_date(habit, today);
    let (scheduled, completed) = match habit.frequency {
        Frequency::Daily => daily_periods(habit, window, start, today),
        Frequency::Weekly { .. } => weekly_periods(habit, window, start, today),
        Frequency::Monthly { .. } => monthly_periods(habit, window, start, today),
        // Yearly habits have no windowed rate.
        Frequency::Yearly => (0, 0),
    };
    if scheduled == 0 {
        Ok(0.0)
    } else {
        Ok(completed as f64 / scheduled as f64 * 100.0)
    }
}

fn daily_periods(habit: &Habit, window: u32, start: NaiveDate, today: NaiveDate) -> (u32, u32) {
    let elapsed = (today - start).num_days() as u32 + 1;
    let window = window.min(elapsed);
    let mut scheduled = 0;
    let mut completed = 0;
    for k in 0..window {
        let date = today - Duration::days(k as i64);
        if date < start {
            break;
        }
        if is_scheduled(habit, date, today) {
            scheduled += 1;
            if is_completed(habit, date) {
                completed += 1;
            }
        }
    }
    (scheduled, completed)
}

fn weekly_periods(habit: &Habit, window: u32, start: NaiveDate, today: NaiveDate) -> (u32, u32) {
    let elapsed = ((week_start(today) - week_start(start)).num_days() / 7) as u32 + 1;
    let window = window.min(elapsed);
    let mut scheduled = 0;
    let mut completed = 0;
    for k in 0..window {
        let first = week_start(today - Duration::days(7 * k as i64));
        let days = (0..7).map(|offset| first + Duration::days(offset));
        if period_scheduled(habit, days, start, today) {
            scheduled += 1;
            if completed_within(habit, start, today, |date| {
                is_within_weekly_window(today, date, k)
            }) {
                completed += 1;
            }
        }
    }
    (scheduled, completed)
}

fn monthly_periods(habit: &Habit, window: u32, start: NaiveDate, today: NaiveDate) -> (u32, u32) {
    let elapsed = (month_index(today) - month_index(start)) as u32 + 1;
    let window = window.min(elapsed);
    let mut scheduled = 0;
    let mut completed = 0;
    for k in 0..window {
        let (year, month) = shift_month(today, k);
        let Some((first, last)) = month_range(year, month) else {
            continue;
        };
        let span = (last - first).num_days();
        let days = (0..=span).map(|offset| first + Duration::days(offset));
        if period_scheduled(habit, days, start, today) {
            scheduled += 1;
            if completed_within(habit, start, today, |date| {
                is_within_monthly_window(today, date, k)
            }) {
                completed += 1;
            }
        }
    }
    (scheduled, completed)
}

fn period_scheduled(
    habit: &Habit,
    mut days: impl Iterator<Item = NaiveDate>,
    start: NaiveDate,
    today: NaiveDate,
) -> bool {
    days.any(|date| date >= start && date <= today && is_scheduled(habit, date, today))
}

// A period counts as completed when any in-window day in it carries a
// positive log entry, not when every scheduled day does.
fn completed_within(
    habit: &Habit,
    start: NaiveDate,
    today: NaiveDate,
    in_window: impl Fn(NaiveDate) -> bool,
) -> bool {
    habit.completions.iter().any(|(key, &done)| {
        done && parse_date_key(key)
            .is_some_and(|date| date >= start && date <= today && in_window(date))
    })
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// Consecutive scheduled-and-completed days counting backward from today.
/// Unscheduled days are skipped; the first scheduled day without a
/// completion ends the streak. Bounded to a 365-day walk.
pub fn current_daily_streak(habit: &Habit, today: NaiveDate) -> u32 {
    let start = start_date(habit, today);
    let mut streak = 0;
    for k in 0..STREAK_SCAN_DAYS {
        let date = today - Duration::days(k);
        if date < start {
            break;
        }
        if !is_scheduled(habit, date, today) {
            continue;
        }
        if is_completed(habit, date) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Longest completed run over the last 366 days. Unscheduled days leave the
/// running count untouched; a scheduled miss resets it.
pub fn longest_daily_streak(habit: &Habit, today: NaiveDate) -> u32 {
    let mut best = 0;
    let mut run = 0;
    for k in (0..=STREAK_SCAN_DAYS).rev() {
        let date = today - Duration::days(k);
        if !is_scheduled(habit, date, today) {
            continue;
        }
        if is_completed(habit, date) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

/// Longest run of days, over the last 366, on which every habit scheduled
/// that day was completed. Days with nothing scheduled neither extend nor
/// reset the run; a single scheduled miss resets it.
pub fn longest_simultaneous_streak(habits: &[&Habit], today: NaiveDate) -> u32 {
    if habits.is_empty() {
        return 0;
    }
    let mut best = 0;
    let mut run = 0;
    for k in (0..=STREAK_SCAN_DAYS).rev() {
        let date = today - Duration::days(k);
        let mut any_scheduled = false;
        let mut missed = false;
        for habit in habits {
            if is_scheduled(habit, date, today) {
                any_scheduled = true;
                if !is_completed(habit, date) {
                    missed = true;
                    break;
                }
            }
        }
        if missed {
            run = 0;
        } else if any_scheduled {
            run += 1;
            best = best.max(run);
        }
    }
    best
}

#[derive(Default)]
struct BucketAcc {
    habits: Vec<String>,
    sum: f64,
    rated: usize,
}

impl BucketAcc {
    fn finish(self) -> FrequencyBucket {
        let mean_rate = if self.rated == 0 {
            0.0
        } else {
            self.sum / self.rated as f64
        };
        FrequencyBucket {
            habits: self.habits,
            mean_rate,
        }
    }
}

pub fn build_snapshot(data: &AppData) -> Result<StatsSnapshot, StatsError> {
    build_snapshot_at(Local::now().date_naive(), data)
}

/// Assemble the full habit-side snapshot. Recomputed from scratch on every
/// call; per-habit faults contribute zeros, anything else fails the whole
/// snapshot.
pub fn build_snapshot_at(today: NaiveDate, data: &AppData) -> Result<StatsSnapshot, StatsError> {
    let mut categories: BTreeMap<String, CategoryStats> = BTreeMap::new();
    for category in &data.categories {
        let stats = CategoryStats {
            name: category.name.clone(),
            color: category.color.clone(),
            habit_count: 0,
            mean_rate: 0.0,
        };
        if categories.insert(category.id.clone(), stats).is_some() {
            return Err(StatsError::DuplicateCategory(category.id.clone()));
        }
    }
    let mut category_sums: BTreeMap<String, f64> = BTreeMap::new();

    let habits: Vec<&Habit> = data
        .habits
        .iter()
        .filter(|habit| habit.is_well_formed())
        .collect();
    let paused_habits = habits.iter().filter(|habit| habit.paused).count();

    let mut daily = BucketAcc::default();
    let mut weekly = BucketAcc::default();
    let mut monthly = BucketAcc::default();
    let mut yearly = BucketAcc::default();
    let mut streaks = Vec::new();
    let mut completed_today = 0;
    let mut daily_active: Vec<&Habit> = Vec::new();

    for habit in &habits {
        let bucket = match habit.frequency {
            Frequency::Daily => &mut daily,
            Frequency::Weekly { .. } => &mut weekly,
            Frequency::Monthly { .. } => &mut monthly,
            Frequency::Yearly => &mut yearly,
        };
        bucket.habits.push(habit.name.clone());
        if habit.paused {
            continue;
        }

        // Isolate-and-default: a habit with a broken schedule rates 0 and
        // the rest of the snapshot still builds.
        let rate = match completion_rate(habit, rate_window(&habit.frequency), today) {
            Ok(rate) => rate,
            Err(err) => {
                warn!("skipping completion rate for habit {}: {err}", habit.id);
                0.0
            }
        };
        bucket.sum += rate;
        bucket.rated += 1;

        if let Some(category_id) = &habit.category_id {
            if let Some(entry) = categories.get_mut(category_id) {
                entry.habit_count += 1;
                *category_sums.entry(category_id.clone()).or_default() += rate;
            }
        }

        if matches!(habit.frequency, Frequency::Daily) {
            streaks.push(HabitStreak {
                id: habit.id.clone(),
                name: habit.name.clone(),
                current: current_daily_streak(habit, today),
                longest: longest_daily_streak(habit, today),
            });
            daily_active.push(habit);
        }

        if is_completed(habit, today) {
            completed_today += 1;
        }
    }

    for (id, stats) in categories.iter_mut() {
        if stats.habit_count > 0 {
            let sum = category_sums.get(id).copied().unwrap_or_default();
            stats.mean_rate = sum / stats.habit_count as f64;
        }
    }

    let longest_simultaneous = longest_simultaneous_streak(&daily_active, today);

    Ok(StatsSnapshot {
        total_habits: habits.len(),
        active_habits: habits.len() - paused_habits,
        paused_habits,
        completed_today,
        streaks,
        categories,
        daily: daily.finish(),
        weekly: weekly.finish(),
        monthly: monthly.finish(),
        yearly: yearly.finish(),
        longest_simultaneous_streak: longest_simultaneous,
        holidays_this_year: holidays_in_year(data, today),
    })
}

fn rate_window(frequency: &Frequency) -> u32 {
    match frequency {
        Frequency::Daily => DAILY_RATE_WINDOW,
        Frequency::Weekly { .. } => WEEKLY_RATE_WINDOW,
        Frequency::Monthly { .. } => MONTHLY_RATE_WINDOW,
        Frequency::Yearly => 0,
    }
}

fn holidays_in_year(data: &AppData, today: NaiveDate) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(today.year(), 1, 1) else {
        return 0;
    };
    let mut count = 0;
    let mut date = first;
    while date.year() == today.year() {
        if data.is_holiday(&date_key(date)) {
            count += 1;
        }
        date += Duration::days(1);
    }
    count
}

pub fn build_fitness(data: &AppData) -> FitnessSnapshot {
    build_fitness_at(Local::now().date_naive(), data)
}

/// Fitness-side aggregates over the activity session logs. Durations are
/// normalized to minutes; only externally flagged rest days count toward the
/// rest-day percentage.
pub fn build_fitness_at(today: NaiveDate, data: &AppData) -> FitnessSnapshot {
    let mut total_sessions = 0;
    let mut total_minutes = 0.0;
    let mut recent_sessions = 0;
    let mut categories_used: BTreeSet<String> = BTreeSet::new();

    for activity in &data.activities {
        for (key, sessions) in &activity.sessions {
            let age = parse_date_key(key).map(|date| (today - date).num_days());
            for session in sessions {
                total_sessions += 1;
                total_minutes += duration_minutes(session);
                let category = session
                    .category_id
                    .as_ref()
                    .or(activity.category_id.as_ref());
                if let Some(id) = category {
                    categories_used.insert(id.clone());
                }
                if matches!(age, Some(age) if (0..REST_DAY_WINDOW as i64).contains(&age)) {
                    recent_sessions += 1;
                }
            }
        }
    }

    let avg_minutes = if total_sessions == 0 {
        0.0
    } else {
        total_minutes / total_sessions as f64
    };

    let mut rest_days_last_30 = 0;
    for k in 0..REST_DAY_WINDOW {
        let date = today - Duration::days(k as i64);
        if data.is_rest_day(&date_key(date)) {
            rest_days_last_30 += 1;
        }
    }
    let rest_day_pct = f64::from(rest_days_last_30) / f64::from(REST_DAY_WINDOW) * 100.0;

    FitnessSnapshot {
        total_sessions,
        categories_used: categories_used.into_iter().collect(),
        total_minutes,
        avg_minutes,
        recent_sessions,
        rest_days_last_30,
        rest_day_pct,
    }
}

fn duration_minutes(session: &Session) -> f64 {
    let Some(duration) = &session.duration else {
        return 0.0;
    };
    if !duration.value.is_finite() || duration.value < 0.0 {
        return 0.0;
    }
    match duration.unit {
        DurationUnit::Seconds => duration.value / 60.0,
        DurationUnit::Minutes => duration.value,
        DurationUnit::Hours => duration.value * 60.0,
    }
}

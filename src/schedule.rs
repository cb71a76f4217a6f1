//! Per-record predicates: when a habit was due and when it was completed.

use crate::models::{Frequency, Habit};
use chrono::{DateTime, Datelike, NaiveDate};

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// The habit's effective start date, clamped to never lie after `today`.
///
/// Prefers the explicit `created_at` field; legacy records without it may
/// carry a millisecond timestamp in the leading 13 characters of the id.
/// Anything unparsable defaults to `today`.
pub fn start_date(habit: &Habit, today: NaiveDate) -> NaiveDate {
    habit
        .created_at
        .as_deref()
        .and_then(parse_date_key)
        .or_else(|| id_timestamp_date(&habit.id))
        .map_or(today, |date| date.min(today))
}

fn id_timestamp_date(id: &str) -> Option<NaiveDate> {
    let millis: i64 = id.get(..13)?.parse().ok()?;
    Some(DateTime::from_timestamp_millis(millis)?.date_naive())
}

/// Whether the habit was due on `date`. Never true before the habit's start
/// date. Out-of-range day numbers in a schedule simply never match here;
/// they are rejected as a typed fault by the rate calculator.
pub fn is_scheduled(habit: &Habit, date: NaiveDate, today: NaiveDate) -> bool {
    let start = start_date(habit, today);
    if date < start {
        return false;
    }
    match &habit.frequency {
        Frequency::Daily => true,
        Frequency::Weekly { days } => {
            days.is_empty() || days.contains(&date.weekday().number_from_monday())
        }
        Frequency::Monthly { days } => days.is_empty() || days.contains(&date.day()),
        Frequency::Yearly => date.month() == start.month() && date.day() == start.day(),
    }
}

/// Whether the completion log has a positive entry for `date`. Absent or
/// false entries read as not completed.
pub fn is_completed(habit: &Habit, date: NaiveDate) -> bool {
    habit.completions.get(&date_key(date)).copied().unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(id: &str, frequency: Frequency) -> Habit {
        Habit {
            id: id.to_string(),
            name: "test".to_string(),
            category_id: None,
            frequency,
            paused: false,
            created_at: None,
            completions: BTreeMap::new(),
        }
    }

    #[test]
    fn start_date_prefers_created_at() {
        let mut h = habit("h1", Frequency::Daily);
        h.created_at = Some("2025-06-01".to_string());
        assert_eq!(start_date(&h, date(2026, 1, 5)), date(2025, 6, 1));
    }

    #[test]
    fn start_date_falls_back_to_id_timestamp() {
        // 1750000000000 ms = 2025-06-15 UTC.
        let h = habit("1750000000000", Frequency::Daily);
        assert_eq!(start_date(&h, date(2026, 1, 5)), date(2025, 6, 15));
    }

    #[test]
    fn start_date_defaults_to_today_when_unparsable() {
        let today = date(2026, 1, 5);
        assert_eq!(start_date(&habit("h1", Frequency::Daily), today), today);
        let mut h = habit("h1", Frequency::Daily);
        h.created_at = Some("not-a-date".to_string());
        assert_eq!(start_date(&h, today), today);
    }

    #[test]
    fn start_date_never_lies_after_today() {
        let mut h = habit("h1", Frequency::Daily);
        h.created_at = Some("2030-01-01".to_string());
        let today = date(2026, 1, 5);
        assert_eq!(start_date(&h, today), today);
    }

    #[test]
    fn daily_habit_scheduled_every_day_since_start() {
        let mut h = habit("h1", Frequency::Daily);
        h.created_at = Some("2026-01-03".to_string());
        let today = date(2026, 1, 5);
        assert!(is_scheduled(&h, date(2026, 1, 3), today));
        assert!(is_scheduled(&h, date(2026, 1, 5), today));
        assert!(!is_scheduled(&h, date(2026, 1, 2), today));
    }

    #[test]
    fn weekly_habit_matches_listed_weekdays() {
        let mut h = habit("h1", Frequency::Weekly { days: vec![1, 3] });
        h.created_at = Some("2025-12-01".to_string());
        let today = date(2026, 1, 11);
        assert!(is_scheduled(&h, date(2026, 1, 5), today)); // Monday
        assert!(is_scheduled(&h, date(2026, 1, 7), today)); // Wednesday
        assert!(!is_scheduled(&h, date(2026, 1, 6), today)); // Tuesday
    }

    #[test]
    fn weekly_habit_with_no_days_is_daily() {
        let mut h = habit("h1", Frequency::Weekly { days: vec![] });
        h.created_at = Some("2025-12-01".to_string());
        let today = date(2026, 1, 11);
        assert!(is_scheduled(&h, date(2026, 1, 6), today));
    }

    #[test]
    fn monthly_habit_matches_listed_days() {
        let mut h = habit("h1", Frequency::Monthly { days: vec![1, 15] });
        h.created_at = Some("2025-01-01".to_string());
        let today = date(2026, 1, 20);
        assert!(is_scheduled(&h, date(2026, 1, 1), today));
        assert!(is_scheduled(&h, date(2026, 1, 15), today));
        assert!(!is_scheduled(&h, date(2026, 1, 14), today));
    }

    #[test]
    fn yearly_habit_scheduled_on_anniversary() {
        let mut h = habit("h1", Frequency::Yearly);
        h.created_at = Some("2024-03-10".to_string());
        let today = date(2026, 6, 1);
        assert!(is_scheduled(&h, date(2026, 3, 10), today));
        assert!(is_scheduled(&h, date(2025, 3, 10), today));
        assert!(!is_scheduled(&h, date(2026, 3, 11), today));
    }

    #[test]
    fn completion_reads_log_defensively() {
        let mut h = habit("h1", Frequency::Daily);
        h.completions.insert("2026-01-05".to_string(), true);
        h.completions.insert("2026-01-04".to_string(), false);
        assert!(is_completed(&h, date(2026, 1, 5)));
        assert!(!is_completed(&h, date(2026, 1, 4)));
        assert!(!is_completed(&h, date(2026, 1, 3)));
    }
}

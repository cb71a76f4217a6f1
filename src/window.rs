//! Classify dates into the k-th period (day, Mon-Sun week, calendar month)
//! counted backward from an injected "today".

use chrono::{Datelike, Duration, NaiveDate};

/// True iff `date` is exactly `k` calendar days before `today`.
pub fn is_within_daily_window(today: NaiveDate, date: NaiveDate, k: u32) -> bool {
    today - Duration::days(k as i64) == date
}

/// True iff `date` falls in the Monday-aligned week containing
/// `today - k * 7` days.
pub fn is_within_weekly_window(today: NaiveDate, date: NaiveDate, k: u32) -> bool {
    let start = week_start(today - Duration::days(7 * k as i64));
    date >= start && date <= start + Duration::days(6)
}

/// True iff `date` falls in calendar month `today.month - k`, rolling over
/// year boundaries.
pub fn is_within_monthly_window(today: NaiveDate, date: NaiveDate, k: u32) -> bool {
    let (year, month) = shift_month(today, k);
    date.year() == year && date.month() == month
}

/// The Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The (year, month) pair `k` calendar months before `date`'s month.
pub fn shift_month(date: NaiveDate, k: u32) -> (i32, u32) {
    let months = date.year() * 12 + date.month0() as i32 - k as i32;
    (months.div_euclid(12), months.rem_euclid(12) as u32 + 1)
}

/// First and last day of the given calendar month. None only for month
/// numbers outside 1..=12.
pub fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next - Duration::days(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_window_matches_exact_offset() {
        let today = date(2026, 1, 5);
        assert!(is_within_daily_window(today, today, 0));
        assert!(is_within_daily_window(today, date(2026, 1, 2), 3));
        assert!(!is_within_daily_window(today, date(2026, 1, 2), 2));
        assert!(!is_within_daily_window(today, date(2026, 1, 6), 0));
    }

    #[test]
    fn weekly_window_is_monday_aligned() {
        // 2026-01-07 is a Wednesday; its week is Mon 01-05 .. Sun 01-11.
        let today = date(2026, 1, 7);
        assert!(is_within_weekly_window(today, date(2026, 1, 5), 0));
        assert!(is_within_weekly_window(today, date(2026, 1, 11), 0));
        assert!(!is_within_weekly_window(today, date(2026, 1, 4), 0));
        // One week back: Mon 2025-12-29 .. Sun 2026-01-04.
        assert!(is_within_weekly_window(today, date(2025, 12, 29), 1));
        assert!(is_within_weekly_window(today, date(2026, 1, 4), 1));
        assert!(!is_within_weekly_window(today, date(2026, 1, 5), 1));
    }

    #[test]
    fn monthly_window_rolls_over_year_boundary() {
        let today = date(2026, 2, 15);
        assert!(is_within_monthly_window(today, date(2026, 2, 1), 0));
        assert!(is_within_monthly_window(today, date(2026, 1, 31), 1));
        assert!(is_within_monthly_window(today, date(2025, 12, 25), 2));
        assert!(is_within_monthly_window(today, date(2025, 11, 1), 3));
        assert!(!is_within_monthly_window(today, date(2025, 12, 25), 1));
    }

    #[test]
    fn shift_month_crosses_years() {
        let today = date(2026, 1, 10);
        assert_eq!(shift_month(today, 0), (2026, 1));
        assert_eq!(shift_month(today, 1), (2025, 12));
        assert_eq!(shift_month(today, 13), (2024, 12));
    }

    #[test]
    fn month_range_covers_whole_month() {
        assert_eq!(
            month_range(2026, 2),
            Some((date(2026, 2, 1), date(2026, 2, 28)))
        );
        assert_eq!(
            month_range(2024, 2),
            Some((date(2024, 2, 1), date(2024, 2, 29)))
        );
        assert_eq!(
            month_range(2025, 12),
            Some((date(2025, 12, 1), date(2025, 12, 31)))
        );
        assert_eq!(month_range(2025, 13), None);
    }

    #[test]
    fn week_start_returns_monday() {
        assert_eq!(week_start(date(2026, 1, 7)), date(2026, 1, 5));
        assert_eq!(week_start(date(2026, 1, 5)), date(2026, 1, 5));
        assert_eq!(week_start(date(2026, 1, 11)), date(2026, 1, 5));
    }
}

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

/// inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// period-over-period growth, reported to one decimal place
///
/// With nothing in the previous window the result is 100% if the current
/// window has anything at all, otherwise 0%.
pub fn growth_percent(current: u64, previous: u64) -> Decimal {
    if previous == 0 {
        return if current > 0 {
            Decimal::from(100)
        } else {
            Decimal::ZERO
        };
    }

    let delta = Decimal::from(current as i64 - previous as i64);
    (delta / Decimal::from(previous) * Decimal::from(100)).round_dp(1)
}

/// month-to-date window and its equivalent previous-month window
///
/// Current: the 1st of this month through today. Previous: the 1st of last
/// month through the same day-of-month, clamped to the last day of that
/// month when today's day-of-month does not exist in it (e.g. comparing
/// through May 31st against April uses April 30th).
pub fn month_to_date_windows(today: NaiveDate) -> (DateWindow, DateWindow) {
    let start_of_current = today.with_day(1).expect("day 1 always valid");
    let start_of_previous = start_of_current
        .checked_sub_months(Months::new(1))
        .expect("previous month in range");

    let previous_month_len = days_in_month(start_of_previous.year(), start_of_previous.month());
    let end_day = today.day().min(previous_month_len);
    let end_of_previous =
        NaiveDate::from_ymd_opt(start_of_previous.year(), start_of_previous.month(), end_day)
            .expect("clamped day is valid");

    (
        DateWindow {
            start: start_of_current,
            end: today,
        },
        DateWindow {
            start: start_of_previous,
            end: end_of_previous,
        },
    )
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_growth_with_empty_previous_window() {
        assert_eq!(growth_percent(5, 0), dec!(100));
        assert_eq!(growth_percent(0, 0), Decimal::ZERO);
    }

    #[test]
    fn test_growth_percentages() {
        assert_eq!(growth_percent(6, 4), dec!(50.0));
        assert_eq!(growth_percent(4, 6), dec!(-33.3));
        assert_eq!(growth_percent(3, 3), dec!(0.0));
    }

    #[test]
    fn test_windows_mid_month() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 18).unwrap();
        let (current, previous) = month_to_date_windows(today);

        assert_eq!(current.start, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(current.end, today);
        assert_eq!(previous.start, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(previous.end, NaiveDate::from_ymd_opt(2024, 5, 18).unwrap());
    }

    #[test]
    fn test_windows_clamp_to_shorter_previous_month() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        let (_, previous) = month_to_date_windows(today);
        assert_eq!(previous.end, NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());

        // march vs. leap february
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let (_, previous) = month_to_date_windows(today);
        assert_eq!(previous.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_windows_across_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let (_, previous) = month_to_date_windows(today);
        assert_eq!(previous.start, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(previous.end, NaiveDate::from_ymd_opt(2023, 12, 10).unwrap());
    }
}

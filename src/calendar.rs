use chrono::{Datelike, NaiveDate};

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// months since year 0, used for month-bucket arithmetic
pub fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

/// build a date, clamping the day to the last day of the month
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// shift `anchor` by `months` calendar months keeping its day-of-month,
/// clamped to month end (Jan 31 + 1 month = Feb 28/29)
pub fn add_months(anchor: NaiveDate, months: i64) -> Option<NaiveDate> {
    let target = month_index(anchor) + months;
    let year = i32::try_from(target.div_euclid(12)).ok()?;
    let month = target.rem_euclid(12) as u32 + 1;
    clamped_date(year, month, anchor.day())
}

/// shift `anchor` by `years` keeping month/day, Feb 29 clamps to Feb 28
pub fn add_years(anchor: NaiveDate, years: i64) -> Option<NaiveDate> {
    add_months(anchor, years.checked_mul(12)?)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let last = days_in_month(date.year(), date.month());
    date.with_day(last).unwrap_or(date)
}

/// first day of the calendar quarter containing `date`
pub fn first_of_quarter(date: NaiveDate) -> NaiveDate {
    let month = date.month0() / 3 * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
}

/// last day of the calendar quarter containing `date`
pub fn last_of_quarter(date: NaiveDate) -> NaiveDate {
    let month = date.month0() / 3 * 3 + 3;
    clamped_date(date.year(), month, 31).unwrap_or(date)
}

pub fn first_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

pub fn last_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        let jan31 = d(2023, 1, 31);
        assert_eq!(add_months(jan31, 1), Some(d(2023, 2, 28)));
        assert_eq!(add_months(jan31, 2), Some(d(2023, 3, 31)));
        assert_eq!(add_months(jan31, 3), Some(d(2023, 4, 30)));
        assert_eq!(add_months(d(2024, 1, 31), 1), Some(d(2024, 2, 29)));
    }

    #[test]
    fn test_add_months_crosses_years_both_ways() {
        assert_eq!(add_months(d(2023, 11, 15), 3), Some(d(2024, 2, 15)));
        assert_eq!(add_months(d(2024, 2, 15), -3), Some(d(2023, 11, 15)));
        assert_eq!(add_months(d(2024, 5, 5), 0), Some(d(2024, 5, 5)));
    }

    #[test]
    fn test_add_years_leap_day() {
        let leap = d(2024, 2, 29);
        assert_eq!(add_years(leap, 1), Some(d(2025, 2, 28)));
        assert_eq!(add_years(leap, 4), Some(d(2028, 2, 29)));
    }

    #[test]
    fn test_quarter_bounds() {
        assert_eq!(first_of_quarter(d(2024, 5, 20)), d(2024, 4, 1));
        assert_eq!(last_of_quarter(d(2024, 5, 20)), d(2024, 6, 30));
        assert_eq!(first_of_quarter(d(2024, 12, 31)), d(2024, 10, 1));
        assert_eq!(last_of_quarter(d(2024, 1, 1)), d(2024, 3, 31));
        assert_eq!(last_of_quarter(d(2024, 8, 1)), d(2024, 9, 30));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(first_of_month(d(2024, 2, 17)), d(2024, 2, 1));
        assert_eq!(last_of_month(d(2024, 2, 17)), d(2024, 2, 29));
        assert_eq!(last_of_month(d(2023, 2, 1)), d(2023, 2, 28));
    }
}

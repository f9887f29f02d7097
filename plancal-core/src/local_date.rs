//! Local calendar dates.
//!
//! Rows carry their day as a `YYYY-MM-DD` string. That string names a day on
//! the wall calendar, not an instant, so it is read component by component
//! into a [`NaiveDate`] and never converted through UTC. Timestamps such as
//! `2024-03-05T09:00:00Z` are keyed by their date part for the same reason.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{PlanCalError, PlanCalResult};

/// Parse `YYYY-MM-DD` (optionally followed by `T...` or ` ...`) as a local date.
pub fn parse_local_date(s: &str) -> PlanCalResult<NaiveDate> {
    date_key(s).ok_or_else(|| PlanCalError::InvalidDate(s.to_string()))
}

/// Like [`parse_local_date`], but `None` on anything malformed.
pub fn date_key(s: &str) -> Option<NaiveDate> {
    let date_part = s.trim().split(['T', ' ']).next()?;

    let mut parts = date_part.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    if !(year.bytes().chain(month.bytes()).chain(day.bytes())).all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_local_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The calendar date it is in `tz` at instant `now`.
pub fn today_in(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Today's date in `tz`.
pub fn today(tz: Tz) -> NaiveDate {
    today_in(tz, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_then_format_is_identity() {
        for s in ["2024-01-01", "2024-02-29", "1999-12-31", "2030-07-15"] {
            assert_eq!(format_local_date(parse_local_date(s).unwrap()), s);
        }
    }

    #[test]
    fn parse_ignores_time_suffix() {
        let d = parse_local_date("2024-03-05T23:30:00-11:00").unwrap();
        assert_eq!(format_local_date(d), "2024-03-05");

        let d = parse_local_date("2024-03-05 00:15").unwrap();
        assert_eq!(format_local_date(d), "2024-03-05");
    }

    #[test]
    fn parse_rejects_malformed() {
        for s in ["", "2024", "2024-1-05", "2024-02-30", "24-01-01", "2024-01-01-01", "abcd-ef-gh"] {
            assert!(parse_local_date(s).is_err(), "{s} should not parse");
        }
    }

    #[test]
    fn new_year_survives_extreme_offsets() {
        // Etc/GMT+12 is UTC-12; Kiritimati is UTC+14.
        let parsed = parse_local_date("2024-01-01").unwrap();
        for tz in [chrono_tz::Etc::GMTPlus12, chrono_tz::Pacific::Kiritimati, chrono_tz::UTC] {
            let midnight = tz.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            assert_eq!(midnight.date_naive(), parsed);
            assert_eq!(format_local_date(parsed), "2024-01-01");
        }
    }

    #[test]
    fn today_depends_on_zone_not_utc() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap();
        assert_eq!(format_local_date(today_in(chrono_tz::Etc::GMTPlus12, now)), "2023-12-31");
        assert_eq!(format_local_date(today_in(chrono_tz::Pacific::Kiritimati, now)), "2024-01-02");
        assert_eq!(format_local_date(today_in(chrono_tz::UTC, now)), "2024-01-01");
    }
}

//! Wall-clock helpers for session timing
//!
//! Session thresholds are same-day time-of-day values compared at
//! whole-second precision, so arrival instants and thresholds must be
//! produced by the same clock. All conversions here truncate sub-second
//! components.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Timelike};

/// Current wall-clock instant in the server's local timezone.
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Calendar date of the given instant.
pub fn date_of<Tz: TimeZone>(at: &DateTime<Tz>) -> NaiveDate {
    at.date_naive()
}

/// Time-of-day of the given instant, truncated to whole seconds.
pub fn time_of_day<Tz: TimeZone>(at: &DateTime<Tz>) -> NaiveTime {
    let t = at.time();
    t.with_nanosecond(0).unwrap_or(t)
}

/// Time-of-day `minutes` after the given instant, truncated to whole seconds.
///
/// Offsets that cross midnight wrap onto the next day's clock face, which
/// would make the resulting threshold compare below the start time.
/// Sessions are expected to start and end on the same calendar day.
pub fn time_of_day_after<Tz: TimeZone>(at: &DateTime<Tz>, minutes: i64) -> NaiveTime {
    time_of_day(&(at.clone() + Duration::minutes(minutes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, s).unwrap()
    }

    #[test]
    fn test_time_of_day_truncates_to_seconds() {
        let instant = at(9, 0, 0) + Duration::milliseconds(750);
        assert_eq!(
            time_of_day(&instant),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_time_of_day_after_adds_minutes() {
        let start = at(9, 0, 0);
        assert_eq!(
            time_of_day_after(&start, 15),
            NaiveTime::from_hms_opt(9, 15, 0).unwrap()
        );
        assert_eq!(
            time_of_day_after(&start, 60),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_time_of_day_after_zero_offset() {
        let start = at(13, 30, 5);
        assert_eq!(time_of_day_after(&start, 0), time_of_day(&start));
    }

    #[test]
    fn test_offset_across_midnight_wraps() {
        // Documented limitation: the wrapped threshold compares below the
        // start time, so such a session would be closed immediately.
        let start = at(23, 50, 0);
        let wrapped = time_of_day_after(&start, 20);
        assert_eq!(wrapped, NaiveTime::from_hms_opt(0, 10, 0).unwrap());
        assert!(wrapped < time_of_day(&start));
    }

    #[test]
    fn test_date_of() {
        let instant = at(9, 0, 0);
        assert_eq!(
            date_of(&instant),
            chrono::NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
    }
}

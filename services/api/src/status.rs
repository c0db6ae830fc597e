//! Attendance status resolution
//!
//! Pure decision logic converting an arrival time-of-day into a status
//! against a session's thresholds. Worst tier is checked first and the
//! first match wins; an unset threshold skips its tier, so a session
//! with no absent cutoff can never resolve to `Absent` here. Arrival and
//! thresholds must come from the same clock on the same calendar day.

use chrono::NaiveTime;

use crate::models::attendance::AttendanceStatus;

pub fn resolve_status(
    arrival: NaiveTime,
    late_after: Option<NaiveTime>,
    absent_after: Option<NaiveTime>,
) -> AttendanceStatus {
    if let Some(absent_after) = absent_after {
        if arrival > absent_after {
            return AttendanceStatus::Absent;
        }
    }

    if let Some(late_after) = late_after {
        if arrival > late_after {
            return AttendanceStatus::Late;
        }
    }

    AttendanceStatus::Present
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_nine_oclock_session() {
        // Session starts 09:00 with late_min=15, absent_min=60.
        let late = Some(t(9, 15, 0));
        let absent = Some(t(10, 0, 0));

        assert_eq!(resolve_status(t(9, 10, 0), late, absent), AttendanceStatus::Present);
        assert_eq!(resolve_status(t(9, 20, 0), late, absent), AttendanceStatus::Late);
        assert_eq!(resolve_status(t(10, 5, 0), late, absent), AttendanceStatus::Absent);
    }

    #[test]
    fn test_arrival_exactly_on_threshold_is_not_past_it() {
        let late = Some(t(9, 15, 0));
        let absent = Some(t(10, 0, 0));

        assert_eq!(resolve_status(t(9, 15, 0), late, absent), AttendanceStatus::Present);
        assert_eq!(resolve_status(t(10, 0, 0), late, absent), AttendanceStatus::Late);
    }

    #[test]
    fn test_unset_thresholds_skip_their_tier() {
        let arrival = t(23, 59, 59);

        assert_eq!(resolve_status(arrival, None, None), AttendanceStatus::Present);
        assert_eq!(
            resolve_status(arrival, Some(t(9, 15, 0)), None),
            AttendanceStatus::Late
        );
        assert_eq!(
            resolve_status(arrival, None, Some(t(10, 0, 0))),
            AttendanceStatus::Absent
        );
    }

    #[test]
    fn test_monotonic_in_arrival_time() {
        let late = Some(t(9, 15, 0));
        let absent = Some(t(10, 0, 0));

        fn rank(s: AttendanceStatus) -> u8 {
            match s {
                AttendanceStatus::Present => 0,
                AttendanceStatus::Late => 1,
                AttendanceStatus::Absent => 2,
            }
        }

        let mut last = 0;
        for minute in 0..12 * 60 {
            let arrival = t((minute / 60) as u32, (minute % 60) as u32, 0);
            let current = rank(resolve_status(arrival, late, absent));
            assert!(current >= last, "status regressed at {}", arrival);
            last = current;
        }
    }
}

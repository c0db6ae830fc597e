//! Live dashboard payloads

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

/// Live summary for polling dashboards: either an explicit idle shape or
/// the running session's metadata with per-status counts. A live session
/// with zero check-ins is the `Active` variant with zero counts, never
/// the idle shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LiveSummary {
    Idle {
        live: bool,
    },
    Active {
        live: bool,
        session_id: Uuid,
        subject: String,
        date: NaiveDate,
        start_time: NaiveTime,
        late_after: Option<NaiveTime>,
        absent_after: Option<NaiveTime>,
        present: i64,
        late: i64,
        absent: i64,
        not_yet_arrived: i64,
    },
}

impl LiveSummary {
    pub fn idle() -> Self {
        LiveSummary::Idle { live: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_shape() {
        let value = serde_json::to_value(LiveSummary::idle()).unwrap();
        assert_eq!(value, serde_json::json!({ "live": false }));
    }

    #[test]
    fn test_active_with_zero_arrivals_is_not_idle() {
        let summary = LiveSummary::Active {
            live: true,
            session_id: Uuid::nil(),
            subject: "Physics".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            late_after: Some(NaiveTime::from_hms_opt(9, 15, 0).unwrap()),
            absent_after: Some(NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
            present: 0,
            late: 0,
            absent: 0,
            not_yet_arrived: 30,
        };
        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(value["live"], serde_json::json!(true));
        assert_eq!(value["present"], serde_json::json!(0));
        assert!(value.get("not_yet_arrived").is_some());
    }
}

//! Session model and lifecycle payloads

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifecycle status. A session is created `live` and transitions
/// exactly once to `finished`, either by a manual end or by the sweeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Live,
    Finished,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Live => "live",
            SessionStatus::Finished => "finished",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "live" => Some(SessionStatus::Live),
            "finished" => Some(SessionStatus::Finished),
            _ => None,
        }
    }
}

/// Session entity
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub session_id: Uuid,
    pub subject_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub late_after: Option<NaiveTime>,
    pub absent_after: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub status: SessionStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Start-session request payload
#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionRequest {
    pub subject_id: Uuid,
    pub late_min: i64,
    pub absent_min: i64,
}

/// End-session response payload
#[derive(Debug, Clone, Serialize)]
pub struct EndSessionResponse {
    pub session_id: Uuid,
    pub end_time: NaiveTime,
}

/// Live-session query response: either the running session or an explicit
/// idle shape. The two are distinct so that "no live session" is never
/// mistaken for a live session with no data.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LiveSession {
    Idle {
        live: bool,
    },
    Active {
        live: bool,
        #[serde(flatten)]
        session: Session,
    },
}

impl LiveSession {
    pub fn idle() -> Self {
        LiveSession::Idle { live: false }
    }

    pub fn active(session: Session) -> Self {
        LiveSession::Active {
            live: true,
            session,
        }
    }
}

/// Live session joined with its subject name, for the dashboard
#[derive(Debug, Clone)]
pub struct LiveSessionInfo {
    pub session_id: Uuid,
    pub subject_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub late_after: Option<NaiveTime>,
    pub absent_after: Option<NaiveTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [SessionStatus::Live, SessionStatus::Finished] {
            assert_eq!(SessionStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::from_str("paused"), None);
    }

    #[test]
    fn test_live_session_idle_shape() {
        let value = serde_json::to_value(LiveSession::idle()).unwrap();
        assert_eq!(value, serde_json::json!({ "live": false }));
    }

    #[test]
    fn test_live_session_active_shape() {
        let session = Session {
            session_id: Uuid::nil(),
            subject_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            late_after: Some(NaiveTime::from_hms_opt(9, 15, 0).unwrap()),
            absent_after: Some(NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
            end_time: None,
            status: SessionStatus::Live,
            created_by: Uuid::nil(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(LiveSession::active(session)).unwrap();
        assert_eq!(value["live"], serde_json::json!(true));
        assert_eq!(value["status"], serde_json::json!("live"));
        assert_eq!(value["start_time"], serde_json::json!("09:00:00"));
    }
}

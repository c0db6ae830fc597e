//! Attendance record model and check-in payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resolved attendance status. Stored verbatim in the attendance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Absent => "Absent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Present" => Some(AttendanceStatus::Present),
            "Late" => Some(AttendanceStatus::Late),
            "Absent" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }
}

/// Attendance record entity. At most one exists per (student, session).
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub record_id: Uuid,
    pub student_id: Uuid,
    pub session_id: Uuid,
    pub status: AttendanceStatus,
    pub time_stamp: DateTime<Utc>,
    pub fingerprint_id: Option<i32>,
    pub device_id: Option<String>,
}

/// Check-in request, from the scanner (fingerprint path) or a direct
/// student check-in. Exactly one of `fingerprint_id` / `student_id` must
/// be present.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckInRequest {
    pub session_id: Uuid,
    pub fingerprint_id: Option<i32>,
    pub student_id: Option<Uuid>,
    pub device_id: Option<String>,
}

/// Check-in response payload
#[derive(Debug, Clone, Serialize)]
pub struct CheckInResponse {
    pub ok: bool,
    pub status: AttendanceStatus,
    /// True when a record already existed for this (student, session);
    /// the stored status is returned and no duplicate row is created.
    pub already_recorded: bool,
}

/// Per-student attendance row for a session, left-joined against the
/// student roster. Students with no record carry a null status.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRow {
    pub student_id: Uuid,
    pub student_code: String,
    pub full_name: String,
    pub status: Option<AttendanceStatus>,
    pub time_stamp: Option<DateTime<Utc>>,
    pub device_id: Option<String>,
}

/// Attendance counts grouped by resolved status
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusCounts {
    pub present: i64,
    pub late: i64,
    pub absent: i64,
}

impl StatusCounts {
    /// Number of students with any record for the session.
    pub fn checked_in(&self) -> i64 {
        self.present + self.late + self.absent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::Absent,
        ] {
            assert_eq!(AttendanceStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(AttendanceStatus::from_str("present"), None);
    }

    #[test]
    fn test_checked_in_sums_all_tiers() {
        let counts = StatusCounts {
            present: 12,
            late: 3,
            absent: 1,
        };
        assert_eq!(counts.checked_in(), 16);
    }
}

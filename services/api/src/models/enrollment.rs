//! Fingerprint enroll command model
//!
//! The scanner polls for the oldest pending command, captures the
//! fingerprint into the given slot, then reports completion. The command
//! lifecycle is `pending` -> `done`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollStatus {
    Pending,
    Done,
}

impl EnrollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollStatus::Pending => "pending",
            EnrollStatus::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(EnrollStatus::Pending),
            "done" => Some(EnrollStatus::Done),
            _ => None,
        }
    }
}

/// Enroll command entity
#[derive(Debug, Clone, Serialize)]
pub struct EnrollCommand {
    pub command_id: Uuid,
    pub student_id: Uuid,
    pub fingerprint_id: i32,
    pub status: EnrollStatus,
    pub created_at: DateTime<Utc>,
}

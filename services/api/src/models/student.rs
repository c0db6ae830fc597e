//! Student model and related payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Student entity
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub student_id: Uuid,
    pub user_id: Option<Uuid>,
    pub student_code: String,
    pub full_name: String,
    pub year_level: Option<String>,
    /// Slot on the fingerprint reader, assigned through the enroll flow
    pub fingerprint_id: Option<i32>,
}

/// New student creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub student_code: String,
    pub full_name: String,
    pub year_level: Option<String>,
}

/// Student update payload
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStudent {
    pub student_code: String,
    pub full_name: String,
    pub year_level: Option<String>,
}

//! Subject model and related payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject entity, owned by a teacher profile
#[derive(Debug, Clone, Serialize)]
pub struct Subject {
    pub subject_id: Uuid,
    pub subject_name: String,
    pub subject_code: Option<String>,
    pub teacher_id: Uuid,
}

/// New subject creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubject {
    pub subject_name: String,
    pub subject_code: Option<String>,
}

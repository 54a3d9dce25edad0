use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Roster entry. An employee with `terminated_at` set is no longer active;
/// `candidate_id` links back to the pipeline record it was converted from.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub candidate_id: Option<Uuid>,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: Option<String>,
    pub notes: Option<String>,
    pub birthday_at: Option<DateTime<Utc>>,
    pub hired_at: DateTime<Utc>,
    pub terminated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::candidate::Candidate;

/// Create/edit a meeting slot for a candidate. `participants` is free-form
/// text; it is split, shape-checked and deduplicated server-side.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MeetRequest {
    #[validate(length(min = 1, message = "summary must not be empty"))]
    pub summary: String,
    #[serde(default)]
    pub participants: String,
    pub interview_date: DateTime<Utc>,
    /// Edit flow only: `true` calls the webhook again and replaces the link,
    /// `false` keeps the existing link and changes the slot details locally.
    /// An explicit user choice, never inferred.
    #[serde(default)]
    pub regenerate_link: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetResponse {
    pub meet_link: Option<String>,
    pub candidate: Candidate,
}

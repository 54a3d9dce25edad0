use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use super::double_option;
use crate::models::candidate::{Interview, PipelineStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidateRequest {
    #[validate(length(min = 1, message = "fullName must not be empty"))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    pub notes: Option<String>,
}

/// PATCH body. Every field is optional; date and text fields that the client
/// may clear are double-optional so an explicit `null` erases the value.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidateRequest {
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    pub status: Option<PipelineStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub department: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub position: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub meet_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub polygraph_address: Option<Option<String>>,
    pub interviews: Option<Vec<Interview>>,
    #[serde(default, deserialize_with = "double_option")]
    pub polygraph_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub accepted_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub declined_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub canceled_at: Option<Option<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_null_and_value_are_distinguished() {
        let patch: UpdateCandidateRequest =
            serde_json::from_str(r#"{"polygraphAt": null, "notes": "hi"}"#).unwrap();
        assert_eq!(patch.polygraph_at, Some(None));
        assert_eq!(patch.notes, Some(Some("hi".to_string())));
        assert_eq!(patch.accepted_at, None);
    }

    #[test]
    fn status_parses_from_snake_case() {
        let patch: UpdateCandidateRequest =
            serde_json::from_str(r#"{"status": "not_held"}"#).unwrap();
        assert_eq!(patch.status, Some(PipelineStatus::NotHeld));
    }
}

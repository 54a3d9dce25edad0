use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::double_option;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, message = "fullName must not be empty"))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: Option<String>,
    pub notes: Option<String>,
    pub birthday_at: Option<DateTime<Utc>>,
    /// Defaults to "now" when omitted (direct hire entered on the day).
    pub hired_at: Option<DateTime<Utc>>,
    pub terminated_at: Option<DateTime<Utc>>,
    /// Set when the roster entry comes from a candidate conversion.
    pub candidate_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    pub department: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub position: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub birthday_at: Option<Option<DateTime<Utc>>>,
    pub hired_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub terminated_at: Option<Option<DateTime<Utc>>>,
}

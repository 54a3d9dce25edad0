use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::{Candidate, PipelineStatus};
use crate::services::metrics_service::{EventCounts, MonthHeadcount, StatusCounts};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// Inclusive range bounds, any date inside the first/last month.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct FreezeQuery {
    /// Any date inside the month to freeze; defaults to the previous month.
    pub month: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateWithBucket {
    #[serde(flatten)]
    pub candidate: Candidate,
    /// Snapshot bucket as of the requested cutoff, so dashboards never
    /// re-derive classification client-side.
    pub status_code: PipelineStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthEvents {
    pub month: NaiveDate,
    #[serde(flatten)]
    pub events: EventCounts,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMetricsResponse {
    pub as_of: DateTime<Utc>,
    pub totals: StatusCounts,
    pub total: i64,
    pub events_by_month: Vec<MonthEvents>,
    pub candidates: Vec<CandidateWithBucket>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRow {
    pub month: NaiveDate,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub total: i64,
    pub frozen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistMeetRow {
    pub candidate_id: Uuid,
    pub full_name: String,
    pub when: DateTime<Utc>,
    pub meet_link: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistPolygraphRow {
    pub candidate_id: Uuid,
    pub full_name: String,
    pub when: DateTime<Utc>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistResponse {
    pub meets: Vec<ChecklistMeetRow>,
    pub polygraphs: Vec<ChecklistPolygraphRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthHeadcountRow {
    pub month: NaiveDate,
    #[serde(flatten)]
    pub counts: MonthHeadcount,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenureBucketRow {
    pub bucket: &'static str,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeMetricsResponse {
    pub as_of: DateTime<Utc>,
    pub hired: i64,
    pub terminated: i64,
    pub net: i64,
    pub active: i64,
    pub avg_tenure_months: i64,
    pub median_tenure_months: i64,
    pub months: Vec<MonthHeadcountRow>,
    pub tenure_buckets: Vec<TenureBucketRow>,
}

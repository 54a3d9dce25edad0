use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Recruiting pipeline stage of a candidate. Stored in Postgres as the
/// `pipeline_status` enum and serialized in snake_case on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "pipeline_status", rename_all = "snake_case")]
pub enum PipelineStatus {
    #[default]
    NotHeld,
    Reserve,
    Success,
    Declined,
    Canceled,
}

impl PipelineStatus {
    pub const ALL: [PipelineStatus; 5] = [
        PipelineStatus::NotHeld,
        PipelineStatus::Reserve,
        PipelineStatus::Success,
        PipelineStatus::Declined,
        PipelineStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStatus::NotHeld => "not_held",
            PipelineStatus::Reserve => "reserve",
            PipelineStatus::Success => "success",
            PipelineStatus::Declined => "declined",
            PipelineStatus::Canceled => "canceled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PipelineStatus::NotHeld => "In progress",
            PipelineStatus::Reserve => "Polygraph",
            PipelineStatus::Success => "Accepted",
            PipelineStatus::Declined => "Declined",
            PipelineStatus::Canceled => "Candidate withdrew",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterviewSource {
    Jira,
    #[default]
    Crm,
}

fn default_duration_minutes() -> i32 {
    60
}

/// Interview slot embedded in a candidate record, most-recent-first.
///
/// Upstream clients historically sent the scheduled time under several field
/// names; all aliases normalize into `scheduled_at` here, at the
/// deserialization boundary, so nothing downstream re-derives fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(
        alias = "meetingAt",
        alias = "interviewAt",
        alias = "meetAt",
        alias = "googleMeetAt"
    )]
    pub scheduled_at: DateTime<Utc>,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: i32,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub status: PipelineStatus,
    #[serde(default)]
    pub source: InterviewSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meet_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub status: PipelineStatus,
    pub department: Option<String>,
    pub position: Option<String>,
    pub meet_link: Option<String>,
    pub polygraph_address: Option<String>,
    pub interviews: Json<Vec<Interview>>,
    pub polygraph_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    /// Event timestamp recorded when the pipeline moved into `status`.
    /// `not_held` records nothing.
    pub fn event_at(&self, status: PipelineStatus) -> Option<DateTime<Utc>> {
        match status {
            PipelineStatus::NotHeld => None,
            PipelineStatus::Reserve => self.polygraph_at,
            PipelineStatus::Success => self.accepted_at,
            PipelineStatus::Declined => self.declined_at,
            PipelineStatus::Canceled => self.canceled_at,
        }
    }

    /// Stamps the event timestamp mapped to `next` and switches the status.
    ///
    /// Earlier event timestamps stay in place: they form an append-only trail
    /// of states the candidate passed through. The snapshot classifier owns
    /// the precedence rule resolving records that carry several of them.
    pub fn apply_status(&mut self, next: PipelineStatus, now: DateTime<Utc>) {
        match next {
            PipelineStatus::NotHeld => {}
            PipelineStatus::Reserve => self.polygraph_at = Some(now),
            PipelineStatus::Success => self.accepted_at = Some(now),
            PipelineStatus::Declined => self.declined_at = Some(now),
            PipelineStatus::Canceled => self.canceled_at = Some(now),
        }
        self.status = next;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn blank_candidate() -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            full_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: None,
            notes: None,
            status: PipelineStatus::NotHeld,
            department: None,
            position: None,
            meet_link: None,
            polygraph_address: None,
            interviews: Json(vec![]),
            polygraph_at: None,
            accepted_at: None,
            declined_at: None,
            canceled_at: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn status_change_stamps_mapped_field() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let mut c = blank_candidate();

        c.apply_status(PipelineStatus::Reserve, now);
        assert_eq!(c.status, PipelineStatus::Reserve);
        assert_eq!(c.polygraph_at, Some(now));
        assert_eq!(c.accepted_at, None);
    }

    #[test]
    fn not_held_stamps_nothing_and_clears_nothing() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        let mut c = blank_candidate();

        c.apply_status(PipelineStatus::Declined, now);
        c.apply_status(PipelineStatus::NotHeld, later);

        assert_eq!(c.status, PipelineStatus::NotHeld);
        assert_eq!(c.declined_at, Some(now));
    }

    #[test]
    fn cycling_keeps_earlier_events() {
        let t1 = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut c = blank_candidate();

        c.apply_status(PipelineStatus::Declined, t1);
        c.apply_status(PipelineStatus::Reserve, t2);

        assert_eq!(c.status, PipelineStatus::Reserve);
        assert_eq!(c.declined_at, Some(t1));
        assert_eq!(c.polygraph_at, Some(t2));
    }

    #[test]
    fn interview_aliases_normalize_to_scheduled_at() {
        let raw = serde_json::json!({
            "meetingAt": "2024-05-10T09:30:00Z",
            "participants": ["a@b.co"],
        });
        let iv: Interview = serde_json::from_value(raw).unwrap();
        assert_eq!(
            iv.scheduled_at,
            Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap()
        );
        assert_eq!(iv.status, PipelineStatus::NotHeld);
        assert_eq!(iv.duration_minutes, 60);
        assert_eq!(iv.source, InterviewSource::Crm);
    }
}

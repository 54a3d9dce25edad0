//! The single authoritative classifier for pipeline and roster metrics.
//!
//! Every dashboard-facing aggregation (status snapshot, per-month event
//! counts, headcount series, tenure distribution) goes through the pure
//! functions in this module; routes and the snapshot freezer never
//! re-implement any of it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::candidate::{Candidate, PipelineStatus};
use crate::models::employee::Employee;
use crate::utils::time;

/// Per-status bucket counts for a point-in-time snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub not_held: i64,
    pub reserve: i64,
    pub success: i64,
    pub declined: i64,
    pub canceled: i64,
}

impl StatusCounts {
    pub fn bump(&mut self, status: PipelineStatus) {
        match status {
            PipelineStatus::NotHeld => self.not_held += 1,
            PipelineStatus::Reserve => self.reserve += 1,
            PipelineStatus::Success => self.success += 1,
            PipelineStatus::Declined => self.declined += 1,
            PipelineStatus::Canceled => self.canceled += 1,
        }
    }

    pub fn total(&self) -> i64 {
        self.not_held + self.reserve + self.success + self.declined + self.canceled
    }
}

/// How many of each recorded event fell inside one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub created: i64,
    pub polygraph: i64,
    pub accepted: i64,
    pub declined: i64,
    pub canceled: i64,
}

/// Point-in-time classification of one candidate as of `cutoff` (inclusive).
///
/// A candidate may carry several event timestamps because transitions never
/// clear old ones; the fixed precedence order below (most final outcome
/// first) resolves that, regardless of which event is chronologically later.
pub fn classify_at(candidate: &Candidate, cutoff: DateTime<Utc>) -> PipelineStatus {
    let qualifies = |ts: Option<DateTime<Utc>>| ts.is_some_and(|t| t <= cutoff);

    if qualifies(candidate.accepted_at) {
        PipelineStatus::Success
    } else if qualifies(candidate.declined_at) {
        PipelineStatus::Declined
    } else if qualifies(candidate.canceled_at) {
        PipelineStatus::Canceled
    } else if qualifies(candidate.polygraph_at) {
        PipelineStatus::Reserve
    } else {
        PipelineStatus::NotHeld
    }
}

/// Snapshot bucket counts over a collection. Candidates created after the
/// cutoff did not exist yet and are excluded entirely.
pub fn snapshot_counts<'a, I>(candidates: I, cutoff: DateTime<Utc>) -> StatusCounts
where
    I: IntoIterator<Item = &'a Candidate>,
{
    let mut counts = StatusCounts::default();
    for c in candidates {
        if c.created_at > cutoff {
            continue;
        }
        counts.bump(classify_at(c, cutoff));
    }
    counts
}

/// Counts how many of each specific event timestamp fell within `month`.
pub fn event_counts_in_month<'a, I>(candidates: I, month: NaiveDate) -> EventCounts
where
    I: IntoIterator<Item = &'a Candidate>,
{
    let mut counts = EventCounts::default();
    for c in candidates {
        if time::in_month(c.created_at, month) {
            counts.created += 1;
        }
        if c.polygraph_at.is_some_and(|t| time::in_month(t, month)) {
            counts.polygraph += 1;
        }
        if c.accepted_at.is_some_and(|t| time::in_month(t, month)) {
            counts.accepted += 1;
        }
        if c.declined_at.is_some_and(|t| time::in_month(t, month)) {
            counts.declined += 1;
        }
        if c.canceled_at.is_some_and(|t| time::in_month(t, month)) {
            counts.canceled += 1;
        }
    }
    counts
}

/// An employee is active at `at` when hired on or before it and not
/// terminated on or before it.
pub fn active_on(employee: &Employee, at: DateTime<Utc>) -> bool {
    employee.hired_at <= at && !employee.terminated_at.is_some_and(|t| t <= at)
}

/// Tenure in fractional months as of `as_of`, capped at the termination date
/// when one exists. Zero for employees hired after `as_of`.
pub fn tenure_months(employee: &Employee, as_of: DateTime<Utc>) -> f64 {
    if employee.hired_at > as_of {
        return 0.0;
    }
    let end = match employee.terminated_at {
        Some(t) if t < as_of => t,
        _ => as_of,
    };
    let days = (end - employee.hired_at).num_seconds() as f64 / 86_400.0;
    (days / 30.44).max(0.0)
}

pub const TENURE_BUCKETS: [(&str, f64, f64); 7] = [
    ("<3m", 0.0, 3.0),
    ("3-6m", 3.0, 6.0),
    ("6-12m", 6.0, 12.0),
    ("1-2y", 12.0, 24.0),
    ("2-3y", 24.0, 36.0),
    ("3-5y", 36.0, 60.0),
    ("5y+", 60.0, f64::INFINITY),
];

pub fn tenure_bucket(months: f64) -> &'static str {
    TENURE_BUCKETS
        .iter()
        .find(|(_, min, max)| months >= *min && months < *max)
        .map(|(key, _, _)| *key)
        .unwrap_or(TENURE_BUCKETS[TENURE_BUCKETS.len() - 1].0)
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MonthHeadcount {
    pub hired: i64,
    pub terminated: i64,
    pub headcount: i64,
}

/// Hires/terminations landing in `month` plus active headcount at its end.
pub fn headcount_for_month<'a, I>(employees: I, month: NaiveDate) -> MonthHeadcount
where
    I: IntoIterator<Item = &'a Employee>,
{
    let end = time::month_end(month);
    let mut row = MonthHeadcount::default();
    for e in employees {
        if time::in_month(e.hired_at, month) {
            row.hired += 1;
        }
        if e.terminated_at.is_some_and(|t| time::in_month(t, month)) {
            row.terminated += 1;
        }
        if active_on(e, end) {
            row.headcount += 1;
        }
    }
    row
}

/// Average and median tenure in whole months over employees active at `at`.
pub fn tenure_summary(employees: &[Employee], at: DateTime<Utc>) -> (i64, i64) {
    let mut tenures: Vec<f64> = employees
        .iter()
        .filter(|e| active_on(e, at))
        .map(|e| tenure_months(e, at))
        .collect();
    if tenures.is_empty() {
        return (0, 0);
    }
    tenures.sort_by(|a, b| a.partial_cmp(b).expect("tenure is never NaN"));
    let avg = tenures.iter().sum::<f64>() / tenures.len() as f64;
    let mid = tenures.len() / 2;
    let med = if tenures.len() % 2 == 1 {
        tenures[mid]
    } else {
        (tenures[mid - 1] + tenures[mid]) / 2.0
    };
    (avg.round() as i64, med.round() as i64)
}

#[derive(Clone)]
pub struct MetricsService {
    pool: PgPool,
}

impl MetricsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn load_candidates(&self) -> Result<Vec<Candidate>> {
        let candidates = sqlx::query_as::<_, Candidate>(
            "SELECT * FROM candidates ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(candidates)
    }

    pub async fn load_employees(&self) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees ORDER BY hired_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn candidate() -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            full_name: "Test".into(),
            email: "t@example.com".into(),
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
            created_at: ts(2024, 1, 1, 0, 0, 0),
            updated_at: ts(2024, 1, 1, 0, 0, 0),
        }
    }

    fn employee(hired: DateTime<Utc>, terminated: Option<DateTime<Utc>>) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            candidate_id: None,
            full_name: "Emp".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            phone: None,
            department: "Tech".into(),
            position: None,
            notes: None,
            birthday_at: None,
            hired_at: hired,
            terminated_at: terminated,
            created_at: hired,
            updated_at: hired,
        }
    }

    #[test]
    fn each_lone_event_maps_to_its_bucket() {
        let cutoff = ts(2024, 6, 30, 23, 59, 59);
        let when = ts(2024, 6, 10, 12, 0, 0);

        let cases: [(fn(&mut Candidate, DateTime<Utc>), PipelineStatus); 5] = [
            (|_, _| {}, PipelineStatus::NotHeld),
            (|c, t| c.polygraph_at = Some(t), PipelineStatus::Reserve),
            (|c, t| c.accepted_at = Some(t), PipelineStatus::Success),
            (|c, t| c.declined_at = Some(t), PipelineStatus::Declined),
            (|c, t| c.canceled_at = Some(t), PipelineStatus::Canceled),
        ];
        for (setter, expected) in cases {
            let mut c = candidate();
            setter(&mut c, when);
            assert_eq!(classify_at(&c, cutoff), expected);
        }
    }

    #[test]
    fn accepted_wins_over_declined_regardless_of_order() {
        let cutoff = ts(2024, 6, 30, 23, 59, 59);

        // declined happened after acceptance, precedence still picks success
        let mut c = candidate();
        c.accepted_at = Some(ts(2024, 6, 1, 9, 0, 0));
        c.declined_at = Some(ts(2024, 6, 20, 9, 0, 0));
        assert_eq!(classify_at(&c, cutoff), PipelineStatus::Success);

        let mut c = candidate();
        c.declined_at = Some(ts(2024, 6, 1, 9, 0, 0));
        c.accepted_at = Some(ts(2024, 6, 20, 9, 0, 0));
        assert_eq!(classify_at(&c, cutoff), PipelineStatus::Success);
    }

    #[test]
    fn event_after_cutoff_does_not_qualify() {
        // reserve candidate, polygraph on 2024-03-15
        let mut c = candidate();
        c.status = PipelineStatus::Reserve;
        c.polygraph_at = Some(ts(2024, 3, 15, 10, 0, 0));

        assert_eq!(
            classify_at(&c, ts(2024, 3, 31, 23, 59, 59)),
            PipelineStatus::Reserve
        );
        assert_eq!(
            classify_at(&c, ts(2024, 2, 28, 23, 59, 59)),
            PipelineStatus::NotHeld
        );
    }

    #[test]
    fn timestamp_on_boundary_counts_as_in_range() {
        let mut c = candidate();
        c.accepted_at = Some(ts(2024, 3, 31, 23, 59, 59));
        assert_eq!(
            classify_at(&c, ts(2024, 3, 31, 23, 59, 59)),
            PipelineStatus::Success
        );

        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let counts = event_counts_in_month(std::iter::once(&c), march);
        assert_eq!(counts.accepted, 1);

        let april = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let counts = event_counts_in_month(std::iter::once(&c), april);
        assert_eq!(counts.accepted, 0);
    }

    #[test]
    fn snapshot_excludes_candidates_created_after_cutoff() {
        let mut early = candidate();
        early.accepted_at = Some(ts(2024, 2, 1, 0, 0, 0));
        let mut late = candidate();
        late.created_at = ts(2024, 5, 1, 0, 0, 0);

        let set = vec![early, late];
        let counts = snapshot_counts(set.iter(), ts(2024, 3, 31, 23, 59, 59));
        assert_eq!(counts.success, 1);
        assert_eq!(counts.total(), 1);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let mut a = candidate();
        a.polygraph_at = Some(ts(2024, 3, 2, 8, 0, 0));
        let mut b = candidate();
        b.declined_at = Some(ts(2024, 3, 20, 8, 0, 0));
        let set = vec![a, b];
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let first = event_counts_in_month(set.iter(), march);
        let second = event_counts_in_month(set.iter(), march);
        assert_eq!(first, second);

        let cutoff = ts(2024, 3, 31, 23, 59, 59);
        assert_eq!(snapshot_counts(set.iter(), cutoff), snapshot_counts(set.iter(), cutoff));
    }

    #[test]
    fn headcount_and_activity() {
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let staff = vec![
            employee(ts(2023, 1, 10, 0, 0, 0), None),
            employee(ts(2024, 3, 5, 0, 0, 0), None),
            employee(ts(2023, 6, 1, 0, 0, 0), Some(ts(2024, 3, 20, 0, 0, 0))),
            employee(ts(2024, 4, 1, 0, 0, 0), None),
        ];

        let row = headcount_for_month(staff.iter(), march);
        assert_eq!(row.hired, 1);
        assert_eq!(row.terminated, 1);
        // veteran + march hire are active at month end; terminated and
        // april hire are not
        assert_eq!(row.headcount, 2);
    }

    #[test]
    fn tenure_caps_at_termination() {
        let e = employee(ts(2023, 1, 1, 0, 0, 0), Some(ts(2023, 7, 1, 0, 0, 0)));
        let months = tenure_months(&e, ts(2024, 6, 1, 0, 0, 0));
        assert!((5.0..7.0).contains(&months), "got {}", months);
        assert_eq!(tenure_bucket(months), "3-6m");
    }

    #[test]
    fn tenure_summary_median_of_even_set() {
        let at = ts(2024, 6, 1, 0, 0, 0);
        let staff = vec![
            employee(ts(2024, 5, 1, 0, 0, 0), None),  // ~1 month
            employee(ts(2024, 3, 1, 0, 0, 0), None),  // ~3 months
            employee(ts(2023, 6, 1, 0, 0, 0), None),  // ~12 months
            employee(ts(2022, 6, 1, 0, 0, 0), None),  // ~24 months
        ];
        let (avg, med) = tenure_summary(&staff, at);
        assert!(avg >= 9 && avg <= 11, "avg {}", avg);
        assert!(med >= 7 && med <= 8, "med {}", med);
    }
}

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::dto::metrics_dto::{
    CandidateMetricsResponse, CandidateWithBucket, ChecklistMeetRow, ChecklistPolygraphRow,
    ChecklistResponse, EmployeeMetricsResponse, FreezeQuery, MonthEvents, MonthHeadcountRow,
    RangeQuery, SnapshotRow, TenureBucketRow,
};
use crate::error::{Error, Result};
use crate::models::candidate::PipelineStatus;
use crate::services::metrics_service::{
    active_on, classify_at, event_counts_in_month, headcount_for_month, snapshot_counts,
    tenure_bucket, tenure_months, tenure_summary, TENURE_BUCKETS,
};
use crate::services::snapshot_service::SnapshotService;
use crate::utils::time;
use crate::AppState;

fn year_start(month: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(month.year(), 1, 1).expect("january 1st always valid")
}

/// Cutoff instant for a range's `to` date: the last instant of that month,
/// but never in the future.
fn cutoff_for(to: Option<NaiveDate>, now: DateTime<Utc>) -> DateTime<Utc> {
    match to {
        Some(date) => time::month_end(date).min(now),
        None => now,
    }
}

/// Pipeline dashboard payload: bucket totals as of the cutoff, per-month
/// event counts over the range and the classified candidate list.
pub async fn candidate_metrics(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<CandidateMetricsResponse>> {
    let now = time::now();
    let as_of = cutoff_for(range.to, now);
    let to_month = time::month_of(as_of);
    let from = range.from.unwrap_or_else(|| year_start(to_month));

    let candidates = state.metrics_service.load_candidates().await?;

    let totals = snapshot_counts(candidates.iter(), as_of);
    let events_by_month = time::months_between(from, to_month)
        .into_iter()
        .map(|month| MonthEvents {
            month,
            events: event_counts_in_month(candidates.iter(), month),
        })
        .collect();
    let classified = candidates
        .into_iter()
        .filter(|c| c.created_at <= as_of)
        .map(|c| {
            let status_code = classify_at(&c, as_of);
            CandidateWithBucket {
                candidate: c,
                status_code,
            }
        })
        .collect();

    Ok(Json(CandidateMetricsResponse {
        as_of,
        totals,
        total: totals.total(),
        events_by_month,
        candidates: classified,
    }))
}

pub async fn pipeline_snapshots(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<SnapshotRow>>> {
    let to = range.to.unwrap_or_else(|| time::month_of(time::now()));
    let from = range.from.unwrap_or_else(|| year_start(to));
    let rows = state.snapshot_service.list_range(from, to).await?;
    Ok(Json(rows))
}

pub async fn freeze_snapshot(
    State(state): State<AppState>,
    Query(query): Query<FreezeQuery>,
) -> Result<Json<SnapshotRow>> {
    let now = time::now();
    let month = query
        .month
        .unwrap_or_else(|| SnapshotService::previous_month(now));
    if time::month_end(month) > now {
        return Err(Error::BadRequest(
            "Cannot freeze a month that has not ended yet".to_string(),
        ));
    }
    let row = state.snapshot_service.freeze_month(month).await?;
    Ok(Json(row))
}

/// Operational checklist: next upcoming meeting per candidate plus current
/// polygraph appointments, both soonest first.
pub async fn checklist(State(state): State<AppState>) -> Result<Json<ChecklistResponse>> {
    let now = time::now();
    let candidates = state.metrics_service.load_candidates().await?;

    let mut meets = Vec::new();
    let mut polygraphs = Vec::new();
    for c in &candidates {
        let upcoming = c
            .interviews
            .0
            .iter()
            .filter(|iv| iv.scheduled_at >= now)
            .min_by_key(|iv| iv.scheduled_at);
        if let Some(slot) = upcoming {
            meets.push(ChecklistMeetRow {
                candidate_id: c.id,
                full_name: c.full_name.clone(),
                when: slot.scheduled_at,
                meet_link: slot.meet_link.clone().or_else(|| c.meet_link.clone()),
            });
        }

        if c.status == PipelineStatus::Reserve {
            if let Some(when) = c.event_at(PipelineStatus::Reserve) {
                polygraphs.push(ChecklistPolygraphRow {
                    candidate_id: c.id,
                    full_name: c.full_name.clone(),
                    when,
                    address: c.polygraph_address.clone(),
                });
            }
        }
    }
    meets.sort_by_key(|row| row.when);
    polygraphs.sort_by_key(|row| row.when);

    Ok(Json(ChecklistResponse { meets, polygraphs }))
}

/// Roster dashboard payload: headcount series over the range, the focus
/// month's hire/termination KPIs and the tenure distribution at the cutoff.
pub async fn employee_metrics(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<EmployeeMetricsResponse>> {
    let now = time::now();
    let as_of = cutoff_for(range.to, now);
    let focus = time::month_of(as_of);
    let from = range.from.unwrap_or_else(|| year_start(focus));

    let employees = state.metrics_service.load_employees().await?;

    let months: Vec<MonthHeadcountRow> = time::months_between(from, focus)
        .into_iter()
        .map(|month| MonthHeadcountRow {
            month,
            counts: headcount_for_month(employees.iter(), month),
        })
        .collect();
    let focus_row = months.last().map(|row| row.counts).unwrap_or_default();

    let (avg_tenure_months, median_tenure_months) = tenure_summary(&employees, as_of);

    let mut tenure_buckets: Vec<TenureBucketRow> = TENURE_BUCKETS
        .iter()
        .map(|&(bucket, _, _)| TenureBucketRow { bucket, count: 0 })
        .collect();
    for e in employees.iter().filter(|e| active_on(e, as_of)) {
        let key = tenure_bucket(tenure_months(e, as_of));
        if let Some(row) = tenure_buckets.iter_mut().find(|b| b.bucket == key) {
            row.count += 1;
        }
    }

    Ok(Json(EmployeeMetricsResponse {
        as_of,
        hired: focus_row.hired,
        terminated: focus_row.terminated,
        net: focus_row.hired - focus_row.terminated,
        active: focus_row.headcount,
        avg_tenure_months,
        median_tenure_months,
        months,
        tenure_buckets,
    }))
}

use anyhow::Result;
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::dto::metrics_dto::SnapshotRow;
use crate::models::candidate::Candidate;
use crate::services::metrics_service::{snapshot_counts, StatusCounts};
use crate::utils::time;

#[derive(Debug, FromRow)]
struct StoredSnapshot {
    month: NaiveDate,
    not_held: i64,
    reserve: i64,
    success: i64,
    declined: i64,
    canceled: i64,
    total: i64,
    frozen_at: DateTime<Utc>,
}

/// Persists end-of-month pipeline snapshots. A frozen month keeps the counts
/// as they were at freeze time even if candidates are later edited or
/// deleted; unfrozen months are classified live from current data.
#[derive(Clone)]
pub struct SnapshotService {
    pool: PgPool,
}

impl SnapshotService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Classifies every candidate as of the month's last instant and upserts
    /// the frozen row.
    pub async fn freeze_month(&self, month: NaiveDate) -> Result<SnapshotRow> {
        let month = month.with_day0(0).expect("day 1 always valid");
        let cutoff = time::month_end(month);

        let candidates =
            sqlx::query_as::<_, Candidate>("SELECT * FROM candidates")
                .fetch_all(&self.pool)
                .await?;
        let counts = snapshot_counts(candidates.iter(), cutoff);

        let stored = sqlx::query_as::<_, StoredSnapshot>(
            "INSERT INTO pipeline_snapshots \
                (month, not_held, reserve, success, declined, canceled, total, frozen_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) \
             ON CONFLICT (month) DO UPDATE SET \
                not_held = EXCLUDED.not_held, reserve = EXCLUDED.reserve, \
                success = EXCLUDED.success, declined = EXCLUDED.declined, \
                canceled = EXCLUDED.canceled, total = EXCLUDED.total, \
                frozen_at = EXCLUDED.frozen_at \
             RETURNING month, not_held, reserve, success, declined, canceled, total, frozen_at",
        )
        .bind(month)
        .bind(counts.not_held)
        .bind(counts.reserve)
        .bind(counts.success)
        .bind(counts.declined)
        .bind(counts.canceled)
        .bind(counts.total())
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Froze pipeline snapshot for {}: {} candidates",
            month, stored.total
        );
        Ok(row_from_stored(stored))
    }

    /// One row per month of the range: the frozen row when one exists,
    /// otherwise a live classification flagged `frozen: false`.
    pub async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<SnapshotRow>> {
        let months = time::months_between(from, to);
        if months.is_empty() {
            return Ok(Vec::new());
        }

        let stored = sqlx::query_as::<_, StoredSnapshot>(
            "SELECT month, not_held, reserve, success, declined, canceled, total, frozen_at \
             FROM pipeline_snapshots WHERE month >= $1 AND month <= $2",
        )
        .bind(months[0])
        .bind(months[months.len() - 1])
        .fetch_all(&self.pool)
        .await?;

        let candidates =
            sqlx::query_as::<_, Candidate>("SELECT * FROM candidates")
                .fetch_all(&self.pool)
                .await?;

        let mut rows = Vec::with_capacity(months.len());
        for month in months {
            if let Some(s) = stored.iter().find(|s| s.month == month) {
                rows.push(SnapshotRow {
                    month: s.month,
                    counts: StatusCounts {
                        not_held: s.not_held,
                        reserve: s.reserve,
                        success: s.success,
                        declined: s.declined,
                        canceled: s.canceled,
                    },
                    total: s.total,
                    frozen: true,
                    frozen_at: Some(s.frozen_at),
                });
            } else {
                let counts = snapshot_counts(candidates.iter(), time::month_end(month));
                rows.push(SnapshotRow {
                    month,
                    counts,
                    total: counts.total(),
                    frozen: false,
                    frozen_at: None,
                });
            }
        }
        Ok(rows)
    }

    /// The month the background worker freezes: the one before `now`.
    pub fn previous_month(now: DateTime<Utc>) -> NaiveDate {
        time::month_of(now) - Months::new(1)
    }
}

fn row_from_stored(s: StoredSnapshot) -> SnapshotRow {
    SnapshotRow {
        month: s.month,
        counts: StatusCounts {
            not_held: s.not_held,
            reserve: s.reserve,
            success: s.success,
            declined: s.declined,
            canceled: s.canceled,
        },
        total: s.total,
        frozen: true,
        frozen_at: Some(s.frozen_at),
    }
}

use anyhow::Result;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::candidate_dto::UpdateCandidateRequest;
use crate::models::candidate::{Candidate, Interview, Paginated};
use crate::utils::time;

#[derive(Clone)]
pub struct CandidateService {
    pool: PgPool,
}

const ALL_COLUMNS: &str = "id, full_name, email, phone, notes, status, department, position, \
     meet_link, polygraph_address, interviews, polygraph_at, accepted_at, declined_at, \
     canceled_at, created_at, updated_at";

impl CandidateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(
            "SELECT * FROM candidates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(candidate)
    }

    pub async fn list(&self, page: i64, page_size: i64) -> Result<Paginated<Candidate>> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 2000);

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, Candidate>(
            "SELECT * FROM candidates ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page_size)
        .bind((page - 1) * page_size)
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated {
            items,
            page,
            page_size,
            total,
        })
    }

    pub async fn create(
        &self,
        full_name: String,
        email: String,
        notes: Option<String>,
    ) -> Result<Candidate> {
        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM candidates WHERE email = $1")
                .bind(&email)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_some() {
            return Err(anyhow::anyhow!(
                "A candidate with this email address already exists."
            ));
        }

        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "INSERT INTO candidates (full_name, email, notes) VALUES ($1, $2, $3) \
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(full_name)
        .bind(email)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(candidate)
    }

    /// Partial update. A status change stamps the mapped event timestamp with
    /// "now" in the same write; a caller-supplied explicit timestamp for that
    /// field wins over the implicit stamp.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateCandidateRequest,
    ) -> Result<Option<Candidate>> {
        let Some(mut candidate) = self.get(id).await? else {
            return Ok(None);
        };

        if let Some(status) = patch.status {
            if status != candidate.status {
                candidate.apply_status(status, time::now());
            }
        }

        if let Some(full_name) = patch.full_name {
            candidate.full_name = full_name.trim().to_string();
        }
        if let Some(email) = patch.email {
            let email = email.trim().to_string();
            if !email.eq_ignore_ascii_case(&candidate.email) {
                let taken: Option<Uuid> = sqlx::query_scalar(
                    "SELECT id FROM candidates WHERE email = $1 AND id != $2",
                )
                .bind(&email)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
                if taken.is_some() {
                    return Err(anyhow::anyhow!(
                        "A candidate with this email address already exists."
                    ));
                }
            }
            candidate.email = email;
        }
        if let Some(phone) = patch.phone {
            candidate.phone = phone;
        }
        if let Some(notes) = patch.notes {
            candidate.notes = notes;
        }
        let position_touched = patch.position.is_some();
        if let Some(department) = patch.department {
            if let Some(dep) = &department {
                if !crate::catalog::is_department(dep) {
                    return Err(anyhow::anyhow!("Unknown department: {}", dep));
                }
            }
            candidate.department = department;
            // position options depend on the department; a stale position is
            // dropped rather than kept invalid
            match (&candidate.department, &candidate.position) {
                (Some(dep), Some(pos)) if !crate::catalog::is_position_for(dep, pos) => {
                    candidate.position = None;
                }
                (None, Some(_)) => candidate.position = None,
                _ => {}
            }
        }
        if let Some(position) = patch.position {
            candidate.position = position;
        }
        if position_touched {
            if let Some(pos) = &candidate.position {
                let valid = candidate
                    .department
                    .as_deref()
                    .is_some_and(|dep| crate::catalog::is_position_for(dep, pos));
                if !valid {
                    return Err(anyhow::anyhow!(
                        "Position {} is not available for this department",
                        pos
                    ));
                }
            }
        }
        if let Some(meet_link) = patch.meet_link {
            candidate.meet_link = meet_link;
        }
        if let Some(polygraph_address) = patch.polygraph_address {
            candidate.polygraph_address = polygraph_address;
        }
        if let Some(interviews) = patch.interviews {
            candidate.interviews = Json(interviews);
        }
        // explicit event timestamps override the implicit transition stamp
        if let Some(polygraph_at) = patch.polygraph_at {
            candidate.polygraph_at = polygraph_at;
        }
        if let Some(accepted_at) = patch.accepted_at {
            candidate.accepted_at = accepted_at;
        }
        if let Some(declined_at) = patch.declined_at {
            candidate.declined_at = declined_at;
        }
        if let Some(canceled_at) = patch.canceled_at {
            candidate.canceled_at = canceled_at;
        }

        self.store(&candidate).await
    }

    /// Writes every mutable column in one statement (last write wins; there
    /// is no concurrency token).
    pub async fn store(&self, candidate: &Candidate) -> Result<Option<Candidate>> {
        let updated = sqlx::query_as::<_, Candidate>(&format!(
            "UPDATE candidates SET \
                full_name = $2, email = $3, phone = $4, notes = $5, status = $6, \
                department = $7, position = $8, meet_link = $9, polygraph_address = $10, \
                interviews = $11, polygraph_at = $12, accepted_at = $13, declined_at = $14, \
                canceled_at = $15, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(candidate.id)
        .bind(&candidate.full_name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.notes)
        .bind(candidate.status)
        .bind(&candidate.department)
        .bind(&candidate.position)
        .bind(&candidate.meet_link)
        .bind(&candidate.polygraph_address)
        .bind(&candidate.interviews)
        .bind(candidate.polygraph_at)
        .bind(candidate.accepted_at)
        .bind(candidate.declined_at)
        .bind(candidate.canceled_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Prepends an interview (most-recent-first convention) and mirrors its
    /// link into the candidate-level shortcut.
    pub async fn prepend_interview(
        &self,
        id: Uuid,
        interview: Interview,
    ) -> Result<Option<Candidate>> {
        let Some(mut candidate) = self.get(id).await? else {
            return Ok(None);
        };
        candidate.meet_link = interview.meet_link.clone();
        candidate.interviews.0.insert(0, interview);
        self.store(&candidate).await
    }
}

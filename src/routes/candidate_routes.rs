use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::candidate_dto::{CreateCandidateRequest, PageQuery, UpdateCandidateRequest};
use crate::dto::meet_dto::{MeetRequest, MeetResponse};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::candidate::{Candidate, Interview, InterviewSource, Paginated, PipelineStatus};
use crate::services::meet_service::{MeetService, MeetWebhookPayload};
use crate::utils::validation::{is_valid_email, parse_participant_emails};
use crate::AppState;

pub async fn list_candidates(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<Candidate>>> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(50);
    let result = state.candidate_service.list(page, page_size).await?;
    Ok(Json(result))
}

pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>> {
    let candidate = state
        .candidate_service
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;
    Ok(Json(candidate))
}

pub async fn create_candidate(
    State(state): State<AppState>,
    Json(req): Json<CreateCandidateRequest>,
) -> Result<(StatusCode, Json<Candidate>)> {
    req.validate()?;
    let candidate = state
        .candidate_service
        .create(req.full_name.trim().to_string(), req.email.trim().to_string(), req.notes)
        .await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCandidateRequest>,
) -> Result<Json<Candidate>> {
    req.validate()?;
    let candidate = state
        .candidate_service
        .update(id, req)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;
    Ok(Json(candidate))
}

pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.candidate_service.delete(id).await? {
        return Err(Error::NotFound("Candidate not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// The addressee the external collaborator invites: the candidate's own
/// email when it holds up, otherwise the first valid participant.
fn pick_candidate_email(candidate: &Candidate, participants: &[String]) -> Result<String> {
    if is_valid_email(&candidate.email) {
        return Ok(candidate.email.clone());
    }
    participants
        .first()
        .cloned()
        .ok_or_else(|| Error::BadRequest("At least one valid email address is required".to_string()))
}

fn webhook_payload(
    candidate: &Candidate,
    claims: &Claims,
    req: &MeetRequest,
    participants: &[String],
) -> Result<MeetWebhookPayload> {
    Ok(MeetWebhookPayload {
        issue_key: MeetService::issue_key(candidate.id),
        summary: req.summary.clone(),
        candidate_email: pick_candidate_email(candidate, participants)?,
        assignee_email: claims.sub.clone(),
        reporter_email: claims.sub.clone(),
        company_emails: participants.join(","),
        interview_date: req.interview_date.to_rfc3339(),
    })
}

/// Schedules a meeting: asks the collaborator for a link and, only on
/// success, prepends the interview and updates the candidate's link in one
/// write. A webhook failure writes nothing.
pub async fn create_meet(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<MeetRequest>,
) -> Result<Json<MeetResponse>> {
    req.validate()?;
    let candidate = state
        .candidate_service
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;

    let participants = parse_participant_emails(&req.participants);
    let payload = webhook_payload(&candidate, &claims, &req, &participants)?;
    let link = state
        .meet_service
        .create_link(&payload)
        .await
        .map_err(Error::Webhook)?;

    let interview = Interview {
        id: Some(Uuid::new_v4()),
        scheduled_at: req.interview_date,
        duration_minutes: 60,
        participants,
        status: PipelineStatus::NotHeld,
        source: InterviewSource::Crm,
        meet_link: Some(link.clone()),
        notes: Some(req.summary),
    };
    let candidate = state
        .candidate_service
        .prepend_interview(id, interview)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;

    Ok(Json(MeetResponse {
        meet_link: Some(link),
        candidate,
    }))
}

/// Edits the most recent interview slot. The link is only regenerated when
/// the caller explicitly asked for it; otherwise time, participants and
/// summary change locally and the existing link stays.
pub async fn edit_meet(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<MeetRequest>,
) -> Result<Json<MeetResponse>> {
    req.validate()?;
    let mut candidate = state
        .candidate_service
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;

    let Some(mut slot) = candidate.interviews.0.first().cloned() else {
        return Err(Error::BadRequest(
            "Candidate has no scheduled interview to edit".to_string(),
        ));
    };

    let participants = parse_participant_emails(&req.participants);
    if !participants.is_empty() {
        slot.participants = participants;
    }
    slot.scheduled_at = req.interview_date;
    slot.notes = Some(req.summary.clone());

    if req.regenerate_link {
        let payload = webhook_payload(&candidate, &claims, &req, &slot.participants)?;
        let link = state
            .meet_service
            .create_link(&payload)
            .await
            .map_err(Error::Webhook)?;
        slot.meet_link = Some(link);
    }

    candidate.meet_link = slot.meet_link.clone();
    candidate.interviews.0[0] = slot;
    let candidate = state
        .candidate_service
        .store(&candidate)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;

    Ok(Json(MeetResponse {
        meet_link: candidate.meet_link.clone(),
        candidate,
    }))
}

//! Axum route handlers for job and candidate CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::parse::{parse_candidate_data, ParsedCandidate};
use crate::models::candidate::{CandidateProfile, NewCandidate};
use crate::models::job::JobRow;
use crate::recruiting::repository::{self, NewJob};
use crate::resume::validation::validate_contact;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: Option<String>,
    /// Comma-separated, e.g. "React, Node.js, AWS".
    #[serde(default)]
    pub required_skills: String,
    pub qualifications: Option<String>,
    pub location: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCandidateRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_url: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    #[serde(flatten)]
    pub profile: CandidateProfile,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let job = repository::insert_job(
        &state.db,
        NewJob {
            title: req.title.trim(),
            description: req.description.as_deref(),
            required_skills: req.required_skills.trim(),
            qualifications: req.qualifications.as_deref(),
            location: req.location.as_deref(),
            department: req.department.as_deref(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(repository::list_jobs(&state.db).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(repository::get_job(&state.db, job_id).await?))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    repository::delete_job(&state.db, job_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Candidates
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs/:id/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<ParsedCandidate>>, AppError> {
    repository::get_job(&state.db, job_id).await?;
    let rows = repository::list_candidates_for_job(&state.db, job_id).await?;
    Ok(Json(rows.iter().map(parse_candidate_data).collect()))
}

/// POST /api/v1/jobs/:id/candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<CreateCandidateRequest>,
) -> Result<(StatusCode, Json<ParsedCandidate>), AppError> {
    let errors = validate_contact(
        Some(req.name.as_str()),
        Some(req.email.as_str()),
        req.phone.as_deref(),
    );
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.join("; ")));
    }

    repository::get_job(&state.db, job_id).await?;

    let row = repository::insert_candidate(
        &state.db,
        &NewCandidate {
            job_id,
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            phone: req.phone,
            profile_url: req.profile_url,
            location: req.location,
            summary: req.summary,
            profile: req.profile,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(parse_candidate_data(&row))))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<ParsedCandidate>, AppError> {
    let row = repository::get_candidate(&state.db, candidate_id).await?;
    Ok(Json(parse_candidate_data(&row)))
}

/// PATCH /api/v1/candidates/:id/status
pub async fn handle_update_candidate_status(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ParsedCandidate>, AppError> {
    let status = req.status.trim();
    if status.is_empty() {
        return Err(AppError::Validation("status cannot be empty".to_string()));
    }
    let row = repository::update_candidate_status(&state.db, candidate_id, status).await?;
    Ok(Json(parse_candidate_data(&row)))
}

//! Axum route handlers for rankings and single candidate/job comparisons.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::parse::{parse_candidate_data, ParsedCandidate};
use crate::matching::ranking::{select_top, sort_candidates_by_ranking, CandidateRanking};
use crate::matching::skills::{calculate_skills_match, split_required_skills, SkillsMatch};
use crate::models::job::{JobRequirements, JobRow};
use crate::recruiting::repository;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankingsQuery {
    pub min_score: Option<u32>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankingsResponse {
    pub job: JobRow,
    pub rankings: Vec<CandidateRanking>,
    pub total_candidates: usize,
    pub filtered_count: usize,
    pub scorer_backend: String,
}

#[derive(Debug, Deserialize)]
pub struct JobIdQuery {
    pub job_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CandidateMatchResponse {
    pub candidate: ParsedCandidate,
    pub job: JobRow,
    pub skills_match: SkillsMatch,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs/:id/rankings?min_score=&limit=
///
/// Ranks every candidate of the job, keeps those at or above `min_score`,
/// then returns at most `limit` of them.
pub async fn handle_job_rankings(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<RankingsQuery>,
) -> Result<Json<RankingsResponse>, AppError> {
    let (min_score, limit) = validate_rankings_query(&query)?;

    let job = repository::get_job(&state.db, job_id).await?;
    let rows = repository::list_candidates_for_job(&state.db, job_id).await?;
    let candidates: Vec<ParsedCandidate> = rows.iter().map(parse_candidate_data).collect();

    let rankings = sort_candidates_by_ranking(
        &candidates,
        &JobRequirements::from(&job),
        state.profile_scorer.as_ref(),
        &state.config.ranking_weights,
    );
    let total_candidates = rankings.len();
    let rankings = select_top(rankings, min_score, limit);

    debug!(
        "Ranked {total_candidates} candidates for job {job_id}; returning {}",
        rankings.len()
    );

    Ok(Json(RankingsResponse {
        job,
        filtered_count: rankings.len(),
        rankings,
        total_candidates,
        scorer_backend: state.profile_scorer.name().to_string(),
    }))
}

/// GET /api/v1/candidates/:id/match?job_id=
pub async fn handle_candidate_match(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(query): Query<JobIdQuery>,
) -> Result<Json<CandidateMatchResponse>, AppError> {
    let row = repository::get_candidate(&state.db, candidate_id).await?;
    let job = repository::get_job(&state.db, query.job_id).await?;

    let candidate = parse_candidate_data(&row);
    let required = split_required_skills(&job.required_skills);
    let skills_match = calculate_skills_match(&candidate.profile.skills, &required);

    Ok(Json(CandidateMatchResponse {
        candidate,
        job,
        skills_match,
    }))
}

fn validate_rankings_query(query: &RankingsQuery) -> Result<(u32, usize), AppError> {
    let min_score = query.min_score.unwrap_or(0);
    if min_score > 100 {
        return Err(AppError::Validation(
            "min_score must be between 0 and 100".to_string(),
        ));
    }
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok((min_score, limit))
}

//! PostgreSQL access for `jobs` and `candidates`.
//! Lookups by id report a missing row as `AppError::NotFound`.

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{CandidateRow, NewCandidate};
use crate::models::job::JobRow;

/// Fields accepted when creating a job.
pub struct NewJob<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub required_skills: &'a str,
    pub qualifications: Option<&'a str>,
    pub location: Option<&'a str>,
    pub department: Option<&'a str>,
}

pub async fn insert_job(pool: &PgPool, job: NewJob<'_>) -> Result<JobRow, AppError> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs (id, title, description, required_skills, qualifications, location, department)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.title)
    .bind(job.description)
    .bind(job.required_skills)
    .bind(job.qualifications)
    .bind(job.location)
    .bind(job.department)
    .fetch_one(pool)
    .await?;

    info!("Created job {} ({})", row.id, row.title);
    Ok(row)
}

pub async fn list_jobs(pool: &PgPool) -> Result<Vec<JobRow>, AppError> {
    Ok(
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

pub async fn delete_job(pool: &PgPool, job_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    info!("Deleted job {job_id} and its candidates");
    Ok(())
}

/// All candidates who applied to a job, oldest first so rankings break ties
/// by application order.
pub async fn list_candidates_for_job(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<CandidateRow>, AppError> {
    Ok(sqlx::query_as::<_, CandidateRow>(
        "SELECT * FROM candidates WHERE job_id = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_candidate(pool: &PgPool, candidate_id: Uuid) -> Result<CandidateRow, AppError> {
    sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))
}

/// Inserts a candidate, encoding profile lists as JSON text.
pub async fn insert_candidate(
    pool: &PgPool,
    candidate: &NewCandidate,
) -> Result<CandidateRow, AppError> {
    let profile = &candidate.profile;

    let row = sqlx::query_as::<_, CandidateRow>(
        r#"
        INSERT INTO candidates
            (id, job_id, name, email, phone, profile_url, location, summary,
             skills, experience, projects, certifications, languages, education)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(candidate.job_id)
    .bind(&candidate.name)
    .bind(&candidate.email)
    .bind(&candidate.phone)
    .bind(&candidate.profile_url)
    .bind(&candidate.location)
    .bind(&candidate.summary)
    .bind(to_json_text(&profile.skills)?)
    .bind(to_json_text(&profile.experience)?)
    .bind(to_json_text(&profile.projects)?)
    .bind(to_json_text(&profile.certifications)?)
    .bind(to_json_text(&profile.languages)?)
    .bind(match &profile.education {
        Some(education) => Some(to_json_text(education)?),
        None => None,
    })
    .fetch_one(pool)
    .await?;

    info!("Created candidate {} for job {}", row.id, row.job_id);
    Ok(row)
}

pub async fn update_candidate_status(
    pool: &PgPool,
    candidate_id: Uuid,
    status: &str,
) -> Result<CandidateRow, AppError> {
    sqlx::query_as::<_, CandidateRow>(
        "UPDATE candidates SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(candidate_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))
}

fn to_json_text<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode candidate field: {e}")))
}

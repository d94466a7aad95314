//! Axum route handlers for resume parsing, bulk upload and interview questions.

use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::parse::parse_candidate_data;
use crate::matching::skills::{calculate_skills_match, split_required_skills, SkillsMatch};
use crate::progress::models::UploadProgress;
use crate::recruiting::repository;
use crate::resume::bulk::{run_bulk_ingest, BulkFile, ResumeIngestor};
use crate::resume::extract::extract_text_blocking;
use crate::resume::parser::{parse_resume, ParsedResume};
use crate::resume::questions::{
    generate_interview_questions, InterviewQuestionSet, DEFAULT_QUESTION_COUNT, MAX_QUESTION_COUNT,
};
use crate::resume::validation::{validate_resume, ValidationOutcome};
use crate::state::AppState;

/// Upper bound on files accepted in one bulk upload.
pub const MAX_BULK_FILES: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ParseResumeResponse {
    pub file_name: String,
    pub resume: ParsedResume,
    pub validation: ValidationOutcome,
}

#[derive(Debug, Serialize)]
pub struct BulkUploadResponse {
    pub session_id: String,
    pub total_files: usize,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    pub job_id: Uuid,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub skills_match: SkillsMatch,
    #[serde(flatten)]
    pub questions: InterviewQuestionSet,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/parse
///
/// Extracts and structures a single resume (multipart field `file`) without
/// saving anything. Lets recruiters preview what an upload would produce.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let files = read_files(multipart).await?;
    let file = files
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Validation("a resume file is required".to_string()))?;

    let text = extract_text_blocking(&file.file_name, file.data.clone())
        .await
        .map_err(|e| AppError::UnprocessableEntity(format!("{}: {e}", file.file_name)))?;
    let resume = parse_resume(&text, &state.llm).await?;
    let validation = validate_resume(&resume);

    Ok(Json(ParseResumeResponse {
        file_name: file.file_name,
        resume,
        validation,
    }))
}

/// POST /api/v1/jobs/:id/candidates/bulk
///
/// Accepts every file part of the multipart body, records a `processing`
/// session and processes the files in a background task. Clients poll
/// `/api/v1/uploads/:session_id/progress` with the returned id.
pub async fn handle_bulk_upload(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<BulkUploadResponse>), AppError> {
    repository::get_job(&state.db, job_id).await?;

    let files = read_files(multipart).await?;
    if files.is_empty() {
        return Err(AppError::Validation("at least one file is required".to_string()));
    }
    if files.len() > MAX_BULK_FILES {
        return Err(AppError::Validation(format!(
            "at most {MAX_BULK_FILES} files can be uploaded at once"
        )));
    }

    let session_id = Uuid::new_v4().to_string();
    let progress = UploadProgress::start(session_id.clone(), files.len());
    // Written before responding so the first poll never sees "not found".
    state.progress.set_progress(&session_id, &progress).await?;

    let total_files = files.len();
    info!("Bulk upload {session_id}: {total_files} files for job {job_id}");

    let store = state.progress.clone();
    let ingestor = Arc::new(ResumeIngestor {
        job_id,
        db: state.db.clone(),
        s3: state.s3.clone(),
        s3_bucket: state.config.s3_bucket.clone(),
        s3_endpoint: state.config.s3_endpoint.clone(),
        llm: state.llm.clone(),
    });
    tokio::spawn(async move {
        run_bulk_ingest(store.as_ref(), ingestor, progress, files).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(BulkUploadResponse {
            session_id,
            total_files,
        }),
    ))
}

/// POST /api/v1/candidates/:id/questions?job_id=&count=
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(query): Query<QuestionsQuery>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let count = query.count.unwrap_or(DEFAULT_QUESTION_COUNT);
    if count == 0 || count > MAX_QUESTION_COUNT {
        return Err(AppError::Validation(format!(
            "count must be between 1 and {MAX_QUESTION_COUNT}"
        )));
    }

    let candidate = parse_candidate_data(&repository::get_candidate(&state.db, candidate_id).await?);
    let job = repository::get_job(&state.db, query.job_id).await?;
    let skills_match = calculate_skills_match(
        &candidate.profile.skills,
        &split_required_skills(&job.required_skills),
    );

    let questions =
        generate_interview_questions(&candidate, &job, &skills_match, count, &state.llm).await?;

    Ok(Json(QuestionsResponse {
        candidate_id,
        job_id: job.id,
        skills_match,
        questions,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart helpers
// ────────────────────────────────────────────────────────────────────────────

/// Collects every part that carries a file name. Other parts are ignored.
async fn read_files(mut multipart: Multipart) -> Result<Vec<BulkFile>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if let Some(file) = read_file_field(field).await? {
            files.push(file);
        }
    }
    Ok(files)
}

async fn read_file_field(field: Field<'_>) -> Result<Option<BulkFile>, AppError> {
    let Some(file_name) = field
        .file_name()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
    else {
        return Ok(None);
    };

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Could not read {file_name}: {e}")))?;

    Ok(Some(BulkFile { file_name, data }))
}

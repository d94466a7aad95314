//! Axum route handlers for upload progress polling and store diagnostics.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::progress::models::{FileResult, UploadProgress, UploadStatus, ValidityStatus};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub session_id: String,
    pub status: UploadStatus,
    pub percentage: u32,
    pub total_files: usize,
    pub processed_files: usize,
    pub current_file: Option<String>,
    pub results: Vec<FileResult>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl From<UploadProgress> for ProgressResponse {
    fn from(progress: UploadProgress) -> Self {
        Self {
            percentage: progress.percentage(),
            session_id: progress.session_id,
            status: progress.status,
            total_files: progress.total_files,
            processed_files: progress.processed_files,
            current_file: progress.current_file,
            results: progress.results,
            started_at: progress.started_at,
            completed_at: progress.completed_at,
            error: progress.error,
        }
    }
}

/// GET /api/v1/uploads/:session_id/progress
///
/// 404 when the session is unknown (never started, cleared or expired); a
/// session that has started but processed nothing yet is a 200 with 0%.
pub async fn handle_get_progress(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ProgressResponse>, AppError> {
    let progress = state
        .progress
        .get_progress(&session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Upload session {session_id} not found")))?;

    Ok(Json(progress.into()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugAction {
    List,
    Get,
    Test,
    Clear,
}

#[derive(Debug, Deserialize)]
pub struct DebugQuery {
    pub action: DebugAction,
    pub session_id: Option<String>,
}

/// GET /api/v1/uploads/debug?action=list|get|test|clear&session_id=...
///
/// Operational inspection only; the response shape is not a stable contract.
/// `clear` only removes finished sessions; clearing an unknown id is a no-op.
pub async fn handle_progress_debug(
    State(state): State<AppState>,
    Query(query): Query<DebugQuery>,
) -> Result<Json<Value>, AppError> {
    let store = &state.progress;

    let body = match query.action {
        DebugAction::List => {
            let info = store.debug_info().await?;
            json!({ "action": "list", "debug": info })
        }
        DebugAction::Get => {
            let session_id = require_session_id(&query)?;
            let progress = store.get_progress(session_id).await?;
            json!({
                "action": "get",
                "session_id": session_id,
                "found": progress.is_some(),
                "progress": progress,
            })
        }
        DebugAction::Test => {
            // Write, read back and remove a throwaway record.
            let session_id = format!("debug-test-{}", Uuid::new_v4());
            let mut sample = UploadProgress::start(session_id.clone(), 1);
            sample
                .record_result(FileResult {
                    file_name: "self-test.txt".to_string(),
                    candidate_name: Some("Self Test".to_string()),
                    email: Some("self-test@example.com".to_string()),
                    phone: None,
                    profile_url: None,
                    status: ValidityStatus::Valid,
                    errors: vec![],
                })
                .map_err(|e| AppError::Internal(e.into()))?;

            store.set_progress(&session_id, &sample).await?;
            let read_back = store.get_progress(&session_id).await?;
            store.clear_progress(&session_id).await?;

            let round_trip_ok = read_back.as_ref() == Some(&sample);
            info!("Progress store self-test on {}: ok={round_trip_ok}", store.backend());
            json!({
                "action": "test",
                "backend": store.backend(),
                "session_id": session_id,
                "round_trip_ok": round_trip_ok,
                "store_size": store.store_size().await?,
            })
        }
        DebugAction::Clear => {
            let session_id = require_session_id(&query)?;
            // The ingest task would write a running session straight back.
            if let Some(progress) = store.get_progress(session_id).await? {
                if !progress.is_terminal() {
                    return Err(AppError::Validation(format!(
                        "session {session_id} is still processing and cannot be cleared"
                    )));
                }
            }
            store.clear_progress(session_id).await?;
            info!("Cleared upload session {session_id} via debug endpoint");
            json!({
                "action": "clear",
                "session_id": session_id,
                "store_size": store.store_size().await?,
            })
        }
    };

    Ok(Json(body))
}

fn require_session_id(query: &DebugQuery) -> Result<&str, AppError> {
    query
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("session_id is required for this action".to_string()))
}

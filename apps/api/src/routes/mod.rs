pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::progress::handlers as progress;
use crate::recruiting::handlers as recruiting;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Request body cap for routes that accept resume files.
const UPLOAD_BODY_LIMIT: usize = 50 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let uploads = Router::new()
        .route("/api/v1/resumes/parse", post(resume::handle_parse_resume))
        .route(
            "/api/v1/jobs/:id/candidates/bulk",
            post(resume::handle_bulk_upload),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(recruiting::handle_list_jobs).post(recruiting::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            get(recruiting::handle_get_job).delete(recruiting::handle_delete_job),
        )
        .route(
            "/api/v1/jobs/:id/candidates",
            get(recruiting::handle_list_candidates).post(recruiting::handle_create_candidate),
        )
        .route("/api/v1/jobs/:id/rankings", get(matching::handle_job_rankings))
        // Candidates
        .route("/api/v1/candidates/:id", get(recruiting::handle_get_candidate))
        .route(
            "/api/v1/candidates/:id/status",
            patch(recruiting::handle_update_candidate_status),
        )
        .route(
            "/api/v1/candidates/:id/match",
            get(matching::handle_candidate_match),
        )
        .route(
            "/api/v1/candidates/:id/questions",
            post(resume::handle_generate_questions),
        )
        // Upload progress
        .route("/api/v1/uploads/debug", get(progress::handle_progress_debug))
        .route(
            "/api/v1/uploads/:session_id/progress",
            get(progress::handle_get_progress),
        )
        .merge(uploads)
        .with_state(state)
}

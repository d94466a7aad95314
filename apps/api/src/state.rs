use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::scoring::ProfileScorer;
use crate::progress::store::ProgressStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Pluggable sub-score strategy for rankings. Default: HeuristicProfileScorer.
    pub profile_scorer: Arc<dyn ProfileScorer>,
    /// Bulk-upload progress records. Redis in production, in-memory for tests/dev.
    pub progress: Arc<dyn ProgressStore>,
}

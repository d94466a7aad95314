mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod progress;
mod recruiting;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, ProgressBackend};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::matching::scoring::{HeuristicProfileScorer, HeuristicThresholds};
use crate::progress::store::{InMemoryProgressStore, ProgressStore, RedisProgressStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; missing required env vars abort startup
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={level},tower_http={level}",
                env!("CARGO_CRATE_NAME"),
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting recruiting API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let progress = build_progress_store(&config).await?;
    info!("Progress store initialized (backend: {})", progress.backend());

    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let profile_scorer = Arc::new(HeuristicProfileScorer::new(HeuristicThresholds::default()));
    info!("Ranking weights: {:?}", config.ranking_weights);

    let state = AppState {
        db,
        s3,
        llm,
        config: config.clone(),
        profile_scorer,
        progress,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the recruiter UI has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_progress_store(config: &Config) -> Result<Arc<dyn ProgressStore>> {
    let store: Arc<dyn ProgressStore> = match config.progress_backend {
        ProgressBackend::Redis => {
            let client = redis::Client::open(config.redis_url.clone())?;
            Arc::new(RedisProgressStore::connect(&client, config.progress_ttl_secs).await?)
        }
        ProgressBackend::Memory => Arc::new(InMemoryProgressStore::new()),
    };
    Ok(store)
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "recruiting-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::matching::scoring::RankingWeights;

/// Which backend holds bulk-upload progress records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBackend {
    Redis,
    Memory,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub anthropic_model: String,
    pub port: u16,
    pub rust_log: String,
    pub progress_backend: ProgressBackend,
    /// Seconds a progress record lives in Redis before it expires.
    pub progress_ttl_secs: u64,
    pub ranking_weights: RankingWeights,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = RankingWeights::default();

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            anthropic_model: std::env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            progress_backend: parse_backend(
                &std::env::var("PROGRESS_BACKEND").unwrap_or_else(|_| "redis".to_string()),
            )?,
            progress_ttl_secs: parse_ttl(
                &std::env::var("PROGRESS_TTL_SECS").unwrap_or_else(|_| "3600".to_string()),
            )?,
            ranking_weights: RankingWeights {
                skills: optional_weight("RANKING_WEIGHT_SKILLS", defaults.skills)?,
                experience: optional_weight("RANKING_WEIGHT_EXPERIENCE", defaults.experience)?,
                education: optional_weight("RANKING_WEIGHT_EDUCATION", defaults.education)?,
                location: optional_weight("RANKING_WEIGHT_LOCATION", defaults.location)?,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_weight(key: &str, default: f64) -> Result<f64> {
    match std::env::var(key) {
        Ok(raw) => {
            let weight = raw
                .parse::<f64>()
                .with_context(|| format!("{key} must be a number"))?;
            if !weight.is_finite() || weight < 0.0 {
                bail!("{key} must be a non-negative number, got {raw}");
            }
            Ok(weight)
        }
        Err(_) => Ok(default),
    }
}

/// Redis rejects `EX 0`, so a zero TTL is refused here.
fn parse_ttl(raw: &str) -> Result<u64> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .context("PROGRESS_TTL_SECS must be a whole number of seconds")?;
    if secs == 0 {
        bail!("PROGRESS_TTL_SECS must be at least 1 second");
    }
    Ok(secs)
}

fn parse_backend(raw: &str) -> Result<ProgressBackend> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "redis" => Ok(ProgressBackend::Redis),
        "memory" => Ok(ProgressBackend::Memory),
        other => bail!("PROGRESS_BACKEND must be 'redis' or 'memory', got '{other}'"),
    }
}

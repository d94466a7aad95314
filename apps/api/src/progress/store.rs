//! Progress store — an injectable, trait-based key/value store for upload
//! progress records, keyed by session id.
//!
//! Backends:
//! - `RedisProgressStore` (default): records expire after a configured TTL.
//! - `InMemoryProgressStore`: process-local, no expiry. Tests and single-node dev.
//!
//! `AppState` holds an `Arc<dyn ProgressStore>`, chosen at startup via
//! `PROGRESS_BACKEND`. Writes replace the whole record; at most one writer
//! per session is assumed.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::progress::models::{UploadProgress, UploadStatus};

const KEY_PREFIX: &str = "upload_progress:";
const SCAN_BATCH: usize = 100;

#[derive(Debug, Error)]
pub enum ProgressStoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One line of `DebugInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub status: UploadStatus,
    pub processed_files: usize,
    pub total_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugInfo {
    pub backend: String,
    /// Always equal to `store_size()` at the time of the call.
    pub total_sessions: usize,
    pub sessions: Vec<SessionSummary>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Short label for diagnostics.
    fn backend(&self) -> &'static str;

    /// Replaces any record stored under `session_id`.
    async fn set_progress(
        &self,
        session_id: &str,
        progress: &UploadProgress,
    ) -> Result<(), ProgressStoreError>;

    /// `None` means never started, already cleared, or expired.
    async fn get_progress(
        &self,
        session_id: &str,
    ) -> Result<Option<UploadProgress>, ProgressStoreError>;

    /// Removing an absent session is a no-op.
    async fn clear_progress(&self, session_id: &str) -> Result<(), ProgressStoreError>;

    async fn all_sessions(&self) -> Result<Vec<String>, ProgressStoreError>;

    async fn store_size(&self) -> Result<usize, ProgressStoreError>;

    async fn debug_info(&self) -> Result<DebugInfo, ProgressStoreError>;
}

fn summarize(progress: &UploadProgress) -> SessionSummary {
    SessionSummary {
        session_id: progress.session_id.clone(),
        status: progress.status,
        processed_files: progress.processed_files,
        total_files: progress.total_files,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// InMemoryProgressStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryProgressStore {
    records: RwLock<HashMap<String, UploadProgress>>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn set_progress(
        &self,
        session_id: &str,
        progress: &UploadProgress,
    ) -> Result<(), ProgressStoreError> {
        self.records
            .write()
            .await
            .insert(session_id.to_string(), progress.clone());
        Ok(())
    }

    async fn get_progress(
        &self,
        session_id: &str,
    ) -> Result<Option<UploadProgress>, ProgressStoreError> {
        Ok(self.records.read().await.get(session_id).cloned())
    }

    async fn clear_progress(&self, session_id: &str) -> Result<(), ProgressStoreError> {
        if self.records.write().await.remove(session_id).is_some() {
            debug!("Cleared progress for session {session_id}");
        }
        Ok(())
    }

    async fn all_sessions(&self) -> Result<Vec<String>, ProgressStoreError> {
        let mut sessions: Vec<String> = self.records.read().await.keys().cloned().collect();
        sessions.sort();
        Ok(sessions)
    }

    async fn store_size(&self) -> Result<usize, ProgressStoreError> {
        Ok(self.records.read().await.len())
    }

    async fn debug_info(&self) -> Result<DebugInfo, ProgressStoreError> {
        let records = self.records.read().await;
        let mut sessions: Vec<SessionSummary> = records.values().map(summarize).collect();
        sessions.sort_by(|a, b| a.session_id.cmp(&b.session_id));
        Ok(DebugInfo {
            backend: self.backend().to_string(),
            total_sessions: records.len(),
            sessions,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RedisProgressStore
// ────────────────────────────────────────────────────────────────────────────

/// Stores each record as JSON under `upload_progress:<session_id>` with
/// `SET .. EX`, so abandoned sessions disappear after `ttl_secs`.
#[derive(Clone)]
pub struct RedisProgressStore {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisProgressStore {
    pub async fn connect(client: &redis::Client, ttl_secs: u64) -> Result<Self, ProgressStoreError> {
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis progress store connected (ttl: {ttl_secs}s)");
        Ok(Self { conn, ttl_secs })
    }

    async fn scan_keys(&self) -> Result<Vec<String>, ProgressStoreError> {
        let mut conn = self.conn.clone();
        let pattern = format!("{KEY_PREFIX}*");
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        keys.sort();
        keys.dedup(); // SCAN may return a key more than once
        Ok(keys)
    }
}

fn redis_key(session_id: &str) -> String {
    format!("{KEY_PREFIX}{session_id}")
}

fn session_from_key(key: &str) -> &str {
    key.strip_prefix(KEY_PREFIX).unwrap_or(key)
}

#[async_trait]
impl ProgressStore for RedisProgressStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn set_progress(
        &self,
        session_id: &str,
        progress: &UploadProgress,
    ) -> Result<(), ProgressStoreError> {
        let payload = serde_json::to_string(progress)?;
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(redis_key(session_id))
            .arg(payload)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn get_progress(
        &self,
        session_id: &str,
    ) -> Result<Option<UploadProgress>, ProgressStoreError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = redis::cmd("GET")
            .arg(redis_key(session_id))
            .query_async(&mut conn)
            .await?;
        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn clear_progress(&self, session_id: &str) -> Result<(), ProgressStoreError> {
        let mut conn = self.conn.clone();
        let removed: i64 = redis::cmd("DEL")
            .arg(redis_key(session_id))
            .query_async(&mut conn)
            .await?;
        if removed > 0 {
            debug!("Cleared progress for session {session_id}");
        }
        Ok(())
    }

    async fn all_sessions(&self) -> Result<Vec<String>, ProgressStoreError> {
        Ok(self
            .scan_keys()
            .await?
            .iter()
            .map(|k| session_from_key(k).to_string())
            .collect())
    }

    async fn store_size(&self) -> Result<usize, ProgressStoreError> {
        Ok(self.scan_keys().await?.len())
    }

    async fn debug_info(&self) -> Result<DebugInfo, ProgressStoreError> {
        let keys = self.scan_keys().await?;
        let mut sessions = Vec::with_capacity(keys.len());
        for key in &keys {
            // A record may expire between SCAN and GET; it is simply skipped.
            if let Some(progress) = self.get_progress(session_from_key(key)).await? {
                sessions.push(summarize(&progress));
            }
        }
        Ok(DebugInfo {
            backend: self.backend().to_string(),
            total_sessions: keys.len(),
            sessions,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::models::{FileResult, ValidityStatus};

    #[tokio::test]
    async fn test_get_unknown_session_is_absent() {
        let store = InMemoryProgressStore::new();
        assert!(store.get_progress("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_returns_same_record() {
        let store = InMemoryProgressStore::new();
        let mut progress = UploadProgress::start("s1", 2);
        progress
            .record_result(FileResult {
                file_name: "cv.pdf".to_string(),
                candidate_name: Some("Jane".to_string()),
                email: Some("jane@example.com".to_string()),
                phone: None,
                profile_url: Some("s3://bucket/cv.pdf".to_string()),
                status: ValidityStatus::Valid,
                errors: vec![],
            })
            .unwrap();

        store.set_progress("s1", &progress).await.unwrap();
        assert_eq!(store.get_progress("s1").await.unwrap(), Some(progress));
    }

    #[tokio::test]
    async fn test_set_replaces_previous_record() {
        let store = InMemoryProgressStore::new();
        let mut progress = UploadProgress::start("s1", 1);
        store.set_progress("s1", &progress).await.unwrap();
        progress.fail("boom").unwrap();
        store.set_progress("s1", &progress).await.unwrap();

        let stored = store.get_progress("s1").await.unwrap().unwrap();
        assert_eq!(stored.status, UploadStatus::Failed);
        assert_eq!(store.store_size().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_absent_is_noop() {
        let store = InMemoryProgressStore::new();
        store
            .set_progress("s1", &UploadProgress::start("s1", 1))
            .await
            .unwrap();
        store.clear_progress("missing").await.unwrap();
        assert_eq!(store.store_size().await.unwrap(), 1);

        store.clear_progress("s1").await.unwrap();
        store.clear_progress("s1").await.unwrap();
        assert_eq!(store.store_size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_debug_info_matches_store_size() {
        let store = InMemoryProgressStore::new();
        for id in ["b", "a", "c"] {
            store
                .set_progress(id, &UploadProgress::start(id, 4))
                .await
                .unwrap();
        }
        let info = store.debug_info().await.unwrap();
        assert_eq!(info.total_sessions, store.store_size().await.unwrap());
        assert_eq!(info.backend, "memory");
        let ids: Vec<&str> = info.sessions.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(store.all_sessions().await.unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_concurrent_writers_on_distinct_sessions() {
        let store = std::sync::Arc::new(InMemoryProgressStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let id = format!("session-{i}");
                let mut progress = UploadProgress::start(id.clone(), 1);
                store.set_progress(&id, &progress).await.unwrap();
                progress
                    .record_result(FileResult::rejected("x.bin", "unsupported"))
                    .unwrap();
                progress.complete().unwrap();
                store.set_progress(&id, &progress).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.store_size().await.unwrap(), 16);
        let info = store.debug_info().await.unwrap();
        assert!(info
            .sessions
            .iter()
            .all(|s| s.status == UploadStatus::Completed && s.processed_files == 1));
    }

    #[test]
    fn test_redis_key_round_trip() {
        let key = redis_key("abc-123");
        assert_eq!(key, "upload_progress:abc-123");
        assert_eq!(session_from_key(&key), "abc-123");
    }
}

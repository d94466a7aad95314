//! Bulk resume ingest — processes a batch of files one after another and
//! publishes an `UploadProgress` snapshot after every step.
//!
//! The per-file work sits behind `FileProcessor` so the orchestration can be
//! exercised without S3, Postgres or the LLM. `ResumeIngestor` is the
//! production implementation.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::progress::models::{FileResult, UploadProgress, ValidityStatus};
use crate::progress::store::ProgressStore;
use crate::recruiting::repository::insert_candidate;
use crate::resume::extract::extract_text_blocking;
use crate::resume::parser::parse_resume;
use crate::resume::storage::upload_resume;
use crate::resume::validation::validate_resume;

/// One uploaded file held in memory until it is processed.
#[derive(Debug, Clone)]
pub struct BulkFile {
    pub file_name: String,
    pub data: Bytes,
}

#[async_trait]
pub trait FileProcessor: Send + Sync {
    /// Turns one file into a candidate. Failures are reported in the result,
    /// never returned, so one bad file cannot stop the batch.
    async fn process(&self, file: &BulkFile) -> FileResult;
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Runs the batch to a terminal state and returns the final record.
///
/// The session ends `completed` if the batch was empty or at least one file
/// produced a valid candidate, `failed` otherwise. Store write failures are
/// logged and do not interrupt processing. Each file runs in its own task, so
/// a panic while processing it is recorded as an invalid result.
pub async fn run_bulk_ingest(
    store: &dyn ProgressStore,
    processor: Arc<dyn FileProcessor>,
    mut progress: UploadProgress,
    files: Vec<BulkFile>,
) -> UploadProgress {
    let session_id = progress.session_id.clone();
    info!(
        "Bulk ingest {session_id} started with {} files",
        files.len()
    );

    for file in &files {
        if let Err(e) = progress.begin_file(&file.file_name) {
            error!("Bulk ingest {session_id}: {e}");
            break;
        }
        publish(store, &progress).await;

        let result = process_isolated(&processor, file).await;
        if result.status == ValidityStatus::Invalid {
            warn!(
                "Bulk ingest {session_id}: {} rejected: {}",
                file.file_name,
                result.errors.join("; ")
            );
        }

        if let Err(e) = progress.record_result(result) {
            error!("Bulk ingest {session_id}: {e}");
            break;
        }
        publish(store, &progress).await;
    }

    let valid = progress
        .results
        .iter()
        .filter(|r| r.status == ValidityStatus::Valid)
        .count();

    let finished = if files.is_empty() || valid > 0 {
        progress.complete()
    } else {
        progress.fail(format!("None of the {} files produced a valid candidate", files.len()))
    };
    if let Err(e) = finished {
        error!("Bulk ingest {session_id}: {e}");
    }
    publish(store, &progress).await;

    info!(
        "Bulk ingest {session_id} finished: {:?}, {valid}/{} valid",
        progress.status, progress.total_files
    );
    progress
}

async fn process_isolated(processor: &Arc<dyn FileProcessor>, file: &BulkFile) -> FileResult {
    let processor = Arc::clone(processor);
    let owned = file.clone();
    match tokio::spawn(async move { processor.process(&owned).await }).await {
        Ok(result) => result,
        Err(e) => {
            error!("Processing {} aborted: {e}", file.file_name);
            FileResult::rejected(&file.file_name, "could not read file")
        }
    }
}

async fn publish(store: &dyn ProgressStore, progress: &UploadProgress) {
    if let Err(e) = store.set_progress(&progress.session_id, progress).await {
        warn!(
            "Failed to publish progress for session {}: {e}",
            progress.session_id
        );
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ResumeIngestor — production FileProcessor
// ────────────────────────────────────────────────────────────────────────────

/// Extract → AI parse → validate → store original → insert candidate.
pub struct ResumeIngestor {
    pub job_id: Uuid,
    pub db: PgPool,
    pub s3: aws_sdk_s3::Client,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub llm: LlmClient,
}

#[async_trait]
impl FileProcessor for ResumeIngestor {
    async fn process(&self, file: &BulkFile) -> FileResult {
        let text = match extract_text_blocking(&file.file_name, file.data.clone()).await {
            Ok(text) => text,
            Err(e) => return FileResult::rejected(&file.file_name, e.to_string()),
        };

        let parsed = match parse_resume(&text, &self.llm).await {
            Ok(parsed) => parsed,
            Err(e) => return FileResult::rejected(&file.file_name, e.to_string()),
        };

        let outcome = validate_resume(&parsed);
        let is_valid = outcome.is_valid();
        let mut result = FileResult {
            file_name: file.file_name.clone(),
            candidate_name: parsed.name.clone(),
            email: parsed.email.clone(),
            phone: parsed.phone.clone(),
            profile_url: None,
            status: outcome.status,
            errors: outcome.errors,
        };
        if !is_valid {
            return result;
        }

        // A failed upload still keeps the candidate; the missing file is noted.
        match upload_resume(
            &self.s3,
            &self.s3_bucket,
            &self.s3_endpoint,
            self.job_id,
            &file.file_name,
            file.data.clone(),
        )
        .await
        {
            Ok(url) => result.profile_url = Some(url),
            Err(e) => result.errors.push(format!("Resume file was not stored: {e}")),
        }

        let new_candidate = parsed.into_new_candidate(self.job_id, result.profile_url.clone());
        if let Err(e) = insert_candidate(&self.db, &new_candidate).await {
            reject_unsaved(&mut result, &e);
        }

        result
    }
}

/// Marks the file invalid. Database details go to the log, not the client.
fn reject_unsaved(result: &mut FileResult, err: &AppError) {
    warn!("Saving candidate from {} failed: {err}", result.file_name);
    result.status = ValidityStatus::Invalid;
    result.errors.push("Candidate could not be saved".to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::models::UploadStatus;
    use crate::progress::store::InMemoryProgressStore;

    /// Accepts files whose name starts with "ok", rejects everything else.
    struct NameBasedProcessor;

    #[async_trait]
    impl FileProcessor for NameBasedProcessor {
        async fn process(&self, file: &BulkFile) -> FileResult {
            if file.file_name.starts_with("ok") {
                FileResult {
                    file_name: file.file_name.clone(),
                    candidate_name: Some("Jane Doe".to_string()),
                    email: Some("jane@example.com".to_string()),
                    phone: None,
                    profile_url: Some(format!("http://minio/resumes/{}", file.file_name)),
                    status: ValidityStatus::Valid,
                    errors: vec![],
                }
            } else {
                FileResult::rejected(&file.file_name, "unsupported file type")
            }
        }
    }

    /// Panics on files whose name starts with "crash".
    struct CrashingProcessor;

    #[async_trait]
    impl FileProcessor for CrashingProcessor {
        async fn process(&self, file: &BulkFile) -> FileResult {
            if file.file_name.starts_with("crash") {
                panic!("malformed xref table in {}", file.file_name);
            }
            NameBasedProcessor.process(file).await
        }
    }

    fn files(names: &[&str]) -> Vec<BulkFile> {
        names
            .iter()
            .map(|n| BulkFile {
                file_name: n.to_string(),
                data: Bytes::from_static(b"resume"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_batch_with_a_valid_file_completes() {
        let store = InMemoryProgressStore::new();
        let batch = files(&["ok-1.pdf", "bad.png", "ok-2.txt"]);
        let progress = UploadProgress::start("s1", batch.len());

        let done = run_bulk_ingest(&store, Arc::new(NameBasedProcessor), progress, batch).await;

        assert_eq!(done.status, UploadStatus::Completed);
        assert_eq!(done.processed_files, 3);
        assert_eq!(done.percentage(), 100);
        assert!(done.current_file.is_none());
        let names: Vec<&str> = done.results.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["ok-1.pdf", "bad.png", "ok-2.txt"]);
        assert_eq!(done.results[1].status, ValidityStatus::Invalid);

        let stored = store.get_progress("s1").await.unwrap().unwrap();
        assert_eq!(stored, done);
    }

    #[tokio::test]
    async fn test_batch_with_only_invalid_files_fails() {
        let store = InMemoryProgressStore::new();
        let batch = files(&["a.png", "b.doc"]);
        let progress = UploadProgress::start("s2", batch.len());

        let done = run_bulk_ingest(&store, Arc::new(NameBasedProcessor), progress, batch).await;

        assert_eq!(done.status, UploadStatus::Failed);
        assert_eq!(done.processed_files, 2);
        assert!(done.error.as_deref().unwrap().contains("2 files"));
    }

    #[tokio::test]
    async fn test_empty_batch_completes_immediately() {
        let store = InMemoryProgressStore::new();
        let done = run_bulk_ingest(
            &store,
            Arc::new(NameBasedProcessor),
            UploadProgress::start("s3", 0),
            vec![],
        )
        .await;
        assert_eq!(done.status, UploadStatus::Completed);
        assert_eq!(store.store_size().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_already_terminal_session_is_left_untouched() {
        let store = InMemoryProgressStore::new();
        let mut progress = UploadProgress::start("s4", 1);
        progress.fail("cancelled").unwrap();

        let done = run_bulk_ingest(&store, Arc::new(NameBasedProcessor), progress, files(&["ok.pdf"])).await;
        assert_eq!(done.status, UploadStatus::Failed);
        assert_eq!(done.error.as_deref(), Some("cancelled"));
        assert_eq!(done.processed_files, 0);
    }

    #[test]
    fn test_save_failure_hides_database_details() {
        let mut result = FileResult {
            file_name: "jane.pdf".to_string(),
            candidate_name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: None,
            profile_url: None,
            status: ValidityStatus::Valid,
            errors: vec![],
        };
        reject_unsaved(&mut result, &AppError::Database(sqlx::Error::PoolTimedOut));

        assert_eq!(result.status, ValidityStatus::Invalid);
        assert_eq!(result.errors, vec!["Candidate could not be saved".to_string()]);
    }

    #[tokio::test]
    async fn test_panicking_file_is_rejected_and_batch_finishes() {
        let store = Arc::new(InMemoryProgressStore::new());
        let batch = files(&["crash.pdf", "ok.txt"]);
        let progress = UploadProgress::start("s5", batch.len());

        let task_store = store.clone();
        let handle = tokio::spawn(async move {
            run_bulk_ingest(task_store.as_ref(), Arc::new(CrashingProcessor), progress, batch).await
        });
        let done = handle.await.unwrap();

        assert_eq!(done.status, UploadStatus::Completed);
        assert_eq!(done.processed_files, 2);
        assert!(done.current_file.is_none());
        assert_eq!(done.results[0].status, ValidityStatus::Invalid);
        assert_eq!(done.results[0].errors, vec!["could not read file".to_string()]);
        assert_eq!(done.results[1].status, ValidityStatus::Valid);

        let stored = store.get_progress("s5").await.unwrap().unwrap();
        assert!(stored.is_terminal());
    }

    #[tokio::test]
    async fn test_batch_of_only_panicking_files_fails() {
        let store = InMemoryProgressStore::new();
        let batch = files(&["crash-1.pdf", "crash-2.pdf"]);
        let progress = UploadProgress::start("s6", batch.len());

        let done = run_bulk_ingest(&store, Arc::new(CrashingProcessor), progress, batch).await;

        assert_eq!(done.status, UploadStatus::Failed);
        assert_eq!(done.processed_files, 2);
        let stored = store.get_progress("s6").await.unwrap().unwrap();
        assert_eq!(stored.status, UploadStatus::Failed);
    }
}

//! Upload progress record and its per-session state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Processing,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, UploadStatus::Processing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityStatus {
    Valid,
    Invalid,
}

/// Outcome of processing one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub file_name: String,
    pub candidate_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profile_url: Option<String>,
    pub status: ValidityStatus,
    pub errors: Vec<String>,
}

impl FileResult {
    /// A result for a file that could not be turned into a candidate at all.
    pub fn rejected(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            candidate_name: None,
            email: None,
            phone: None,
            profile_url: None,
            status: ValidityStatus::Invalid,
            errors: vec![error.into()],
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProgressError {
    #[error("session is already {0:?}; no further transitions allowed")]
    Terminal(UploadStatus),

    #[error("all {0} files have already been recorded")]
    Overflow(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub session_id: String,
    pub status: UploadStatus,
    pub total_files: usize,
    pub processed_files: usize,
    pub current_file: Option<String>,
    pub results: Vec<FileResult>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl UploadProgress {
    pub fn start(session_id: impl Into<String>, total_files: usize) -> Self {
        Self {
            session_id: session_id.into(),
            status: UploadStatus::Processing,
            total_files,
            processed_files: 0,
            current_file: None,
            results: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Share of files processed, rounded to a whole percent.
    pub fn percentage(&self) -> u32 {
        if self.total_files == 0 {
            return 0;
        }
        ((self.processed_files as f64 / self.total_files as f64) * 100.0).round() as u32
    }

    pub fn begin_file(&mut self, file_name: impl Into<String>) -> Result<(), ProgressError> {
        self.ensure_processing()?;
        self.current_file = Some(file_name.into());
        Ok(())
    }

    pub fn record_result(&mut self, result: FileResult) -> Result<(), ProgressError> {
        self.ensure_processing()?;
        if self.processed_files >= self.total_files {
            return Err(ProgressError::Overflow(self.total_files));
        }
        self.results.push(result);
        self.processed_files += 1;
        self.current_file = None;
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), ProgressError> {
        self.finish(UploadStatus::Completed, None)
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), ProgressError> {
        self.finish(UploadStatus::Failed, Some(reason.into()))
    }

    fn finish(&mut self, status: UploadStatus, error: Option<String>) -> Result<(), ProgressError> {
        self.ensure_processing()?;
        self.status = status;
        self.error = error;
        self.current_file = None;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn ensure_processing(&self) -> Result<(), ProgressError> {
        if self.is_terminal() {
            return Err(ProgressError::Terminal(self.status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(file: &str) -> FileResult {
        FileResult {
            file_name: file.to_string(),
            candidate_name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: None,
            profile_url: None,
            status: ValidityStatus::Valid,
            errors: vec![],
        }
    }

    #[test]
    fn test_new_session_is_processing_with_zero_progress() {
        let progress = UploadProgress::start("s1", 3);
        assert_eq!(progress.status, UploadStatus::Processing);
        assert_eq!(progress.processed_files, 0);
        assert_eq!(progress.percentage(), 0);
        assert!(progress.completed_at.is_none());
    }

    #[test]
    fn test_processing_accumulates_results() {
        let mut progress = UploadProgress::start("s1", 3);
        progress.begin_file("a.pdf").unwrap();
        assert_eq!(progress.current_file.as_deref(), Some("a.pdf"));
        progress.record_result(valid("a.pdf")).unwrap();
        assert_eq!(progress.processed_files, 1);
        assert!(progress.current_file.is_none());
        assert_eq!(progress.percentage(), 33);

        progress.record_result(FileResult::rejected("b.doc", "unsupported")).unwrap();
        assert_eq!(progress.results.len(), 2);
        assert_eq!(progress.results[1].status, ValidityStatus::Invalid);
        assert_eq!(progress.percentage(), 67);
    }

    #[test]
    fn test_cannot_record_beyond_total() {
        let mut progress = UploadProgress::start("s1", 1);
        progress.record_result(valid("a.pdf")).unwrap();
        assert_eq!(
            progress.record_result(valid("b.pdf")),
            Err(ProgressError::Overflow(1))
        );
        assert_eq!(progress.processed_files, 1);
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut progress = UploadProgress::start("s1", 1);
        progress.record_result(valid("a.pdf")).unwrap();
        progress.complete().unwrap();
        assert_eq!(progress.percentage(), 100);
        assert!(progress.completed_at.is_some());
        assert_eq!(
            progress.fail("late"),
            Err(ProgressError::Terminal(UploadStatus::Completed))
        );
        assert_eq!(
            progress.begin_file("b.pdf"),
            Err(ProgressError::Terminal(UploadStatus::Completed))
        );
        assert_eq!(progress.status, UploadStatus::Completed);
    }

    #[test]
    fn test_failed_is_terminal_and_keeps_reason() {
        let mut progress = UploadProgress::start("s1", 2);
        progress.fail("every file was rejected").unwrap();
        assert_eq!(progress.status, UploadStatus::Failed);
        assert_eq!(progress.error.as_deref(), Some("every file was rejected"));
        assert_eq!(
            progress.complete(),
            Err(ProgressError::Terminal(UploadStatus::Failed))
        );
    }

    #[test]
    fn test_empty_batch_percentage_is_zero() {
        assert_eq!(UploadProgress::start("s1", 0).percentage(), 0);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&UploadStatus::Processing).unwrap();
        assert_eq!(json, r#""processing""#);
    }
}
